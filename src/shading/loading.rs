//! The loading-screen wave: a row of points lifted by a travelling bump.

pub const WAVE_HEIGHT: f32 = 0.1;
pub const WAVE_RANGE: f32 = 0.3;
/// Clip-space y of the resting row.
pub const ROW_Y: f32 = -0.8;
pub const POINT_COUNT: usize = 51;
/// Half the side of each point quad in clip space.
pub const POINT_HALF_SIZE: f32 = 0.006;

/// Resting positions of the wave points, evenly spread over `x` in `[-1, 1]`.
pub fn row_points() -> Vec<[f32; 2]> {
    let step = 2.0 / (POINT_COUNT - 1) as f32;
    (0..POINT_COUNT)
        .map(|i| [-1.0 + step * i as f32, ROW_Y])
        .collect()
}

/// Vertical lift of a point at `x` when the bump is centred at `sin(time)`.
pub fn wave_displacement(x: f32, time: f32) -> f32 {
    let distance = (x - time.sin()).abs();
    if distance < WAVE_RANGE {
        WAVE_HEIGHT * (WAVE_RANGE - distance) / WAVE_RANGE
    } else {
        0.0
    }
}
