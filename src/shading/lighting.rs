//! The shared lighting routine used by every lit fragment stage.

use crate::math::Vec3;

pub const LIGHT_POSITION: [f32; 3] = [4.5, 4.5, 12.0];
pub const LIGHT_COLOR: [f32; 3] = [1.0, 1.0, 1.0];
pub const AMBIENT_STRENGTH: f32 = 0.35;

/// Ambient term plus Lambertian diffuse from the single fixed light.
///
/// `normal` is expected to be unit length.
pub fn calculate_lighting(normal: Vec3, world_pos: Vec3) -> Vec3 {
    let color = Vec3::from(LIGHT_COLOR);
    let ambient = color * AMBIENT_STRENGTH;
    let light_dir = (Vec3::from(LIGHT_POSITION) - world_pos).normalize();
    let diffuse = color * normal.dot(&light_dir).max(0.0);
    ambient + diffuse
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facing_away_is_ambient_only() {
        let lit = calculate_lighting(Vec3::new(0.0, 0.0, -1.0), Vec3::new(4.5, 4.5, 0.0));
        assert_eq!(lit, Vec3::from(LIGHT_COLOR) * AMBIENT_STRENGTH);
    }

    #[test]
    fn test_facing_the_light_is_fully_lit() {
        let lit = calculate_lighting(Vec3::UP, Vec3::new(4.5, 4.5, 0.0));
        let expected = AMBIENT_STRENGTH + 1.0;
        for channel in lit.0 {
            assert!((channel - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn test_grazing_light_falls_off() {
        let lit = calculate_lighting(Vec3::UP, Vec3::new(-20.0, 4.5, 0.0));
        assert!(lit.x() > AMBIENT_STRENGTH);
        assert!(lit.x() < AMBIENT_STRENGTH + 1.0);
    }
}
