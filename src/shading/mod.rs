//! Shading rules shared by the GPU programs and the CPU.
//!
//! Each submodule owns the constants of one shader program plus a Rust
//! rendition of its decision logic. The constants are emitted as WGSL by
//! [`wgsl_constants`] and spliced into every program through
//! `#include constants`, so the two copies cannot drift apart.

pub mod board;
pub mod highlight;
pub mod lighting;
pub mod loading;
pub mod pieces;

use std::fmt::Write;

fn vec3(values: [f32; 3]) -> String {
    format!(
        "vec3<f32>({:?}, {:?}, {:?})",
        values[0], values[1], values[2]
    )
}

/// WGSL source declaring every shading constant as a module-scope `const`.
pub fn wgsl_constants() -> String {
    let mut out = String::new();
    let mut vec = |name: &str, value: [f32; 3]| {
        let _ = writeln!(out, "const {name}: vec3<f32> = {};", vec3(value));
    };
    vec("LIGHT_POS", lighting::LIGHT_POSITION);
    vec("LIGHT_COLOR", lighting::LIGHT_COLOR);
    vec("BLACK_TINT", board::BLACK_TINT);
    vec("WHITE_TINT", board::WHITE_TINT);
    vec("DARK_PIECE", pieces::DARK_PIECE_COLOR);
    vec("LIGHT_PIECE", pieces::LIGHT_PIECE_COLOR);
    vec("SELECT_TINT", pieces::SELECTION_TINT);
    vec("CAPTURE_COLOR", highlight::CAPTURE_COLOR);
    vec("LAST_MOVE_COLOR", highlight::LAST_MOVE_COLOR);
    vec("REGULAR_COLOR", highlight::REGULAR_COLOR);

    let scalars = [
        ("AMBIENT_STRENGTH", lighting::AMBIENT_STRENGTH),
        ("TILE_UV_SCALE", board::TILE_UV_SCALE),
        ("SELECT_ALPHA", pieces::SELECTION_ALPHA),
        ("WAVE_HEIGHT", loading::WAVE_HEIGHT),
        ("WAVE_RANGE", loading::WAVE_RANGE),
        ("POINT_HALF_SIZE", loading::POINT_HALF_SIZE),
        ("HEIGHT", highlight::HEIGHT),
        ("HOVERED_ALPHA", highlight::HOVERED_ALPHA),
        ("RESTING_ALPHA", highlight::RESTING_ALPHA),
        ("RESTING_SCALE", highlight::RESTING_SCALE),
        ("LAST_MOVE_ALPHA", highlight::LAST_MOVE_ALPHA),
    ];
    for (name, value) in scalars {
        let _ = writeln!(out, "const {name}: f32 = {value:?};");
    }

    for zone in [
        board::BoardZone::Edge,
        board::BoardZone::Dark,
        board::BoardZone::Light,
    ] {
        let _ = writeln!(out, "const {}: u32 = {}u;", zone.wgsl_name(), zone as u32);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_are_float_literals() {
        let source = wgsl_constants();
        assert!(source.contains("const AMBIENT_STRENGTH: f32 = 0.35;"));
        assert!(source.contains("const LIGHT_COLOR: vec3<f32> = vec3<f32>(1.0, 1.0, 1.0);"));
        assert!(source.contains("const ZONE_EDGE: u32 = 0u;"));
        assert!(source.contains("const HEIGHT: f32 = 0.03;"));
        assert!(source.contains("const CAPTURE_COLOR: vec3<f32> = vec3<f32>(0.9, 0.25, 0.2);"));
    }

    #[test]
    fn test_constants_parse_as_wgsl() {
        naga::front::wgsl::parse_str(&wgsl_constants()).expect("constants should parse");
    }
}
