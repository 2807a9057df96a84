//! Math types for the 3D scene: column-major matrices, vectors and rays.
//!
//! Matrix layouts match WGSL's `mat4x4<f32>` so they can be written straight
//! into uniform and instance buffers.

pub mod aabb;
pub mod mat;
pub mod ray;
pub mod vec;

pub use aabb::Aabb;
pub use mat::Mat4;
pub use ray::Ray;
pub use vec::Vec3;

/// Converts degrees to radians.
pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees * (std::f32::consts::PI / 180.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deg_to_rad() {
        assert!((deg_to_rad(180.0) - std::f32::consts::PI).abs() < 1e-6);
        assert!((deg_to_rad(-90.0) + std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }
}
