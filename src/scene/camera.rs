use crate::math::{Mat4, Ray, Vec3, deg_to_rad};

pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 100.0;

/// A fixed camera with a vertical field of view in degrees. `+z` is up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub direction: Vec3,
    pub fov_y: f32,
}

impl PerspectiveCamera {
    pub fn new(position: [f32; 3], direction: [f32; 3], fov_y: f32) -> Self {
        Self {
            position: position.into(),
            direction: direction.into(),
            fov_y,
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_to(self.position, self.direction, Vec3::UP)
    }

    pub fn proj(&self, aspect: f32) -> Mat4 {
        Mat4::perspective(deg_to_rad(self.fov_y), aspect, Z_NEAR, Z_FAR)
    }

    /// Ray from the eye through the cursor, given in physical pixels with the
    /// origin at the top left of a `size` window.
    pub fn cursor_to_ray(&self, cursor: (f64, f64), size: (u32, u32)) -> Option<Ray> {
        let (width, height) = (size.0.max(1) as f32, size.1.max(1) as f32);
        let x = 2.0 * cursor.0 as f32 / width - 1.0;
        let y = 1.0 - 2.0 * cursor.1 as f32 / height;

        let inverse = self.proj(width / height).multiply(&self.view()).inverse()?;
        let near = inverse.transform_point(Vec3::new(x, y, 0.0));
        let far = inverse.transform_point(Vec3::new(x, y, 1.0));
        Some(Ray::new(near, (far - near).normalize()))
    }
}
