use crate::math::vec::Vec3;

/// A 4x4 matrix stored as four columns, matching WGSL's `mat4x4<f32>`.
///
/// `self.0[c][r]` is the element in column `c`, row `r`. Points are column
/// vectors, so `a.multiply(&b)` applies `b` first and then `a`.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Mat4(pub [[f32; 4]; 4]);

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat4 {
    pub fn identity() -> Mat4 {
        Mat4([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Right-handed perspective projection with a `[0, 1]` depth range.
    pub fn perspective(fov_y_radians: f32, aspect: f32, z_near: f32, z_far: f32) -> Mat4 {
        let f = 1.0 / (fov_y_radians * 0.5).tan();
        let range_reciprocal = 1.0 / (z_near - z_far);

        Mat4([
            [f / aspect, 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [0.0, 0.0, z_far * range_reciprocal, -1.0],
            [0.0, 0.0, z_near * z_far * range_reciprocal, 0.0],
        ])
    }

    /// Right-handed view matrix for an eye at `eye` looking along `direction`.
    pub fn look_to(eye: Vec3, direction: Vec3, up: Vec3) -> Mat4 {
        let f = direction.normalize();
        let s = f.cross(&up).normalize();
        let u = s.cross(&f);

        Mat4([
            [s.x(), u.x(), -f.x(), 0.0],
            [s.y(), u.y(), -f.y(), 0.0],
            [s.z(), u.z(), -f.z(), 0.0],
            [-s.dot(&eye), -u.dot(&eye), f.dot(&eye), 1.0],
        ])
    }

    pub fn translation(tx: f32, ty: f32, tz: f32) -> Mat4 {
        let mut m = Self::identity();
        m.0[3] = [tx, ty, tz, 1.0];
        m
    }

    pub fn scaling(sx: f32, sy: f32, sz: f32) -> Mat4 {
        Mat4([
            [sx, 0.0, 0.0, 0.0],
            [0.0, sy, 0.0, 0.0],
            [0.0, 0.0, sz, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Counter-clockwise rotation about +z when looking down from above.
    pub fn rotation_z(angle_in_radians: f32) -> Mat4 {
        let (s, c) = angle_in_radians.sin_cos();
        Mat4([
            [c, s, 0.0, 0.0],
            [-s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Returns `self * other`.
    pub fn multiply(&self, other: &Mat4) -> Mat4 {
        let mut out = [[0.0; 4]; 4];
        for (c, column) in out.iter_mut().enumerate() {
            for (r, value) in column.iter_mut().enumerate() {
                *value = (0..4).map(|k| self.0[k][r] * other.0[c][k]).sum();
            }
        }
        Mat4(out)
    }

    /// Applies the matrix to a point and divides by `w`.
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        let v = [point.x(), point.y(), point.z(), 1.0];
        let mut out = [0.0f32; 4];
        for (r, value) in out.iter_mut().enumerate() {
            *value = (0..4).map(|k| self.0[k][r] * v[k]).sum();
        }
        let w = if out[3] == 0.0 { 1.0 } else { out[3] };
        Vec3::new(out[0] / w, out[1] / w, out[2] / w)
    }

    /// General inverse by cofactor expansion. `None` for singular matrices.
    pub fn inverse(&self) -> Option<Mat4> {
        let m: [f32; 16] = bytemuck::cast(self.0);
        let mut inv = [0.0f32; 16];

        inv[0] = m[5] * m[10] * m[15] - m[5] * m[11] * m[14] - m[9] * m[6] * m[15]
            + m[9] * m[7] * m[14]
            + m[13] * m[6] * m[11]
            - m[13] * m[7] * m[10];
        inv[4] = -m[4] * m[10] * m[15] + m[4] * m[11] * m[14] + m[8] * m[6] * m[15]
            - m[8] * m[7] * m[14]
            - m[12] * m[6] * m[11]
            + m[12] * m[7] * m[10];
        inv[8] = m[4] * m[9] * m[15] - m[4] * m[11] * m[13] - m[8] * m[5] * m[15]
            + m[8] * m[7] * m[13]
            + m[12] * m[5] * m[11]
            - m[12] * m[7] * m[9];
        inv[12] = -m[4] * m[9] * m[14] + m[4] * m[10] * m[13] + m[8] * m[5] * m[14]
            - m[8] * m[6] * m[13]
            - m[12] * m[5] * m[10]
            + m[12] * m[6] * m[9];
        inv[1] = -m[1] * m[10] * m[15] + m[1] * m[11] * m[14] + m[9] * m[2] * m[15]
            - m[9] * m[3] * m[14]
            - m[13] * m[2] * m[11]
            + m[13] * m[3] * m[10];
        inv[5] = m[0] * m[10] * m[15] - m[0] * m[11] * m[14] - m[8] * m[2] * m[15]
            + m[8] * m[3] * m[14]
            + m[12] * m[2] * m[11]
            - m[12] * m[3] * m[10];
        inv[9] = -m[0] * m[9] * m[15] + m[0] * m[11] * m[13] + m[8] * m[1] * m[15]
            - m[8] * m[3] * m[13]
            - m[12] * m[1] * m[11]
            + m[12] * m[3] * m[9];
        inv[13] = m[0] * m[9] * m[14] - m[0] * m[10] * m[13] - m[8] * m[1] * m[14]
            + m[8] * m[2] * m[13]
            + m[12] * m[1] * m[10]
            - m[12] * m[2] * m[9];
        inv[2] = m[1] * m[6] * m[15] - m[1] * m[7] * m[14] - m[5] * m[2] * m[15]
            + m[5] * m[3] * m[14]
            + m[13] * m[2] * m[7]
            - m[13] * m[3] * m[6];
        inv[6] = -m[0] * m[6] * m[15] + m[0] * m[7] * m[14] + m[4] * m[2] * m[15]
            - m[4] * m[3] * m[14]
            - m[12] * m[2] * m[7]
            + m[12] * m[3] * m[6];
        inv[10] = m[0] * m[5] * m[15] - m[0] * m[7] * m[13] - m[4] * m[1] * m[15]
            + m[4] * m[3] * m[13]
            + m[12] * m[1] * m[7]
            - m[12] * m[3] * m[5];
        inv[14] = -m[0] * m[5] * m[14] + m[0] * m[6] * m[13] + m[4] * m[1] * m[14]
            - m[4] * m[2] * m[13]
            - m[12] * m[1] * m[6]
            + m[12] * m[2] * m[5];
        inv[3] = -m[1] * m[6] * m[11] + m[1] * m[7] * m[10] + m[5] * m[2] * m[11]
            - m[5] * m[3] * m[10]
            - m[9] * m[2] * m[7]
            + m[9] * m[3] * m[6];
        inv[7] = m[0] * m[6] * m[11] - m[0] * m[7] * m[10] - m[4] * m[2] * m[11]
            + m[4] * m[3] * m[10]
            + m[8] * m[2] * m[7]
            - m[8] * m[3] * m[6];
        inv[11] = -m[0] * m[5] * m[11] + m[0] * m[7] * m[9] + m[4] * m[1] * m[11]
            - m[4] * m[3] * m[9]
            - m[8] * m[1] * m[7]
            + m[8] * m[3] * m[5];
        inv[15] = m[0] * m[5] * m[10] - m[0] * m[6] * m[9] - m[4] * m[1] * m[10]
            + m[4] * m[2] * m[9]
            + m[8] * m[1] * m[6]
            - m[8] * m[2] * m[5];

        let det = m[0] * inv[0] + m[1] * inv[4] + m[2] * inv[8] + m[3] * inv[12];
        if det.abs() < f32::EPSILON {
            return None;
        }

        let inv_det = 1.0 / det;
        Some(Mat4(bytemuck::cast(inv.map(|value| value * inv_det))))
    }
}

impl From<[[f32; 4]; 4]> for Mat4 {
    fn from(array: [[f32; 4]; 4]) -> Self {
        Mat4(array)
    }
}

impl From<Mat4> for [[f32; 4]; 4] {
    fn from(matrix: Mat4) -> Self {
        matrix.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-4, "{a:?} != {b:?}");
    }

    #[test]
    fn test_multiply_applies_right_operand_first() {
        let m = Mat4::translation(1.0, 0.0, 0.0).multiply(&Mat4::scaling(2.0, 2.0, 2.0));
        assert_close(m.transform_point(Vec3::new(1.0, 1.0, 1.0)), Vec3::new(3.0, 2.0, 2.0));
    }

    #[test]
    fn test_rotation_z_quarter_turn() {
        let m = Mat4::rotation_z(std::f32::consts::FRAC_PI_2);
        assert_close(m.transform_point(Vec3::new(1.0, 0.0, 0.0)), Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_inverse_round_trips_a_view_projection() {
        let view = Mat4::look_to(
            Vec3::new(4.5, -3.0, 8.5),
            Vec3::new(0.0, 7.0, -8.5),
            Vec3::UP,
        );
        let proj = Mat4::perspective(crate::math::deg_to_rad(45.0), 1.5, 0.1, 100.0);
        let view_proj = proj.multiply(&view);
        let inverse = view_proj.inverse().expect("view projection is invertible");

        let point = Vec3::new(2.0, 3.0, 0.0);
        let clip = view_proj.transform_point(point);
        assert_close(inverse.transform_point(clip), point);
    }

    #[test]
    fn test_singular_matrix_has_no_inverse() {
        assert!(Mat4::scaling(1.0, 0.0, 1.0).inverse().is_none());
    }

    #[test]
    fn test_look_to_puts_target_in_front() {
        let view = Mat4::look_to(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 1.0, 0.0));
        let p = view.transform_point(Vec3::ZERO);
        assert_close(p, Vec3::new(0.0, 0.0, -5.0));
    }
}
