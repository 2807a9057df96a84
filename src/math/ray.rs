use crate::math::vec::Vec3;

/// A half-line used for cursor picking.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Not necessarily normalized; distances returned are in units of this vector.
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Point where the ray crosses the plane `z = height`, if it does so in front
    /// of the origin.
    pub fn intersect_z_plane(&self, height: f32) -> Option<Vec3> {
        let dz = self.direction.z();
        if dz.abs() < f32::EPSILON {
            return None;
        }
        let t = (height - self.origin.z()) / dz;
        (t >= 0.0).then(|| self.at(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_hit_from_above() {
        let ray = Ray::new(Vec3::new(2.0, 3.0, 4.0), Vec3::new(0.0, 0.0, -2.0));
        assert_eq!(ray.intersect_z_plane(0.0), Some(Vec3::new(2.0, 3.0, 0.0)));
    }

    #[test]
    fn test_plane_behind_or_parallel_misses() {
        let up = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(up.intersect_z_plane(0.0), None);
        let flat = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(flat.intersect_z_plane(0.0), None);
    }
}
