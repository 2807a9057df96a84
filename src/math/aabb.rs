//! Axis-aligned bounding boxes for picking.

use crate::math::mat::Mat4;
use crate::math::ray::Ray;
use crate::math::vec::Vec3;

/// Axis-aligned bounding box defined by its minimum and maximum corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl Aabb {
    pub fn new(min: [f32; 3], max: [f32; 3]) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point, or `None` for no points.
    pub fn from_points<I: IntoIterator<Item = [f32; 3]>>(points: I) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut aabb = Self::new(first, first);
        for point in points {
            aabb.expand(point);
        }
        Some(aabb)
    }

    /// Grows the box to include `point`.
    pub fn expand(&mut self, point: [f32; 3]) {
        for axis in 0..3 {
            self.min[axis] = self.min[axis].min(point[axis]);
            self.max[axis] = self.max[axis].max(point[axis]);
        }
    }

    pub fn size(&self) -> [f32; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    pub fn center(&self) -> [f32; 3] {
        [
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
            (self.min[2] + self.max[2]) * 0.5,
        ]
    }

    /// World-space box enclosing this box after `transform` is applied.
    pub fn transformed(&self, transform: &Mat4) -> Self {
        let corners = (0..8).map(|i| {
            let pick = |axis: usize| {
                if i & (1 << axis) == 0 {
                    self.min[axis]
                } else {
                    self.max[axis]
                }
            };
            transform
                .transform_point(Vec3::new(pick(0), pick(1), pick(2)))
                .0
        });
        // eight corners, never empty
        Self::from_points(corners).unwrap_or(*self)
    }

    /// Slab test. Returns the ray parameter of the entry point, or of the
    /// origin when it starts inside the box.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let mut t_min = 0.0f32;
        let mut t_max = f32::INFINITY;

        for axis in 0..3 {
            let origin = ray.origin.0[axis];
            let direction = ray.direction.0[axis];
            if direction.abs() < f32::EPSILON {
                if origin < self.min[axis] || origin > self.max[axis] {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / direction;
            let mut t0 = (self.min[axis] - origin) * inv;
            let mut t1 = (self.max[axis] - origin) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }
        Some(t_min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb::new([0.0, 0.0, 0.0], [1.0, 1.0, 1.0])
    }

    #[test]
    fn test_ray_hits_box_from_above() {
        let ray = Ray::new(Vec3::new(0.5, 0.5, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(unit_box().intersect_ray(&ray), Some(4.0));
    }

    #[test]
    fn test_ray_misses_box() {
        let ray = Ray::new(Vec3::new(2.0, 0.5, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(unit_box().intersect_ray(&ray), None);
        let behind = Ray::new(Vec3::new(0.5, 0.5, 5.0), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(unit_box().intersect_ray(&behind), None);
    }

    #[test]
    fn test_transformed_box_follows_translation() {
        let moved = unit_box().transformed(&Mat4::translation(3.0, 4.0, 0.0));
        assert_eq!(moved.min, [3.0, 4.0, 0.0]);
        assert_eq!(moved.max, [4.0, 5.0, 1.0]);
    }

    #[test]
    fn test_from_points() {
        let aabb = Aabb::from_points([[1.0, -1.0, 0.0], [-2.0, 3.0, 0.5]]).expect("two points");
        assert_eq!(aabb.min, [-2.0, -1.0, 0.0]);
        assert_eq!(aabb.max, [1.0, 3.0, 0.5]);
        assert_eq!(aabb.center(), [-0.5, 1.0, 0.25]);
        assert!(Aabb::from_points(std::iter::empty()).is_none());
    }
}
