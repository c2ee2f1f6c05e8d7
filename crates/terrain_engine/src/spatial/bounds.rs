//! Axis-aligned bounding volumes for k-d tree nodes

use crate::foundation::math::{Vec3, EPSILON};
use crate::physics::{Ray, Triangle};
use super::SpatialError;

/// Coordinate axis used to split a k-d tree node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// X axis
    X,
    /// Y axis
    Y,
    /// Z axis
    Z,
}

impl Axis {
    /// Component index of this axis in a vector
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Tightest axis-aligned box around a set of triangles
///
/// Always built from at least one triangle, so `min <= max` holds on every
/// axis. Zero extent on an axis is valid (coplanar geometry).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingVolume {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl BoundingVolume {
    /// Bound every vertex of the given triangles
    ///
    /// Fails with [`SpatialError::InvalidArgument`] when no triangle is given.
    pub fn from_triangles<'a, I>(triangles: I) -> Result<Self, SpatialError>
    where
        I: IntoIterator<Item = &'a Triangle>,
    {
        let mut triangles = triangles.into_iter();
        let first = triangles.next().ok_or_else(|| {
            SpatialError::InvalidArgument("bounding volume needs at least one triangle".to_string())
        })?;

        let mut bounds = Self { min: first.v0, max: first.v0 };
        bounds.grow(first);
        for triangle in triangles {
            bounds.grow(triangle);
        }
        Ok(bounds)
    }

    fn grow(&mut self, triangle: &Triangle) {
        for vertex in triangle.vertices() {
            self.min = self.min.inf(&vertex);
            self.max = self.max.sup(&vertex);
        }
    }

    /// Size of the box on each axis
    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    /// Get the center of the box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Axis with the largest extent; ties resolve X before Y before Z
    pub fn longest_axis(&self) -> Axis {
        let extent = self.extent();
        if extent.x >= extent.y && extent.x >= extent.z {
            Axis::X
        } else if extent.y >= extent.z {
            Axis::Y
        } else {
            Axis::Z
        }
    }

    /// Check if this box contains a point (boundary inclusive)
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y &&
        point.z >= self.min.z && point.z <= self.max.z
    }

    /// Check if this box fully contains another
    pub fn contains(&self, other: &BoundingVolume) -> bool {
        self.contains_point(other.min) && self.contains_point(other.max)
    }

    /// Test ray intersection with this box using the slab method
    ///
    /// Returns the entry and exit distances along the ray. Entry is clamped
    /// to zero when the origin is inside the box; boxes entirely behind the
    /// origin miss. An axis the ray is parallel to is never divided by: the
    /// ray overlaps that slab only if its origin already lies within it.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<(f32, f32)> {
        let mut t_enter = 0.0_f32;
        let mut t_exit = f32::INFINITY;

        for axis in 0..3 {
            let origin = ray.origin[axis];
            let direction = ray.direction[axis];
            let (low, high) = (self.min[axis], self.max[axis]);

            if direction.abs() < EPSILON {
                if origin < low || origin > high {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / direction;
            let mut t0 = (low - origin) * inv;
            let mut t1 = (high - origin) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }

            t_enter = t_enter.max(t0);
            t_exit = t_exit.min(t1);
            if t_enter > t_exit {
                return None;
            }
        }

        Some((t_enter, t_exit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_box() -> BoundingVolume {
        BoundingVolume {
            min: Vec3::new(-1.0, -1.0, -1.0),
            max: Vec3::new(1.0, 1.0, 1.0),
        }
    }

    #[test]
    fn test_from_triangles_is_tight() {
        let tris = [
            Triangle::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)),
            Triangle::new(Vec3::new(-1.0, 0.5, 3.0), Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, -4.0, 0.0)),
        ];
        let bounds = BoundingVolume::from_triangles(&tris).unwrap();

        assert_eq!(bounds.min, Vec3::new(-1.0, -4.0, 0.0));
        assert_eq!(bounds.max, Vec3::new(2.0, 1.0, 3.0));
        for tri in &tris {
            for vertex in tri.vertices() {
                assert!(bounds.contains_point(vertex));
            }
        }
    }

    #[test]
    fn test_empty_set_is_invalid() {
        let result = BoundingVolume::from_triangles(std::iter::empty());
        assert!(matches!(result, Err(SpatialError::InvalidArgument(_))));
    }

    #[test]
    fn test_longest_axis() {
        let flat = BoundingVolume { min: Vec3::zeros(), max: Vec3::new(10.0, 1.0, 4.0) };
        assert_eq!(flat.longest_axis(), Axis::X);

        let deep = BoundingVolume { min: Vec3::zeros(), max: Vec3::new(1.0, 2.0, 4.0) };
        assert_eq!(deep.longest_axis(), Axis::Z);
    }

    #[test]
    fn test_longest_axis_tie_priority() {
        let cube = BoundingVolume { min: Vec3::zeros(), max: Vec3::new(1.0, 1.0, 1.0) };
        assert_eq!(cube.longest_axis(), Axis::X);

        let yz = BoundingVolume { min: Vec3::zeros(), max: Vec3::new(0.5, 2.0, 2.0) };
        assert_eq!(yz.longest_axis(), Axis::Y);

        let point = BoundingVolume { min: Vec3::zeros(), max: Vec3::zeros() };
        assert_eq!(point.longest_axis(), Axis::X);
    }

    #[test]
    fn test_ray_entry_and_exit() {
        let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        let (enter, exit) = unit_box().intersect_ray(&ray).unwrap();
        assert_relative_eq!(enter, 4.0);
        assert_relative_eq!(exit, 6.0);
    }

    #[test]
    fn test_ray_from_inside_enters_at_zero() {
        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 1.0, 0.0));
        let (enter, exit) = unit_box().intersect_ray(&ray).unwrap();
        assert_eq!(enter, 0.0);
        assert_relative_eq!(exit, 1.0);
    }

    #[test]
    fn test_box_behind_ray_misses() {
        let ray = Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(unit_box().intersect_ray(&ray).is_none());
    }

    #[test]
    fn test_axis_parallel_ray_uses_origin_containment() {
        let inside_slab = Ray::new(Vec3::new(0.5, 0.5, -5.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(unit_box().intersect_ray(&inside_slab).is_some());

        let outside_slab = Ray::new(Vec3::new(2.0, 0.5, -5.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(unit_box().intersect_ray(&outside_slab).is_none());
    }

    #[test]
    fn test_flat_box_is_hit_without_nan() {
        let flat = BoundingVolume {
            min: Vec3::new(-1.0, -1.0, 0.0),
            max: Vec3::new(1.0, 1.0, 0.0),
        };
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
        let (enter, exit) = flat.intersect_ray(&ray).unwrap();
        assert_relative_eq!(enter, 5.0);
        assert_relative_eq!(exit, 5.0);

        let grazing = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(flat.intersect_ray(&grazing).is_none());
    }

    #[test]
    fn test_contains_box() {
        let inner = BoundingVolume { min: Vec3::new(-0.5, 0.0, 0.0), max: Vec3::new(0.5, 1.0, 0.25) };
        assert!(unit_box().contains(&inner));
        assert!(!inner.contains(&unit_box()));
    }
}
