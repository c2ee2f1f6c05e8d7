//! Primitive collision shapes and intersection algorithms
//!
//! Provides rays and triangles with divide-safe intersection testing.

use crate::foundation::math::{Vec3, EPSILON};

/// A ray for ray casting and picking
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec3,
    /// The direction of the ray (unit length, or zero for a degenerate ray)
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray with the given origin and direction
    ///
    /// The direction is normalized so that every distance reported along the
    /// ray is a world-space distance. A zero direction stays zero and never
    /// intersects a triangle.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.try_normalize(EPSILON).unwrap_or_else(Vec3::zeros),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// A triangle for collision detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// Triangle vertices in world space
    pub v0: Vec3,
    /// Second vertex
    pub v1: Vec3,
    /// Third vertex
    pub v2: Vec3,
}

impl Triangle {
    /// Creates a new triangle
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self { v0, v1, v2 }
    }

    /// The three vertices in winding order
    pub fn vertices(&self) -> [Vec3; 3] {
        [self.v0, self.v1, self.v2]
    }

    /// Arithmetic mean of the three vertices
    pub fn barycenter(&self) -> Vec3 {
        (self.v0 + self.v1 + self.v2) / 3.0
    }

    /// Calculates the normal of the triangle (right-hand rule)
    ///
    /// Zero-area triangles have no defined normal and return zero.
    pub fn normal(&self) -> Vec3 {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;
        edge1.cross(&edge2).try_normalize(EPSILON).unwrap_or_else(Vec3::zeros)
    }

    /// Whether every vertex component is finite
    pub fn is_finite(&self) -> bool {
        self.vertices().iter().all(|v| v.iter().all(|c| c.is_finite()))
    }

    /// Möller-Trumbore ray-triangle intersection algorithm
    /// Returns (t, u, v) with t the distance along the ray if hit, None otherwise
    ///
    /// A determinant that is near zero relative to the edge lengths means the
    /// ray is parallel to the triangle's plane or the triangle has no area;
    /// both are misses. Hits behind the origin are rejected.
    /// See: "Fast, Minimum Storage Ray/Triangle Intersection" by Möller & Trumbore
    pub fn intersect_ray(&self, ray: &Ray) -> Option<(f32, f32, f32)> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = ray.direction.cross(&edge2);
        let a = edge1.dot(&h);

        // |a| is at most |edge1| * |edge2| for a unit direction
        if a.abs() <= EPSILON * edge1.norm() * edge2.norm() {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin - self.v0;
        let u = f * s.dot(&h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(&edge1);
        let v = f * ray.direction.dot(&q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(&q);
        if t >= 0.0 {
            Some((t, u, v))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn floor_triangle() -> Triangle {
        Triangle::new(
            Vec3::new(-1.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, -1.0),
            Vec3::new(0.0, 0.0, 1.0),
        )
    }

    #[test]
    fn test_ray_direction_is_normalized() {
        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, 10.0));
        assert_relative_eq!(ray.direction, Vec3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(ray.point_at(2.0), Vec3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn test_zero_direction_never_hits() {
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::zeros());
        assert_eq!(ray.direction, Vec3::zeros());
        assert!(floor_triangle().intersect_ray(&ray).is_none());
    }

    #[test]
    fn test_barycenter() {
        let tri = Triangle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(0.0, 3.0, 3.0),
        );
        assert_relative_eq!(tri.barycenter(), Vec3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_hit_from_above() {
        let ray = Ray::new(Vec3::new(0.0, 4.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        let (t, _, _) = floor_triangle().intersect_ray(&ray).unwrap();
        assert_relative_eq!(t, 4.0, epsilon = 1e-5);
    }

    #[test]
    fn test_hit_behind_origin_rejected() {
        let ray = Ray::new(Vec3::new(0.0, 4.0, 0.0), Vec3::new(0.0, 1.0, 0.0));
        assert!(floor_triangle().intersect_ray(&ray).is_none());
    }

    #[test]
    fn test_parallel_ray_misses() {
        let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(floor_triangle().intersect_ray(&ray).is_none());
    }

    #[test]
    fn test_zero_area_triangle_misses() {
        let sliver = Triangle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
        );
        let ray = Ray::new(Vec3::new(1.0, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        assert!(sliver.intersect_ray(&ray).is_none());
        assert_eq!(sliver.normal(), Vec3::zeros());
    }

    #[test]
    fn test_sub_millimetre_triangle_hit_head_on() {
        let s = 5e-4;
        let tiny = Triangle::new(Vec3::zeros(), Vec3::new(s, 0.0, 0.0), Vec3::new(0.0, s, 0.0));
        let ray = Ray::new(Vec3::new(s / 4.0, s / 4.0, -1.0), Vec3::new(0.0, 0.0, 1.0));

        let (t, u, v) = tiny.intersect_ray(&ray).unwrap();
        assert_relative_eq!(t, 1.0, epsilon = 1e-6);
        assert_relative_eq!(u, 0.25, epsilon = 1e-3);
        assert_relative_eq!(v, 0.25, epsilon = 1e-3);
    }

    #[test]
    fn test_grazing_ray_on_tiny_triangle_misses() {
        let s = 5e-4;
        let tiny = Triangle::new(Vec3::zeros(), Vec3::new(s, 0.0, 0.0), Vec3::new(0.0, s, 0.0));
        let ray = Ray::new(Vec3::new(-1.0, s / 4.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(tiny.intersect_ray(&ray).is_none());
    }

    #[test]
    fn test_non_finite_vertex_detected() {
        let mut tri = floor_triangle();
        assert!(tri.is_finite());
        tri.v2.y = f32::NAN;
        assert!(!tri.is_finite());
    }
}
