//! Ray casting interface used by camera movement and picking
//!
//! Movement code depends on this trait rather than on the k-d tree, so a
//! brute-force caster or a test double can stand in for it.

use crate::physics::Ray;
use super::{KdTreeController, RayHit};

/// Anything that can answer nearest-hit ray queries
pub trait RayCaster {
    /// Nearest hit along `ray` within `max_range`
    fn cast_ray(&self, ray: &Ray, max_range: f32) -> Option<RayHit<'_>>;

    /// Whether anything lies along `ray` within `max_range`
    fn is_blocked(&self, ray: &Ray, max_range: f32) -> bool {
        self.cast_ray(ray, max_range).is_some()
    }
}

impl RayCaster for KdTreeController {
    fn cast_ray(&self, ray: &Ray, max_range: f32) -> Option<RayHit<'_>> {
        self.hit(ray, max_range)
    }
}
