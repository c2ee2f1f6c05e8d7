//! Ray queries against a built [`KdTree`]
//!
//! Every query runs the same recursive traversal. The [`TraversalPolicy`]
//! only decides which subtrees may be skipped:
//!
//! - [`TraversalPolicy::NearestFirst`] skips a subtree once its entry
//!   distance lies beyond the best hit found so far
//! - [`TraversalPolicy::Exhaustive`] visits every subtree the ray touches
//!
//! Both policies treat the ray as a segment of length `max_range` and visit
//! the nearer child first.

use crate::foundation::math::Vec3;
use crate::physics::{Ray, Triangle};
use super::{BoundingVolume, KdTree, NodeId, NodeKind, TriangleId};

/// Subtree pruning rule for a traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraversalPolicy {
    /// Prune subtrees that start beyond the current best hit
    #[default]
    NearestFirst,
    /// Visit every subtree the ray segment intersects
    Exhaustive,
}

/// Result of a successful ray query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit<'a> {
    /// Triangle that was hit
    pub triangle: &'a Triangle,
    /// Id of that triangle in the triangle store
    pub triangle_id: TriangleId,
    /// World-space distance from the ray origin
    pub distance: f32,
    /// World-space hit point
    pub point: Vec3,
    /// Bounding volume of the leaf that held the triangle
    pub bounds: &'a BoundingVolume,
}

struct HitCollector<'a> {
    policy: TraversalPolicy,
    max_range: f32,
    best: Option<RayHit<'a>>,
    all: Option<Vec<RayHit<'a>>>,
}

impl<'a> HitCollector<'a> {
    fn new(policy: TraversalPolicy, max_range: f32, collect_all: bool) -> Self {
        Self {
            policy,
            max_range,
            best: None,
            all: collect_all.then(Vec::new),
        }
    }

    /// Furthest entry distance a subtree may have and still be visited
    fn bound(&self) -> f32 {
        match (self.policy, &self.best) {
            (TraversalPolicy::NearestFirst, Some(best)) => best.distance.min(self.max_range),
            _ => self.max_range,
        }
    }

    fn record(&mut self, hit: RayHit<'a>) {
        if let Some(all) = self.all.as_mut() {
            all.push(hit);
        }
        // Strict comparison: the first of equally distant hits wins
        if self.best.map_or(true, |best| hit.distance < best.distance) {
            self.best = Some(hit);
        }
    }
}

impl KdTree {
    /// Nearest triangle hit within `max_range`, pruning as it goes
    ///
    /// `triangles` must be the slice the tree was built from.
    pub fn hit<'a>(&'a self, triangles: &'a [Triangle], ray: &Ray, max_range: f32) -> Option<RayHit<'a>> {
        self.query(triangles, ray, max_range, TraversalPolicy::NearestFirst)
    }

    /// Nearest triangle hit within `max_range`, testing every reachable leaf
    pub fn hit_check_all<'a>(
        &'a self,
        triangles: &'a [Triangle],
        ray: &Ray,
        max_range: f32,
    ) -> Option<RayHit<'a>> {
        self.query(triangles, ray, max_range, TraversalPolicy::Exhaustive)
    }

    /// Nearest triangle hit under an explicit traversal policy
    pub fn query<'a>(
        &'a self,
        triangles: &'a [Triangle],
        ray: &Ray,
        max_range: f32,
        policy: TraversalPolicy,
    ) -> Option<RayHit<'a>> {
        let mut collector = HitCollector::new(policy, max_range, false);
        self.traverse(triangles, ray, &mut collector);
        collector.best
    }

    /// Every triangle hit within `max_range`, nearest first
    pub fn hit_all<'a>(&'a self, triangles: &'a [Triangle], ray: &Ray, max_range: f32) -> Vec<RayHit<'a>> {
        let mut collector = HitCollector::new(TraversalPolicy::Exhaustive, max_range, true);
        self.traverse(triangles, ray, &mut collector);
        let mut hits = collector.all.unwrap_or_default();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    fn traverse<'a>(&'a self, triangles: &'a [Triangle], ray: &Ray, collector: &mut HitCollector<'a>) {
        // Negative or NaN ranges cannot contain a hit
        if !(collector.max_range >= 0.0) {
            return;
        }
        let root = self.root();
        match self.node(root).bounds.intersect_ray(ray) {
            Some((entry, _)) if entry <= collector.bound() => {
                self.visit(root, triangles, ray, collector);
            }
            _ => {}
        }
    }

    fn visit<'a>(&'a self, id: NodeId, triangles: &'a [Triangle], ray: &Ray, collector: &mut HitCollector<'a>) {
        let node = self.node(id);
        match &node.kind {
            NodeKind::Leaf { triangles: ids } => {
                for &triangle_id in ids {
                    // A stale tree may outlive some of its triangles
                    let Some(triangle) = triangles.get(triangle_id.index()) else {
                        continue;
                    };
                    let Some((distance, _, _)) = triangle.intersect_ray(ray) else {
                        continue;
                    };
                    if distance > collector.max_range {
                        continue;
                    }
                    collector.record(RayHit {
                        triangle,
                        triangle_id,
                        distance,
                        point: ray.point_at(distance),
                        bounds: &node.bounds,
                    });
                }
            }
            NodeKind::Branch { left, right, .. } => {
                let left_entry = self.node(*left).bounds.intersect_ray(ray).map(|(t, _)| t);
                let right_entry = self.node(*right).bounds.intersect_ray(ray).map(|(t, _)| t);

                let mut order = [(left_entry, *left), (right_entry, *right)];
                if let (Some(l), Some(r)) = (left_entry, right_entry) {
                    if r < l {
                        order.swap(0, 1);
                    }
                }

                for (entry, child) in order {
                    // The bound is re-read so hits from the near child prune the far one
                    if let Some(entry) = entry {
                        if entry <= collector.bound() {
                            self.visit(child, triangles, ray, collector);
                        }
                    }
                }
            }
        }
    }
}
