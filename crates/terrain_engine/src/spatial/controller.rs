//! Tree lifecycle: dirty tracking, deferred rebuild and query dispatch
//!
//! Geometry changes only mark the tree dirty. The rebuild happens in
//! [`KdTreeController::update_kd_tree`], which the frame loop calls once per
//! tick, so a burst of adds costs a single build.

use std::cell::Cell;

use crate::core::config::KdTreeConfig;
use crate::debug::{DebugDrawSystem, DebugShape};
use crate::foundation::math::Vec4;
use crate::foundation::time::Stopwatch;
use crate::physics::{Ray, Triangle};
use super::{KdTree, RayHit, SpatialError, TreeStats, TriangleId, TriangleStore};

/// Debug layer the tree overlay is written to
pub const KD_TREE_DEBUG_LAYER: &str = "kd_tree";

/// Owns the triangle store and the k-d tree built over it
#[derive(Debug, Default)]
pub struct KdTreeController {
    config: KdTreeConfig,
    store: TriangleStore,
    tree: Option<KdTree>,
    dirty: bool,
    stale_warned: Cell<bool>,
}

impl KdTreeController {
    /// Create an empty controller with the given build policy
    pub fn new(config: KdTreeConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Append one triangle and mark the tree dirty
    pub fn add_triangle(&mut self, triangle: Triangle) -> Result<TriangleId, SpatialError> {
        let id = self.store.add(triangle)?;
        self.mark_kd_tree_dirty();
        Ok(id)
    }

    /// Append a batch of triangles and mark the tree dirty
    ///
    /// Nothing is appended if any triangle in the batch is invalid.
    pub fn add_triangles(&mut self, triangles: &[Triangle]) -> Result<usize, SpatialError> {
        let added = self.store.add_all(triangles)?;
        self.mark_kd_tree_dirty();
        Ok(added)
    }

    /// Remove every triangle and mark the tree dirty
    ///
    /// The old tree is dropped immediately since its triangle ids no longer
    /// refer to anything; queries report no-hit until the next rebuild.
    pub fn purge_triangles(&mut self) {
        self.store.purge();
        self.tree = None;
        self.mark_kd_tree_dirty();
    }

    /// Request a rebuild on the next [`update_kd_tree`](Self::update_kd_tree)
    pub fn mark_kd_tree_dirty(&mut self) {
        self.dirty = true;
        self.stale_warned.set(false);
    }

    /// Rebuild the tree if it is dirty
    ///
    /// Returns `true` when a rebuild took place. An empty store leaves no
    /// tree, against which every query reports no-hit. On error the tree
    /// stays dirty.
    pub fn update_kd_tree(&mut self) -> Result<bool, SpatialError> {
        if !self.dirty {
            return Ok(false);
        }

        if self.store.is_empty() {
            self.tree = None;
            log::debug!("K-d tree cleared: no triangles");
        } else {
            let stopwatch = Stopwatch::start_new();
            let tree = KdTree::build(self.store.triangles(), &self.config)?;
            let stats = tree.stats();
            log::debug!(
                "K-d tree rebuilt in {:.2}ms: {} triangles, {} nodes, {} leaves, depth {}",
                stopwatch.elapsed_millis(),
                stats.triangle_count,
                stats.node_count,
                stats.leaf_count,
                stats.max_depth
            );
            self.tree = Some(tree);
        }

        self.dirty = false;
        self.stale_warned.set(false);
        Ok(true)
    }

    /// Nearest hit within `max_range`, pruning subtrees beyond the best hit
    pub fn hit(&self, ray: &Ray, max_range: f32) -> Option<RayHit<'_>> {
        self.warn_if_stale();
        self.tree.as_ref()?.hit(self.store.triangles(), ray, max_range)
    }

    /// Nearest hit within `max_range`, visiting every subtree the ray crosses
    pub fn hit_check_all(&self, ray: &Ray, max_range: f32) -> Option<RayHit<'_>> {
        self.warn_if_stale();
        self.tree.as_ref()?.hit_check_all(self.store.triangles(), ray, max_range)
    }

    /// Every hit within `max_range`, nearest first
    pub fn hit_all(&self, ray: &Ray, max_range: f32) -> Vec<RayHit<'_>> {
        self.warn_if_stale();
        match &self.tree {
            Some(tree) => tree.hit_all(self.store.triangles(), ray, max_range),
            None => Vec::new(),
        }
    }

    /// Fail with [`SpatialError::StaleQuery`] if geometry changed since the last rebuild
    pub fn check_fresh(&self) -> Result<(), SpatialError> {
        if self.dirty {
            Err(SpatialError::StaleQuery)
        } else {
            Ok(())
        }
    }

    /// Whether geometry changed since the last rebuild
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Current tree, if any geometry was indexed
    pub fn tree(&self) -> Option<&KdTree> {
        self.tree.as_ref()
    }

    /// Triangle storage
    pub fn store(&self) -> &TriangleStore {
        &self.store
    }

    /// Build policy
    pub fn config(&self) -> &KdTreeConfig {
        &self.config
    }

    /// Shape of the current tree
    pub fn stats(&self) -> Option<TreeStats> {
        self.tree.as_ref().map(KdTree::stats)
    }

    /// Number of stored triangles
    pub fn triangle_count(&self) -> usize {
        self.store.len()
    }

    /// Write one box per tree node to the k-d tree debug layer
    ///
    /// Deeper nodes fade from red towards blue.
    pub fn debug_draw(&self, debug: &mut DebugDrawSystem) {
        let Some(tree) = &self.tree else {
            debug.clear_layer(KD_TREE_DEBUG_LAYER);
            return;
        };
        let max_depth = tree.stats().max_depth.max(1) as f32;
        let shapes = tree
            .nodes()
            .iter()
            .map(|node| {
                let t = node.depth as f32 / max_depth;
                DebugShape::bounds(&node.bounds, Vec4::new(1.0 - t, 0.2, t, 1.0))
            })
            .collect();
        debug.set_layer(KD_TREE_DEBUG_LAYER, shapes);
    }

    fn warn_if_stale(&self) {
        if self.dirty && !self.stale_warned.replace(true) {
            log::warn!("{}", SpatialError::StaleQuery);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use approx::assert_relative_eq;

    fn floor(y: f32) -> [Triangle; 2] {
        [
            Triangle::new(Vec3::new(-10.0, y, -10.0), Vec3::new(10.0, y, -10.0), Vec3::new(-10.0, y, 10.0)),
            Triangle::new(Vec3::new(10.0, y, -10.0), Vec3::new(10.0, y, 10.0), Vec3::new(-10.0, y, 10.0)),
        ]
    }

    fn down_from(height: f32) -> Ray {
        Ray::new(Vec3::new(1.0, height, 1.0), Vec3::new(0.0, -1.0, 0.0))
    }

    #[test]
    fn test_new_controller_reports_no_hit() {
        let controller = KdTreeController::default();
        assert!(!controller.is_dirty());
        assert!(controller.hit(&down_from(5.0), 100.0).is_none());
        assert!(controller.stats().is_none());
    }

    #[test]
    fn test_add_marks_dirty_and_update_rebuilds_once() {
        let mut controller = KdTreeController::default();
        controller.add_triangles(&floor(0.0)).unwrap();
        controller.add_triangle(floor(1.0)[0]).unwrap();
        assert!(controller.is_dirty());
        assert_eq!(controller.check_fresh(), Err(SpatialError::StaleQuery));

        assert_eq!(controller.update_kd_tree(), Ok(true));
        assert_eq!(controller.update_kd_tree(), Ok(false));
        assert!(controller.check_fresh().is_ok());
        assert_eq!(controller.stats().unwrap().triangle_count, 3);
    }

    #[test]
    fn test_query_after_update_hits_floor() {
        let mut controller = KdTreeController::default();
        controller.add_triangles(&floor(0.0)).unwrap();
        controller.update_kd_tree().unwrap();

        let hit = controller.hit(&down_from(5.0), 100.0).unwrap();
        assert_relative_eq!(hit.distance, 5.0, epsilon = 1e-5);
        let hit = controller.hit_check_all(&down_from(5.0), 100.0).unwrap();
        assert_relative_eq!(hit.point, Vec3::new(1.0, 0.0, 1.0), epsilon = 1e-5);
    }

    #[test]
    fn test_stale_query_uses_previous_tree() {
        let mut controller = KdTreeController::default();
        controller.add_triangles(&floor(0.0)).unwrap();
        controller.update_kd_tree().unwrap();

        controller.add_triangles(&floor(3.0)).unwrap();
        let hit = controller.hit(&down_from(5.0), 100.0).unwrap();
        assert_relative_eq!(hit.distance, 5.0, epsilon = 1e-5);

        controller.update_kd_tree().unwrap();
        let hit = controller.hit(&down_from(5.0), 100.0).unwrap();
        assert_relative_eq!(hit.distance, 2.0, epsilon = 1e-5);
    }

    #[test]
    fn test_purge_then_update_reports_no_hit() {
        let mut controller = KdTreeController::default();
        controller.add_triangles(&floor(0.0)).unwrap();
        controller.update_kd_tree().unwrap();

        controller.purge_triangles();
        assert!(controller.is_dirty());
        assert!(controller.hit(&down_from(5.0), 100.0).is_none());

        assert_eq!(controller.update_kd_tree(), Ok(true));
        assert!(controller.tree().is_none());
        assert_eq!(controller.triangle_count(), 0);
        assert!(controller.hit_all(&down_from(5.0), 100.0).is_empty());
    }

    #[test]
    fn test_regenerate_replaces_geometry() {
        let mut controller = KdTreeController::default();
        controller.add_triangles(&floor(0.0)).unwrap();
        controller.update_kd_tree().unwrap();

        controller.purge_triangles();
        controller.add_triangles(&floor(-2.0)).unwrap();
        controller.update_kd_tree().unwrap();

        let hits = controller.hit_all(&down_from(5.0), 100.0);
        assert_eq!(hits.len(), 1);
        assert_relative_eq!(hits[0].distance, 7.0, epsilon = 1e-5);
    }

    #[test]
    fn test_invalid_batch_leaves_state_unchanged() {
        let mut controller = KdTreeController::default();
        let mut bad = floor(0.0);
        bad[1].v2.x = f32::NAN;

        assert_eq!(controller.add_triangles(&bad), Err(SpatialError::DataError { index: 1 }));
        assert!(!controller.is_dirty());
        assert_eq!(controller.triangle_count(), 0);
    }

    #[test]
    fn test_invalid_config_keeps_tree_dirty() {
        let mut controller = KdTreeController::new(KdTreeConfig::default().with_leaf_threshold(0));
        controller.add_triangles(&floor(0.0)).unwrap();

        assert!(matches!(controller.update_kd_tree(), Err(SpatialError::InvalidArgument(_))));
        assert!(controller.is_dirty());
    }

    #[test]
    fn test_debug_draw_emits_one_box_per_node() {
        let mut controller = KdTreeController::default();
        controller.add_triangles(&floor(0.0)).unwrap();
        controller.add_triangles(&floor(2.0)).unwrap();
        controller.update_kd_tree().unwrap();

        let mut debug = DebugDrawSystem::new();
        controller.debug_draw(&mut debug);
        let nodes = controller.stats().unwrap().node_count;
        assert_eq!(debug.layer(KD_TREE_DEBUG_LAYER).len(), nodes);

        controller.purge_triangles();
        controller.update_kd_tree().unwrap();
        controller.debug_draw(&mut debug);
        assert!(debug.layer(KD_TREE_DEBUG_LAYER).is_empty());
    }
}
