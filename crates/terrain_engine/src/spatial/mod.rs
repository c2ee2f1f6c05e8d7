//! Spatial partitioning data structures
//!
//! A k-d tree over world-space terrain triangles, rebuilt lazily whenever
//! the terrain is regenerated, answering first-hit and exhaustive ray
//! queries for camera movement blocking and shoot picking.
//!
//! # Module Organization
//!
//! - [`triangle_store`] - flat triangle collection fed by terrain generation
//! - [`bounds`] - axis-aligned bounding volumes and the slab test
//! - [`kd_tree`] - arena of nodes built by median split on the longest axis
//! - [`ray_query`] - one traversal routine shared by every ray query
//! - [`controller`] - dirty tracking, lazy rebuild and query dispatch
//! - [`ray_caster`] - the query interface movement code depends on

mod error;
pub mod triangle_store;
pub mod bounds;
pub mod kd_tree;
pub mod ray_query;
pub mod controller;
pub mod ray_caster;

pub use error::SpatialError;
pub use triangle_store::{TriangleStore, TriangleId};
pub use bounds::{Axis, BoundingVolume};
pub use kd_tree::{KdTree, KdNode, NodeId, NodeKind, TreeStats};
pub use ray_query::{RayHit, TraversalPolicy};
pub use controller::{KdTreeController, KD_TREE_DEBUG_LAYER};
pub use ray_caster::RayCaster;
