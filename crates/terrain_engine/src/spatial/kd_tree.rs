//! K-d tree over world-space triangles
//!
//! Built top-down in one recursive pass: each node bounds its triangles,
//! picks the bounding volume's longest axis, orders the triangles by
//! barycenter along it and hands the lower and upper halves to two new
//! children. Nodes live in a flat arena addressed by [`NodeId`]; traversal
//! only ever goes root to leaf, so no parent links are kept.
//!
//! Every triangle id is moved into exactly one leaf: the id vector of a
//! node is split in two and each half is given to one child, so a triangle
//! cannot end up in two leaves.

use std::cmp::Ordering;

use crate::core::config::KdTreeConfig;
use crate::foundation::math::Vec3;
use crate::physics::Triangle;
use super::{Axis, BoundingVolume, SpatialError, TriangleId};

/// Index of a node in the tree's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Position of the node in the arena
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Routing or storage role of a node
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Terminal node owning its triangles
    Leaf {
        /// Triangles governed by this leaf
        triangles: Vec<TriangleId>,
    },
    /// Pure routing node; always has both children
    Branch {
        /// Axis the triangles were ordered along
        axis: Axis,
        /// Child holding the lower half along `axis`
        left: NodeId,
        /// Child holding the upper half along `axis`
        right: NodeId,
    },
}

/// Single node in the k-d tree
#[derive(Debug, Clone, PartialEq)]
pub struct KdNode {
    /// Box around every triangle below this node
    pub bounds: BoundingVolume,
    /// Depth in the tree (0 = root)
    pub depth: u32,
    /// Leaf payload or child links
    pub kind: NodeKind,
}

impl KdNode {
    /// Check if this node is a leaf
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    /// Triangles stored directly in this node (empty for branches)
    pub fn triangles(&self) -> &[TriangleId] {
        match &self.kind {
            NodeKind::Leaf { triangles } => triangles,
            NodeKind::Branch { .. } => &[],
        }
    }

    /// Left and right children of a branch
    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        match self.kind {
            NodeKind::Branch { left, right, .. } => Some((left, right)),
            NodeKind::Leaf { .. } => None,
        }
    }
}

/// Shape summary of a built tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TreeStats {
    /// Triangles indexed by the tree
    pub triangle_count: usize,
    /// Nodes in the arena
    pub node_count: usize,
    /// Leaf nodes
    pub leaf_count: usize,
    /// Deepest node depth
    pub max_depth: u32,
}

/// K-d tree spatial partitioning structure
#[derive(Debug, Clone, PartialEq)]
pub struct KdTree {
    nodes: Vec<KdNode>,
    root: NodeId,
    stats: TreeStats,
}

impl KdTree {
    /// Build a tree over every triangle in `triangles`
    ///
    /// Fails with [`SpatialError::InvalidArgument`] for an empty slice or an
    /// unusable build policy.
    pub fn build(triangles: &[Triangle], config: &KdTreeConfig) -> Result<Self, SpatialError> {
        config.validate().map_err(SpatialError::InvalidArgument)?;
        if triangles.is_empty() {
            return Err(SpatialError::InvalidArgument(
                "k-d tree needs at least one triangle".to_string(),
            ));
        }
        let count = u32::try_from(triangles.len())
            .map_err(|_| SpatialError::InvalidArgument("too many triangles".to_string()))?;

        let barycenters: Vec<Vec3> = triangles.iter().map(Triangle::barycenter).collect();
        let ids: Vec<TriangleId> = (0..count).map(|i| TriangleId::from_index(i as usize)).collect();

        let mut builder = Builder {
            triangles,
            barycenters: &barycenters,
            config,
            nodes: Vec::with_capacity(triangles.len() * 2),
            stats: TreeStats { triangle_count: triangles.len(), ..TreeStats::default() },
        };
        let root = builder.build_node(ids, 0)?;

        Ok(Self {
            nodes: builder.nodes,
            root,
            stats: builder.stats,
        })
    }

    /// Id of the root node
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Look up a node
    ///
    /// Ids are only handed out by this tree, so lookups are always in range.
    pub fn node(&self, id: NodeId) -> &KdNode {
        &self.nodes[id.index()]
    }

    /// Every node in arena order
    pub fn nodes(&self) -> &[KdNode] {
        &self.nodes
    }

    /// Every leaf node
    pub fn leaves(&self) -> impl Iterator<Item = &KdNode> {
        self.nodes.iter().filter(|node| node.is_leaf())
    }

    /// Shape summary
    pub fn stats(&self) -> TreeStats {
        self.stats
    }
}

struct Builder<'a> {
    triangles: &'a [Triangle],
    barycenters: &'a [Vec3],
    config: &'a KdTreeConfig,
    nodes: Vec<KdNode>,
    stats: TreeStats,
}

impl Builder<'_> {
    fn build_node(&mut self, mut ids: Vec<TriangleId>, depth: u32) -> Result<NodeId, SpatialError> {
        let triangles = self.triangles;
        let bounds = BoundingVolume::from_triangles(ids.iter().map(|id| &triangles[id.index()]))?;

        if ids.len() <= self.config.leaf_threshold || depth >= self.config.max_depth {
            self.stats.leaf_count += 1;
            return Ok(self.push(KdNode {
                bounds,
                depth,
                kind: NodeKind::Leaf { triangles: ids },
            }));
        }

        let axis = bounds.longest_axis();
        let barycenters = self.barycenters;
        // Stable: equal keys, including 0.0 and -0.0, keep their input order.
        // Barycenters are finite, so partial_cmp always succeeds.
        ids.sort_by(|a, b| {
            let ka = barycenters[a.index()][axis.index()];
            let kb = barycenters[b.index()][axis.index()];
            ka.partial_cmp(&kb).unwrap_or(Ordering::Equal)
        });
        let upper = ids.split_off(ids.len() / 2);

        let left = self.build_node(ids, depth + 1)?;
        let right = self.build_node(upper, depth + 1)?;

        Ok(self.push(KdNode {
            bounds,
            depth,
            kind: NodeKind::Branch { axis, left, right },
        }))
    }

    fn push(&mut self, node: KdNode) -> NodeId {
        self.stats.max_depth = self.stats.max_depth.max(node.depth);
        self.stats.node_count += 1;
        // The arena holds fewer than 2 * u32::MAX nodes only if the triangle
        // count fits u32, which `KdTree::build` checks.
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }
}
