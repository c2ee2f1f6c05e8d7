//! Spatial index errors

use thiserror::Error;

/// Errors raised while ingesting geometry or building the k-d tree
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpatialError {
    /// A bounding volume or node was requested for an empty set, or the build policy is unusable
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A submitted triangle has a NaN or infinite vertex component
    #[error("Triangle {index} of the submitted batch has a non-finite vertex")]
    DataError {
        /// Position of the offending triangle within its batch
        index: usize,
    },

    /// The tree was queried after geometry changed but before it was rebuilt
    ///
    /// Advisory only: queries still answer from the previous tree.
    #[error("K-d tree queried while dirty; call update_kd_tree() before querying")]
    StaleQuery,
}
