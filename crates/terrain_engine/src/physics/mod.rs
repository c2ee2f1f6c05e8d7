//! Physics module for ray-based collision queries
//!
//! Provides the geometric primitives the spatial index is built from and
//! the narrow-phase intersection tests it runs at its leaves.

pub mod collision;

pub use collision::{Ray, Triangle};
