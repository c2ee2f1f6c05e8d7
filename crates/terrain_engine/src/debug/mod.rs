//! Debug visualization
//!
//! Collects lines, boxes and points for an external renderer: the k-d tree
//! overlay, shoot rays and hit markers.

pub mod draw;

pub use draw::{DebugDrawSystem, DebugPrimitive, DebugShape, DebugLayerId};
