//! Collision primitives
//!
//! # Module Organization
//!
//! - [`primitives`] - Rays and world-space triangles with intersection tests
//!
//! Triangles are always stored in world space: terrain pieces are transformed
//! once at generation time, and a moved piece must be regenerated and the
//! k-d tree rebuilt rather than patched.

pub mod primitives;

// Re-export commonly used types
pub use primitives::{Ray, Triangle};
