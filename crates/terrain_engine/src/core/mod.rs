//! # Core Engine Module
//!
//! Shared configuration used by every subsystem of the terrain engine.
//!
//! ## Organization
//!
//! - **Config**: Unified configuration for the tree, camera, terrain and frame loop
//! - **Foundation**: Low-level utilities (math, time, logging)

pub mod config;

// Re-export foundation modules for convenience
pub use crate::foundation;

// Re-export commonly used config types
pub use config::{
    TerrainAppConfig,
    EngineConfig,
    KdTreeConfig,
    CameraConfig,
    MovementConfig,
    TerrainConfig,
    TerrainPiece,
    DebugConfig,
    Config,
    ConfigError,
};
