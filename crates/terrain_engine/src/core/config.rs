//! # Unified Configuration System
//!
//! Every tunable of the terrain demo lives here: k-d tree build policy,
//! camera speeds, probe ranges, terrain pieces and the frame loop.
//!
//! All types are serde-serializable and load through the [`Config`] trait
//! from TOML or RON. Each section has builder-style `with_*` setters and a
//! `validate()` that rejects values the subsystems cannot work with.

use serde::{Serialize, Deserialize};

use crate::foundation::math::Vec3;
use crate::terrain::{NoiseOverlay, TerrainKind};

// Re-export from the config module for convenience
pub use crate::config::{Config, ConfigError};

/// # K-d Tree Configuration
///
/// Build policy for the terrain k-d tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct KdTreeConfig {
    /// A node with this many triangles or fewer becomes a leaf
    pub leaf_threshold: usize,
    /// Depth at which subdivision stops regardless of triangle count
    pub max_depth: u32,
}

impl KdTreeConfig {
    /// Set the leaf threshold
    pub fn with_leaf_threshold(mut self, leaf_threshold: usize) -> Self {
        self.leaf_threshold = leaf_threshold;
        self
    }

    /// Set the maximum depth
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.leaf_threshold == 0 {
            return Err("Leaf threshold must be at least 1".to_string());
        }
        Ok(())
    }
}

impl Default for KdTreeConfig {
    fn default() -> Self {
        Self {
            leaf_threshold: 1,
            max_depth: 32,
        }
    }
}

/// # Camera Configuration
///
/// Starting pose and speeds of the fly camera.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Initial world-space position
    pub start_position: Vec3,
    /// Initial pitch in degrees
    pub start_pitch: f32,
    /// Initial yaw in degrees
    pub start_yaw: f32,
    /// Translation speed in world units per second
    pub move_speed: f32,
    /// Yaw speed in degrees per second; pitch turns at half this rate
    pub rotation_speed: f32,
}

impl CameraConfig {
    /// Set the starting position
    pub fn with_start_position(mut self, position: Vec3) -> Self {
        self.start_position = position;
        self
    }

    /// Set the movement speed
    pub fn with_move_speed(mut self, move_speed: f32) -> Self {
        self.move_speed = move_speed;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(self.move_speed.is_finite() && self.move_speed >= 0.0) {
            return Err(format!("Camera move speed must be a non-negative number, got {}", self.move_speed));
        }
        if !(self.rotation_speed.is_finite() && self.rotation_speed >= 0.0) {
            return Err(format!("Camera rotation speed must be a non-negative number, got {}", self.rotation_speed));
        }
        Ok(())
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            start_position: Vec3::new(5.0, 5.0, 5.0),
            start_pitch: 0.0,
            start_yaw: 0.0,
            move_speed: 2.5,
            rotation_speed: 100.0,
        }
    }
}

/// # Movement Configuration
///
/// Ranges of the rays cast by the movement system.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MovementConfig {
    /// Length of the per-direction blocking probes
    pub probe_range: f32,
    /// Length of the shoot ray
    pub shoot_range: f32,
}

impl MovementConfig {
    /// Set the probe range
    pub fn with_probe_range(mut self, probe_range: f32) -> Self {
        self.probe_range = probe_range;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(self.probe_range > 0.0) || !(self.shoot_range > 0.0) {
            return Err("Probe and shoot ranges must be positive".to_string());
        }
        Ok(())
    }
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            probe_range: 1.0,
            shoot_range: 10_000.0,
        }
    }
}

/// A single height-map terrain piece placed in the world
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainPiece {
    /// Height-map synthesis method
    pub kind: TerrainKind,
    /// Grid points along X
    pub width: usize,
    /// Grid points along Z
    pub depth: usize,
    /// Smoothing passes applied after synthesis
    pub smoothing_passes: u32,
    /// World scale applied to the unit-square grid
    pub scale: Vec3,
    /// World translation applied after scaling
    pub translation: Vec3,
    /// Noise added to or multiplied into the synthesized heights
    pub noise_overlay: Option<NoiseOverlay>,
}

impl Default for TerrainPiece {
    fn default() -> Self {
        Self {
            kind: TerrainKind::default(),
            width: 64,
            depth: 64,
            smoothing_passes: 1,
            scale: Vec3::new(50.0, 10.0, 50.0),
            translation: Vec3::new(0.0, -5.0, 0.0),
            noise_overlay: None,
        }
    }
}

/// # Terrain Configuration
///
/// The set of pieces regenerated together.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    /// Pieces contributing triangles to the k-d tree
    pub pieces: Vec<TerrainPiece>,
}

impl TerrainConfig {
    /// Replace the pieces
    pub fn with_pieces(mut self, pieces: Vec<TerrainPiece>) -> Self {
        self.pieces = pieces;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        for (index, piece) in self.pieces.iter().enumerate() {
            if piece.width < 2 || piece.depth < 2 {
                return Err(format!(
                    "Terrain piece {} needs at least 2x2 grid points, got {}x{}",
                    index, piece.width, piece.depth
                ));
            }
        }
        Ok(())
    }
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            pieces: vec![TerrainPiece::default()],
        }
    }
}

/// # Engine Configuration
///
/// Frame loop behavior and logging.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Log level used when `RUST_LOG` is unset
    pub log_level: String,
    /// Fixed simulation step in seconds; wall-clock time when `None`
    pub fixed_timestep: Option<f32>,
    /// Stop after this many frames; run until exit is requested when `None`
    pub max_frames: Option<u64>,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            fixed_timestep: None,
            max_frames: None,
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Use a fixed timestep
    pub fn with_fixed_timestep(mut self, step: f32) -> Self {
        self.fixed_timestep = Some(step);
        self
    }

    /// Limit the number of frames
    pub fn with_max_frames(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if let Some(step) = self.fixed_timestep {
            if !(step > 0.0 && step.is_finite()) {
                return Err(format!("Fixed timestep must be positive, got {}", step));
            }
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Debug Configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Emit wireframe boxes for every k-d tree node each frame
    pub render_kd_tree: bool,
    /// Seconds the line and marker of a shot stay visible
    pub shot_marker_duration: f32,
}

impl DebugConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(self.shot_marker_duration >= 0.0) {
            return Err(format!(
                "Shot marker duration must be a non-negative number, got {}",
                self.shot_marker_duration
            ));
        }
        Ok(())
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            render_kd_tree: false,
            shot_marker_duration: 2.0,
        }
    }
}

/// # Complete Application Configuration
///
/// Top-level configuration that encompasses all subsystems.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainAppConfig {
    /// Frame loop configuration
    pub engine: EngineConfig,
    /// K-d tree build policy
    pub kd_tree: KdTreeConfig,
    /// Camera pose and speeds
    pub camera: CameraConfig,
    /// Probe and shoot ranges
    pub movement: MovementConfig,
    /// Terrain pieces
    pub terrain: TerrainConfig,
    /// Debug overlay switches
    pub debug: DebugConfig,
}

impl TerrainAppConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()
            .and_then(|()| self.kd_tree.validate())
            .and_then(|()| self.camera.validate())
            .and_then(|()| self.movement.validate())
            .and_then(|()| self.terrain.validate())
            .and_then(|()| self.debug.validate())
            .map_err(ConfigError::Invalid)
    }
}

impl Config for TerrainAppConfig {}
