//! # Terrain Engine
//!
//! Ray queries against procedurally generated terrain, accelerated by a
//! k-d tree, and a fly camera that uses them to avoid passing through the
//! ground.
//!
//! ## Features
//!
//! - **K-d Tree**: median split on the longest axis, rebuilt lazily after
//!   the terrain changes
//! - **Ray Queries**: nearest hit with subtree pruning, exhaustive nearest
//!   hit, and all hits sorted by distance
//! - **Terrain**: wave, noise and layered height maps with smoothing
//! - **Movement**: per-direction probe rays block the camera; a shoot ray
//!   reports what lies under the crosshair
//! - **Headless Loop**: fixed-timestep frame loop for scripted runs
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use terrain_engine::prelude::*;
//!
//! struct MyApp {
//!     scene: Option<TerrainScene>,
//! }
//!
//! impl Application for MyApp {
//!     fn initialize(&mut self, _engine: &mut Engine) -> Result<(), AppError> {
//!         self.scene = Some(TerrainScene::new(&TerrainAppConfig::default())?);
//!         Ok(())
//!     }
//!
//!     fn update(&mut self, engine: &mut Engine, delta_time: f32) -> Result<(), AppError> {
//!         if let Some(scene) = self.scene.as_mut() {
//!             scene.update(engine.input(), delta_time)?;
//!         }
//!         Ok(())
//!     }
//!
//!     fn cleanup(&mut self, _engine: &mut Engine) {}
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EngineConfig::new().with_fixed_timestep(1.0 / 60.0).with_max_frames(600);
//!     let mut app = MyApp { scene: None };
//!     Engine::run(config, &mut app)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::must_use_candidate
)]

pub mod core;
pub mod config;
pub mod foundation;
pub mod physics;
pub mod spatial;
pub mod terrain;
pub mod input;
pub mod scene;
pub mod debug;

mod application;
mod engine;

pub use application::{Application, AppError};
pub use engine::{Engine, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        Application, AppError,
        Engine, EngineError,
        foundation::{
            math::{Vec3, Mat4},
            time::{Timer, Stopwatch},
        },
        core::config::{
            TerrainAppConfig, EngineConfig, KdTreeConfig, CameraConfig,
            MovementConfig, TerrainConfig, TerrainPiece, DebugConfig,
        },
        config::{Config, ConfigError},
        physics::{Ray, Triangle},
        spatial::{KdTreeController, KdTree, RayHit, RayCaster, SpatialError},
        terrain::{NoiseOp, NoiseOverlay, TerrainKind},
        input::InputCommands,
        scene::{FlyCamera, MovementSystem, TerrainScene, Shot, ShotReport},
        debug::DebugDrawSystem,
    };
}
