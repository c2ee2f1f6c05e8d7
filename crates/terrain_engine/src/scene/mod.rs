//! Scene: fly camera, collision-aware movement and the terrain scene

pub mod camera;
pub mod movement;
pub mod terrain_scene;

pub use camera::FlyCamera;
pub use movement::{BlockedDirections, MovementOutcome, MovementSystem, Shot, ShotReport};
pub use terrain_scene::{SceneError, TerrainScene};
