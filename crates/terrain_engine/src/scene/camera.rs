//! # Fly Camera
//!
//! Free-flying first-person camera described by a position and yaw/pitch
//! angles in degrees.
//!
//! ## Coordinate System
//! Right-handed, Y-up. With zero yaw and pitch the camera looks down -Z;
//! positive yaw turns right and positive pitch looks up.

use crate::core::config::CameraConfig;
use crate::foundation::math::{utils, Mat4, Point3, Vec3};

/// Pitch limit in degrees, short of straight up or down where the basis degenerates
pub const PITCH_LIMIT: f32 = 89.0;

/// First-person camera with a yaw/pitch orientation
#[derive(Debug, Clone, PartialEq)]
pub struct FlyCamera {
    /// Camera position in world space
    pub position: Vec3,
    yaw: f32,
    pitch: f32,
    /// Translation speed in world units per second
    pub move_speed: f32,
    /// Yaw speed in degrees per second; pitch turns at half this rate
    pub rotation_speed: f32,
}

impl FlyCamera {
    /// Create a camera at `position` looking down -Z
    pub fn new(position: Vec3) -> Self {
        Self::from_config(&CameraConfig::default().with_start_position(position))
    }

    /// Create a camera from its configuration
    pub fn from_config(config: &CameraConfig) -> Self {
        let mut camera = Self {
            position: config.start_position,
            yaw: 0.0,
            pitch: 0.0,
            move_speed: config.move_speed,
            rotation_speed: config.rotation_speed,
        };
        camera.set_rotation(config.start_yaw, config.start_pitch);
        camera
    }

    /// Yaw in degrees
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Pitch in degrees, within ±[`PITCH_LIMIT`]
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Set the orientation, clamping pitch and wrapping yaw into [0, 360)
    pub fn set_rotation(&mut self, yaw: f32, pitch: f32) {
        self.yaw = yaw.rem_euclid(360.0);
        self.pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        log::trace!("Camera rotation updated to yaw {:.2}, pitch {:.2}", self.yaw, self.pitch);
    }

    /// Turn by the given angles in degrees
    pub fn rotate(&mut self, yaw_delta: f32, pitch_delta: f32) {
        self.set_rotation(self.yaw + yaw_delta, self.pitch + pitch_delta);
    }

    /// Move by a world-space offset
    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
        log::trace!("Camera position updated to: {:?}", self.position);
    }

    /// Unit view direction
    pub fn forward(&self) -> Vec3 {
        let (yaw, pitch) = (utils::deg_to_rad(self.yaw), utils::deg_to_rad(self.pitch));
        Vec3::new(yaw.sin() * pitch.cos(), pitch.sin(), -yaw.cos() * pitch.cos())
    }

    /// Unit strafe direction, always horizontal
    pub fn right(&self) -> Vec3 {
        let yaw = utils::deg_to_rad(self.yaw);
        Vec3::new(yaw.cos(), 0.0, yaw.sin())
    }

    /// Unit up direction of the view
    pub fn up(&self) -> Vec3 {
        self.right().cross(&self.forward())
    }

    /// World-to-view transform
    pub fn view_matrix(&self) -> Mat4 {
        let eye = Point3::from(self.position);
        let target = Point3::from(self.position + self.forward());
        Mat4::look_at_rh(&eye, &target, &self.up())
    }
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_pose() {
        let camera = FlyCamera::default();
        assert_eq!(camera.position, Vec3::new(5.0, 5.0, 5.0));
        assert_relative_eq!(camera.forward(), Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-6);
        assert_relative_eq!(camera.right(), Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(camera.up(), Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_positive_yaw_turns_right() {
        let mut camera = FlyCamera::new(Vec3::zeros());
        camera.rotate(90.0, 0.0);
        assert_relative_eq!(camera.forward(), Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(camera.right(), Vec3::new(0.0, 0.0, 1.0), epsilon = 1e-6);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = FlyCamera::new(Vec3::zeros());
        camera.rotate(0.0, 120.0);
        assert_eq!(camera.pitch(), PITCH_LIMIT);
        camera.rotate(0.0, -400.0);
        assert_eq!(camera.pitch(), -PITCH_LIMIT);
        assert!(camera.forward().y < -0.99);
    }

    #[test]
    fn test_yaw_wraps() {
        let mut camera = FlyCamera::new(Vec3::zeros());
        camera.rotate(-30.0, 0.0);
        assert_relative_eq!(camera.yaw(), 330.0, epsilon = 1e-4);
    }

    #[test]
    fn test_basis_is_orthonormal() {
        let mut camera = FlyCamera::new(Vec3::zeros());
        camera.set_rotation(37.0, -22.0);
        let (f, r, u) = (camera.forward(), camera.right(), camera.up());
        assert_relative_eq!(f.norm(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(u.norm(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(f.dot(&r), 0.0, epsilon = 1e-5);
        assert_relative_eq!(f.dot(&u), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_view_matrix_moves_eye_to_origin() {
        let mut camera = FlyCamera::new(Vec3::new(1.0, 2.0, 3.0));
        camera.set_rotation(45.0, 10.0);
        let eye = utils::transform_position(&camera.view_matrix(), camera.position);
        assert_relative_eq!(eye, Vec3::zeros(), epsilon = 1e-5);
    }
}
