//! Math utilities and types
//!
//! Provides fundamental math types for 3D terrain and collision queries.

pub use nalgebra::{
    Vector3, Vector4,
    Matrix4,
};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Tolerance below which a denominator is treated as zero by intersection tests
pub const EPSILON: f32 = 1.0e-6;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::{constants, Mat4, Point3, Vec3};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Linear interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Hermite smoothstep of `t` in [0, 1]
    pub fn smoothstep(t: f32) -> f32 {
        t * t * (3.0 - 2.0 * t)
    }

    /// Build a world matrix that scales first and then translates
    pub fn scale_translate(scale: Vec3, translation: Vec3) -> Mat4 {
        Mat4::new_translation(&translation) * Mat4::new_nonuniform_scaling(&scale)
    }

    /// Transform a position by a homogeneous matrix
    pub fn transform_position(matrix: &Mat4, position: Vec3) -> Vec3 {
        matrix.transform_point(&Point3::from(position)).coords
    }
}
