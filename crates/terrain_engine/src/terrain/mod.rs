//! Procedural height-map terrain
//!
//! Produces the world-space triangles the k-d tree is built over. Each
//! [`TerrainPiece`](crate::core::config::TerrainPiece) is synthesized as a
//! [`HeightMap`], optionally smoothed, then triangulated through its world
//! transform.

pub mod heightmap;
pub mod noise;

pub use heightmap::{HeightMap, TerrainError};
pub use noise::ValueNoise;

use serde::{Deserialize, Serialize};

use crate::core::config::TerrainPiece;
use crate::foundation::math::utils;
use crate::physics::Triangle;

/// Height synthesis method of a terrain piece
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TerrainKind {
    /// All heights zero
    Flat,
    /// Product of cosines along both grid axes
    Wave {
        /// Peak height of each cosine factor
        amplitude: f32,
        /// 1.0 gives one full wave across the grid
        wavelength: f32,
    },
    /// Seeded value noise; border points stay at zero
    Noise {
        /// Noise lattice seed
        seed: u64,
        /// Lattice cells per grid point
        scale: f32,
        /// Peak height
        amplitude: f32,
    },
    /// Noise quantized into terraces; border points stay at zero
    Layered {
        /// Noise lattice seed
        seed: u64,
        /// Lattice cells per grid point
        scale: f32,
        /// Number of terraces
        layer_count: u32,
        /// Height of one terrace
        layer_height: f32,
        /// Snap to whole terraces instead of blending between them
        stepped: bool,
    },
}

impl Default for TerrainKind {
    fn default() -> Self {
        TerrainKind::Wave { amplitude: 0.5, wavelength: 1.0 }
    }
}

/// How overlay noise combines with the heights already in a map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoiseOp {
    /// Raise or lower each height by the noise value
    Add,
    /// Scale each height by the noise value
    Multiply,
}

/// Noise layered onto a synthesized piece before smoothing
///
/// Border points are left untouched, so a flat border stays flat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseOverlay {
    /// Noise lattice seed
    pub seed: u64,
    /// Lattice cells per grid point
    pub scale: f32,
    /// Peak noise value
    pub amplitude: f32,
    /// Combination with the existing heights
    pub op: NoiseOp,
}

/// Synthesize, smooth and triangulate one terrain piece
pub fn generate_piece(piece: &TerrainPiece) -> Result<Vec<Triangle>, TerrainError> {
    let mut map = HeightMap::generate(piece.width, piece.depth, &piece.kind)?;
    if let Some(overlay) = &piece.noise_overlay {
        map.layer_noise(overlay)?;
    }
    for _ in 0..piece.smoothing_passes {
        map.smoothen();
    }
    let world = utils::scale_translate(piece.scale, piece.translation);
    let triangles = map.triangulate(&world);
    if !triangles.iter().all(Triangle::is_finite) {
        return Err(TerrainError::InvalidParameter(format!(
            "scale {:?} and translation {:?} produced non-finite vertices",
            piece.scale, piece.translation
        )));
    }
    let (low, high) = map.height_range();
    log::debug!(
        "Generated {:?} terrain {}x{}: {} triangles, heights {:.3}..{:.3}",
        piece.kind,
        piece.width,
        piece.depth,
        triangles.len(),
        low,
        high
    );
    Ok(triangles)
}
