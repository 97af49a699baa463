//! Noise-based procedural heightmap generation

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use crate::core::types::Result;
use super::heightmap::Heightmap;

/// Parameters controlling heightmap generation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerrainParams {
    pub seed: u32,
    pub scale: f32,        // Horizontal scale (larger = smoother)
    pub height_scale: f32, // Vertical scale (max height)
    pub octaves: u32,      // FBM octaves (detail levels)
    pub persistence: f32,  // FBM persistence (0.5 typical)
    pub lacunarity: f32,   // FBM lacunarity (2.0 typical)
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            seed: 12345,
            scale: 100.0,
            height_scale: 64.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

/// Procedural heightmap generator using fractal Brownian motion (FBM)
pub struct HeightmapGenerator {
    params: TerrainParams,
    noise: Fbm<Perlin>,
}

impl HeightmapGenerator {
    /// Create a new generator with the given parameters
    pub fn new(params: TerrainParams) -> Self {
        let noise = Fbm::<Perlin>::new(params.seed)
            .set_octaves(params.octaves as usize)
            .set_persistence(params.persistence as f64)
            .set_lacunarity(params.lacunarity as f64);

        Self { params, noise }
    }

    pub fn params(&self) -> &TerrainParams {
        &self.params
    }

    /// Terrain height at local position (x, z)
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        let nx = (x / self.params.scale) as f64;
        let nz = (z / self.params.scale) as f64;

        // Noise value in [-1, 1], mapped to [0, height_scale]
        let noise_value = self.noise.get([nx, nz]);
        let normalized = (noise_value + 1.0) / 2.0;
        (normalized * self.params.height_scale as f64) as f32
    }

    /// Generate a heightmap covering a centered patch of the given edge
    /// length, sampled at `resolution` texels per edge
    pub fn generate(&self, resolution: u32, patch_size: f32) -> Result<Heightmap> {
        let step = patch_size / (resolution - 1).max(1) as f32;
        let half = patch_size * 0.5;
        Heightmap::from_fn(resolution, |x, y| {
            self.height_at(x as f32 * step - half, y as f32 * step - half)
        })
    }
}
