//! Square float heightmap, the creation-time input for a terrain instance
//!
//! The heightmap is read once, when an instance is created, to derive the
//! instance's vertical bounds. The per-frame quadtree update never touches
//! it.

use std::path::Path;

use crate::core::error::Error;
use crate::core::types::Result;

/// Square power-of-two map of normalized float elevations
#[derive(Clone, Debug)]
pub struct Heightmap {
    resolution: u32,
    data: Vec<f32>,
}

impl Heightmap {
    /// Create a heightmap from raw row-major data.
    ///
    /// The resolution must be a power of two of at least 2, and the data
    /// length must be `resolution * resolution`.
    pub fn new(resolution: u32, data: Vec<f32>) -> Result<Self> {
        if resolution < 2 || !resolution.is_power_of_two() {
            return Err(Error::Heightmap(format!(
                "resolution must be a power of two >= 2, got {resolution}"
            )));
        }
        if data.len() != (resolution as usize) * (resolution as usize) {
            return Err(Error::Heightmap(format!(
                "expected {} samples for resolution {}, got {}",
                (resolution as usize) * (resolution as usize),
                resolution,
                data.len()
            )));
        }
        Ok(Self { resolution, data })
    }

    /// Create a heightmap by evaluating a function per texel
    pub fn from_fn(resolution: u32, mut f: impl FnMut(u32, u32) -> f32) -> Result<Self> {
        let mut data = Vec::with_capacity((resolution as usize) * (resolution as usize));
        for y in 0..resolution {
            for x in 0..resolution {
                data.push(f(x, y));
            }
        }
        Self::new(resolution, data)
    }

    /// Load a grayscale image as a heightmap with elevations in [0, 1]
    pub fn from_image_file(path: impl AsRef<Path>) -> Result<Self> {
        let img = image::open(path)?.to_luma32f();
        let (width, height) = img.dimensions();
        if width != height {
            return Err(Error::Heightmap(format!(
                "heightmap image must be square, got {width}x{height}"
            )));
        }
        Self::new(width, img.into_raw())
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Elevation at a texel
    pub fn at(&self, x: u32, y: u32) -> f32 {
        debug_assert!(x < self.resolution && y < self.resolution);
        self.data[(y as usize) * (self.resolution as usize) + (x as usize)]
    }

    /// Scan the whole map for its (min, max) elevation range
    pub fn height_bounds(&self) -> (f32, f32) {
        let mut min = f32::MAX;
        let mut max = f32::MIN;
        for &h in &self.data {
            min = min.min(h);
            max = max.max(h);
        }
        (min, max)
    }
}
