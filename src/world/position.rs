//! Floating-origin world coordinates
//!
//! World positions are a coarse integer cell plus a small local float
//! offset. All per-frame math runs on positions converted relative to a
//! reference cell, so magnitudes stay small no matter how far from the
//! world origin the camera is.

use serde::{Deserialize, Serialize};

use crate::core::types::{IVec3, Vec3};
use crate::math::Aabb;

/// Edge length of one world grid cell, in meters.
pub const WORLD_GRID_SIZE: f32 = 1024.0;

/// Float delta between two cells, scaled to world units
pub fn grid_delta(cell: IVec3, reference_cell: IVec3) -> Vec3 {
    (cell - reference_cell).as_vec3() * WORLD_GRID_SIZE
}

/// A position on the world grid: integer cell + local float offset.
///
/// `local` is expected to stay within one cell's extent by construction.
/// Cross-cell arithmetic goes through [`WorldPosition::relative_position`];
/// never subtract raw locals from different cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPosition {
    pub cell: IVec3,
    pub local: Vec3,
}

impl WorldPosition {
    pub fn new(cell: IVec3, local: Vec3) -> Self {
        Self { cell, local }
    }

    /// Position in the origin cell
    pub fn from_local(local: Vec3) -> Self {
        Self { cell: IVec3::ZERO, local }
    }

    /// Convert to a float position relative to a reference cell.
    ///
    /// Result stays numerically well-behaved as long as
    /// `|cell - reference_cell|` is within the render-distance budget.
    /// Callers that violate that trade precision, nothing else.
    pub fn relative_position(&self, reference_cell: IVec3) -> Vec3 {
        grid_delta(self.cell, reference_cell) + self.local
    }

    /// Absolute float position (loses precision far from the origin;
    /// prefer [`WorldPosition::relative_position`] for per-frame math)
    pub fn absolute_position(&self) -> Vec3 {
        self.relative_position(IVec3::ZERO)
    }
}

/// An axis-aligned bounding box whose corners are world positions
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WorldAabb {
    pub min: WorldPosition,
    pub max: WorldPosition,
}

impl WorldAabb {
    pub fn new(min: WorldPosition, max: WorldPosition) -> Self {
        Self { min, max }
    }

    /// Local-space bounds relative to a reference cell
    pub fn relative_aabb(&self, reference_cell: IVec3) -> Aabb {
        Aabb::new(
            self.min.relative_position(reference_cell),
            self.max.relative_position(reference_cell),
        )
    }
}
