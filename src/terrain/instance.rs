//! Terrain instance: one quadtree plus its world-space bounds
//!
//! The instance is the unit iterated per frame. Its per-frame update has a
//! hard internal ordering: combine, subdivide, borders, then culling —
//! borders can only be classified once the shape has settled, and culling
//! only makes sense against the final shape.

use std::path::Path;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::types::{IVec3, Result, Vec3};
use crate::math::{Aabb, Frustum};
use crate::world::{grid_delta, WorldAabb, WorldPosition};

use super::borders;
use super::generator::TerrainParams;
use super::heightmap::Heightmap;
use super::quadtree::QuadTree;

/// Per-frame camera inputs, threaded explicitly into the update
#[derive(Clone, Copy, Debug)]
pub struct FrameContext {
    pub camera_position: WorldPosition,
    pub camera_cell: IVec3,
    pub frustum: Frustum,
}

/// The persisted description of a terrain instance.
///
/// Everything else — the tree shape, borders, visibility — is rebuilt from
/// scratch every run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerrainDescriptor {
    pub world_position: WorldPosition,
    pub patch_size: f32,
    pub max_subdivision_steps: u32,
    /// Texels per edge of the source maps
    pub base_resolution: u32,
    /// Procedural generation parameters, when the heightmap is generated
    /// rather than authored
    #[serde(default)]
    pub generation: Option<TerrainParams>,
}

impl TerrainDescriptor {
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

/// One terrain patch with its LOD quadtree
#[derive(Clone, Debug)]
pub struct TerrainInstance {
    pub world_position: WorldPosition,
    pub patch_size: f32,
    pub max_subdivision_steps: u32,
    pub world_aabb: WorldAabb,
    pub quadtree: QuadTree,
    /// Result of the last instance-level frustum test
    pub visible: bool,
}

impl TerrainInstance {
    /// Create an instance. The heightmap is scanned once here for the
    /// vertical bounds and is not retained; per-frame updates touch only
    /// the in-memory tree and the camera inputs.
    pub fn new(
        world_position: WorldPosition,
        patch_size: f32,
        max_subdivision_steps: u32,
        heightmap: &Heightmap,
    ) -> Self {
        let (min_height, max_height) = heightmap.height_bounds();
        let local = world_position.local;
        let half = patch_size * 0.5;

        let local_aabb = Aabb::new(
            Vec3::new(local.x - half, local.y + min_height, local.z - half),
            Vec3::new(local.x + half, local.y + max_height, local.z + half),
        );
        let world_aabb = WorldAabb::new(
            WorldPosition::new(world_position.cell, local_aabb.min),
            WorldPosition::new(world_position.cell, local_aabb.max),
        );

        Self {
            world_position,
            patch_size,
            max_subdivision_steps,
            world_aabb,
            quadtree: QuadTree::new(local, patch_size, local_aabb),
            visible: false,
        }
    }

    /// Create an instance from a descriptor and its heightmap
    pub fn from_descriptor(descriptor: &TerrainDescriptor, heightmap: &Heightmap) -> Self {
        Self::new(
            descriptor.world_position,
            descriptor.patch_size,
            descriptor.max_subdivision_steps,
            heightmap,
        )
    }

    /// Per-frame update. Pass order is a hard dependency:
    /// combine → subdivide → borders → instance AABB test → leaf cull.
    ///
    /// The LOD passes run even when the instance is outside the frustum,
    /// so the tree shape stays temporally coherent and does not pop when
    /// the instance re-enters view. Leaves keep their stale `visible`
    /// flags from the last frame they were actually tested.
    pub fn update(&mut self, frame: &FrameContext) {
        let camera_relative = frame
            .camera_position
            .relative_position(self.world_position.cell);

        self.quadtree.check_combination(camera_relative);
        self.quadtree
            .check_subdivision(self.max_subdivision_steps, camera_relative);
        borders::calculate_borders(&mut self.quadtree);

        self.visible = frame
            .frustum
            .intersects_aabb(&self.world_aabb.relative_aabb(frame.camera_cell));

        if self.visible {
            let world_grid_delta = grid_delta(self.world_position.cell, frame.camera_cell);
            self.quadtree.cull(world_grid_delta, &frame.frustum);
        }
    }
}

/// Update a batch of instances for this frame.
///
/// Trees are disjoint, so instances are processed in parallel; no tree is
/// ever touched from more than one thread.
pub fn update_batch(instances: &mut [TerrainInstance], frame: &FrameContext) {
    instances
        .par_iter_mut()
        .for_each(|instance| instance.update(frame));
}
