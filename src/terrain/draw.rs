//! Renderer-facing draw data
//!
//! The quadtree produces geometric parameters only; the renderer indexes
//! into one shared vertex/index buffer per instance and draws one patch
//! per visible leaf. Entries are plain-old-data so they can be memcpy'd
//! into a push-constant or instance buffer as-is.

use bytemuck::{Pod, Zeroable};

use crate::core::types::{IVec3, Vec2};
use crate::world::grid_delta;

use super::instance::TerrainInstance;
use super::quadtree::QuadTreeNode;

/// Per-leaf draw parameters
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct TerrainDrawEntry {
    /// XZ center of the patch, relative to the camera's cell
    pub world_position: [f32; 2],
    /// Heightmap sampling rectangle
    pub min_uv: [f32; 2],
    pub max_uv: [f32; 2],
    /// World-space edge length of the patch
    pub patch_size: f32,
    /// Crack-avoidance mask (2 bits per direction)
    pub borders: u32,
}

/// Gather draw entries for every visible leaf of an instance.
///
/// An instance that failed its AABB test contributes nothing; per-leaf
/// `visible` flags are trusted as-is.
pub fn gather_draw_entries(
    instance: &TerrainInstance,
    camera_cell: IVec3,
    out: &mut Vec<TerrainDrawEntry>,
) {
    if !instance.visible {
        return;
    }

    let delta = grid_delta(instance.world_position.cell, camera_cell);
    gather_node(&instance.quadtree.root, Vec2::new(delta.x, delta.z), out);
}

fn gather_node(node: &QuadTreeNode, delta_xz: Vec2, out: &mut Vec<TerrainDrawEntry>) {
    if let Some(children) = node.children() {
        for child in children.iter() {
            gather_node(child, delta_xz, out);
        }
    } else if node.visible {
        let position = node.position + delta_xz;
        out.push(TerrainDrawEntry {
            world_position: position.to_array(),
            min_uv: node.min_uv.to_array(),
            max_uv: node.max_uv.to_array(),
            patch_size: node.patch_size,
            borders: node.borders as u32,
        });
    }
}
