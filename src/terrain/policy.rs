//! Subdivision / combination policy
//!
//! Pure predicates over camera distance. A leaf subdivides when the camera
//! is within one patch length of its center; a subdivided node combines
//! only once the camera is at least two patch lengths away. The gap between
//! the two thresholds is the hysteresis band that keeps a node from
//! oscillating when the camera sits near the boundary.

use crate::core::types::{Vec2, Vec3};
use super::quadtree::QuadTreeNode;

/// Fraction of the full instance patch covered by a node at `depth`
pub fn patch_size_multiplier(depth: u32) -> f32 {
    1.0 / (1u32 << depth) as f32
}

/// Distance below which a leaf at this node's depth subdivides.
/// Halves with every depth step, since the patch size halves.
pub fn subdivide_threshold(node: &QuadTreeNode) -> f32 {
    node.patch_size
}

/// Distance at or beyond which a subdivided node combines.
/// Strictly larger than the subdivide threshold at the same depth.
pub fn combine_threshold(node: &QuadTreeNode) -> f32 {
    node.patch_size * 2.0
}

/// Camera distance to a node center, measured in the XZ plane
fn camera_distance(node: &QuadTreeNode, camera_relative: Vec3) -> f32 {
    Vec2::new(camera_relative.x, camera_relative.z).distance(node.position)
}

/// Should this leaf split into four children?
pub fn should_be_subdivided(
    max_subdivision_steps: u32,
    node: &QuadTreeNode,
    camera_relative: Vec3,
) -> bool {
    node.depth < max_subdivision_steps
        && camera_distance(node, camera_relative) < subdivide_threshold(node)
}

/// Should this subdivided node prune all four children?
pub fn should_be_combined(node: &QuadTreeNode, camera_relative: Vec3) -> bool {
    camera_distance(node, camera_relative) >= combine_threshold(node)
}
