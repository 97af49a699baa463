//! Adaptive terrain LOD quadtree
//!
//! The tree is reshaped in place every frame: a combine pass prunes
//! subdivided nodes the camera has left behind, a subdivide pass splits
//! leaves the camera has come close to, then borders are classified and
//! leaves are culled against the frustum. There is no "next frame's tree";
//! mutation and the read for rendering happen on the same structure.

use crate::core::types::{Vec2, Vec3};
use crate::math::{Aabb, Frustum};

use super::policy;

/// Child corner anchors in units of the child patch size, measured from the
/// parent's minimum corner. The order is fixed; combine/subdivide cycles
/// must reproduce children bit-identically, and the border pass relies on
/// the same enumeration when applying masks.
pub const CHILD_CORNER_OFFSETS: [Vec2; 4] = [
    Vec2::new(1.5, 0.5),
    Vec2::new(1.5, 1.5),
    Vec2::new(0.5, 1.5),
    Vec2::new(0.5, 0.5),
];

/// One node of the terrain quadtree.
///
/// `minimum`/`maximum` are the XZ footprint in instance-cell local space;
/// the AABB's Y range is inherited from the parent rather than re-baked
/// per node (a deliberate approximation). `children` is exactly absent or
/// exactly four nodes; no other population is representable.
#[derive(Clone, Debug)]
pub struct QuadTreeNode {
    pub depth: u32,
    pub borders: u8,
    pub minimum: Vec2,
    pub maximum: Vec2,
    pub aabb: Aabb,
    pub position: Vec2,
    pub min_uv: Vec2,
    pub max_uv: Vec2,
    pub patch_size: f32,
    pub visible: bool,
    children: Option<Box<[QuadTreeNode; 4]>>,
}

impl QuadTreeNode {
    pub fn is_subdivided(&self) -> bool {
        self.children.is_some()
    }

    pub fn children(&self) -> Option<&[QuadTreeNode; 4]> {
        self.children.as_deref()
    }

    pub fn children_mut(&mut self) -> Option<&mut [QuadTreeNode; 4]> {
        self.children.as_deref_mut()
    }

    /// Whether the footprint contains an XZ point (bounds inclusive)
    pub fn contains_xz(&self, point: Vec2) -> bool {
        point.x >= self.minimum.x && point.x <= self.maximum.x &&
        point.y >= self.minimum.y && point.y <= self.maximum.y
    }

    /// Split this leaf into four children. No-op if already subdivided.
    ///
    /// `patch_size`/`patch_origin` describe the full instance patch; the
    /// child UV rectangles are normalized over it and scaled inward by
    /// `1 / patch_size` so sampling never reaches past valid texel edges.
    pub fn subdivide(&mut self, patch_size: f32, patch_origin: Vec2) {
        if self.is_subdivided() {
            return;
        }

        let child_depth = self.depth + 1;
        let child_patch = patch_size * policy::patch_size_multiplier(child_depth);
        let half = child_patch * 0.5;
        let uv_bias = 1.0 - 1.0 / patch_size;

        let children = CHILD_CORNER_OFFSETS.map(|corner| {
            let center = self.minimum + corner * child_patch;
            let minimum = center - Vec2::splat(half);
            let maximum = center + Vec2::splat(half);

            // Y range copied from the parent, not recomputed.
            let aabb = Aabb::new(
                Vec3::new(minimum.x, self.aabb.min.y, minimum.y),
                Vec3::new(maximum.x, self.aabb.max.y, maximum.y),
            );

            let to_uv = |bound: Vec2| {
                ((bound - patch_origin) + Vec2::splat(patch_size * 0.5)) / patch_size * uv_bias
            };

            QuadTreeNode {
                depth: child_depth,
                borders: 0,
                minimum,
                maximum,
                aabb,
                position: (minimum + maximum) * 0.5,
                min_uv: to_uv(minimum),
                max_uv: to_uv(maximum),
                patch_size: child_patch,
                visible: false,
                children: None,
            }
        });

        self.children = Some(Box::new(children));
    }

    /// Prune all four children at once. No-op on a leaf.
    pub fn combine(&mut self) {
        self.children = None;
    }
}

/// A terrain quadtree: one root node sized to the full instance patch
#[derive(Clone, Debug)]
pub struct QuadTree {
    pub root: QuadTreeNode,
    patch_size: f32,
    patch_origin: Vec2,
}

impl QuadTree {
    /// Create a tree whose root covers the full patch centered on the
    /// instance's local position, with the given local-space 3D bounds.
    pub fn new(local_position: Vec3, patch_size: f32, local_aabb: Aabb) -> Self {
        let patch_origin = Vec2::new(local_position.x, local_position.z);
        let half = Vec2::splat(patch_size * 0.5);

        let root = QuadTreeNode {
            depth: 0,
            borders: 0,
            minimum: patch_origin - half,
            maximum: patch_origin + half,
            aabb: local_aabb,
            position: patch_origin,
            min_uv: Vec2::ZERO,
            max_uv: Vec2::ONE,
            patch_size,
            visible: false,
            children: None,
        };

        Self { root, patch_size, patch_origin }
    }

    pub fn patch_size(&self) -> f32 {
        self.patch_size
    }

    pub fn patch_origin(&self) -> Vec2 {
        self.patch_origin
    }

    /// Combine pass: prune subtrees the camera has moved away from.
    /// Must run before the subdivide pass.
    pub fn check_combination(&mut self, camera_relative: Vec3) {
        Self::check_combination_node(&mut self.root, camera_relative);
    }

    fn check_combination_node(node: &mut QuadTreeNode, camera_relative: Vec3) {
        if !node.is_subdivided() {
            return;
        }

        if policy::should_be_combined(node, camera_relative) {
            node.combine();
        } else if let Some(children) = node.children_mut() {
            for child in children.iter_mut() {
                Self::check_combination_node(child, camera_relative);
            }
        }
    }

    /// Subdivide pass: split leaves the camera has come close to
    pub fn check_subdivision(&mut self, max_subdivision_steps: u32, camera_relative: Vec3) {
        let (patch_size, patch_origin) = (self.patch_size, self.patch_origin);
        Self::check_subdivision_node(
            &mut self.root,
            patch_size,
            patch_origin,
            max_subdivision_steps,
            camera_relative,
        );
    }

    fn check_subdivision_node(
        node: &mut QuadTreeNode,
        patch_size: f32,
        patch_origin: Vec2,
        max_subdivision_steps: u32,
        camera_relative: Vec3,
    ) {
        if let Some(children) = node.children_mut() {
            for child in children.iter_mut() {
                Self::check_subdivision_node(
                    child,
                    patch_size,
                    patch_origin,
                    max_subdivision_steps,
                    camera_relative,
                );
            }
        } else if policy::should_be_subdivided(max_subdivision_steps, node, camera_relative) {
            node.subdivide(patch_size, patch_origin);
        }
    }

    /// Cull pass: set per-leaf visibility against the frustum.
    ///
    /// `world_grid_delta` moves the cell-local node bounds into the
    /// camera's cell. Internal nodes carry no mesh and are recursed
    /// unconditionally.
    pub fn cull(&mut self, world_grid_delta: Vec3, frustum: &Frustum) {
        Self::cull_node(&mut self.root, world_grid_delta, frustum);
    }

    fn cull_node(node: &mut QuadTreeNode, world_grid_delta: Vec3, frustum: &Frustum) {
        if let Some(children) = node.children_mut() {
            for child in children.iter_mut() {
                Self::cull_node(child, world_grid_delta, frustum);
            }
        } else {
            node.visible = frustum.intersects_aabb(&node.aabb.translated(world_grid_delta));
        }
    }

    /// Visit every leaf in pre-order
    pub fn for_each_leaf(&self, mut f: impl FnMut(&QuadTreeNode)) {
        Self::for_each_leaf_node(&self.root, &mut f);
    }

    fn for_each_leaf_node(node: &QuadTreeNode, f: &mut impl FnMut(&QuadTreeNode)) {
        if let Some(children) = node.children() {
            for child in children.iter() {
                Self::for_each_leaf_node(child, f);
            }
        } else {
            f(node);
        }
    }

    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        self.for_each_leaf(|_| count += 1);
        count
    }

    pub fn max_leaf_depth(&self) -> u32 {
        let mut max = 0;
        self.for_each_leaf(|leaf| max = max.max(leaf.depth));
        max
    }
}
