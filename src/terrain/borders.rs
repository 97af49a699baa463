//! Crack-avoidance border classification
//!
//! Adjacent leaves at different depths create T-junction seams. After the
//! tree's shape has settled for the frame, every leaf gets an 8-bit mask
//! describing how much shallower each of its four neighbors is, so the
//! renderer can emit stitching geometry along that edge. The mask is a
//! pure function of the current shape and is recomputed for every leaf
//! every frame: a sibling elsewhere in the tree may have changed depth
//! even when this node and the camera did not move.

use crate::core::types::Vec2;

use super::quadtree::{QuadTree, QuadTreeNode};

/// Assumed depth delta toward a neighbor that lives outside this tree.
///
/// Cross-instance neighbor lookup is not implemented; at an instance edge
/// the neighbor is assumed to be one level shallower, which is right most
/// of the time and at worst produces a bounded seam at the boundary. The
/// assumed neighbor depth is clamped to zero, so a lone root leaf carries
/// no border bits at all.
pub const EDGE_NEIGHBOR_DEPTH_DELTA: i32 = 1;

/// The four cardinal neighbor directions in the XZ plane
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Down,
    Right,
    Up,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Down,
        Direction::Right,
        Direction::Up,
    ];

    /// Unit offset toward the neighbor
    pub fn offset(self) -> Vec2 {
        match self {
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Down => Vec2::new(0.0, -1.0),
            Direction::Right => Vec2::new(1.0, 0.0),
            Direction::Up => Vec2::new(0.0, 1.0),
        }
    }

    /// Position of this direction's bit pair in the border mask.
    /// Bit layout: left 0-1, right 2-3, down 4-5, up 6-7.
    pub fn bit_shift(self) -> u8 {
        match self {
            Direction::Left => 0,
            Direction::Right => 2,
            Direction::Down => 4,
            Direction::Up => 6,
        }
    }
}

/// Find the leaf adjacent to `node` on the given side.
///
/// Walks from the root toward the center of the equal-size would-be
/// neighbor (one node patch length from the node's center). Returns `None`
/// when that point falls outside the tree's footprint, i.e. at an instance
/// edge.
pub fn neighboring_leaf<'a>(
    root: &'a QuadTreeNode,
    node: &QuadTreeNode,
    direction: Direction,
) -> Option<&'a QuadTreeNode> {
    let query = node.position + direction.offset() * node.patch_size;
    find_leaf(root, query)
}

fn find_leaf(root: &QuadTreeNode, point: Vec2) -> Option<&QuadTreeNode> {
    if !root.contains_xz(point) {
        return None;
    }

    let mut current = root;
    while let Some(children) = current.children() {
        current = children.iter().find(|child| child.contains_xz(point))?;
    }
    Some(current)
}

/// Compute the 8-bit crack-avoidance mask for a leaf.
///
/// Per direction: `delta = node.depth - neighbor.depth`; the low bit of
/// the pair is set when the neighbor is at least one level shallower, the
/// high bit when it is at least two. Deeper or equal neighbors set nothing;
/// stitching is always the finer patch's job.
pub fn border_mask(root: &QuadTreeNode, node: &QuadTreeNode) -> u8 {
    let mut mask = 0u8;

    for direction in Direction::ALL {
        let neighbor_depth = match neighboring_leaf(root, node, direction) {
            Some(neighbor) => neighbor.depth as i32,
            None => (node.depth as i32 - EDGE_NEIGHBOR_DEPTH_DELTA).max(0),
        };
        let delta = node.depth as i32 - neighbor_depth;

        if delta >= 1 {
            mask |= 1 << direction.bit_shift();
        }
        if delta >= 2 {
            mask |= 1 << (direction.bit_shift() + 1);
        }
    }

    mask
}

/// Border pass: classify every leaf of the tree.
///
/// Runs in two phases because the lookup reads the same tree the masks are
/// written into: collect masks with a shared borrow in pre-order, then
/// apply them to the leaves in the same order. Must run after the
/// combine/subdivide passes have settled the shape.
pub fn calculate_borders(tree: &mut QuadTree) {
    let mut masks = Vec::new();
    collect_masks(&tree.root, &tree.root, &mut masks);

    let mut index = 0;
    apply_masks(&mut tree.root, &masks, &mut index);
    debug_assert_eq!(index, masks.len());
}

fn collect_masks(root: &QuadTreeNode, node: &QuadTreeNode, out: &mut Vec<u8>) {
    if let Some(children) = node.children() {
        for child in children.iter() {
            collect_masks(root, child, out);
        }
    } else {
        out.push(border_mask(root, node));
    }
}

fn apply_masks(node: &mut QuadTreeNode, masks: &[u8], index: &mut usize) {
    if let Some(children) = node.children_mut() {
        for child in children.iter_mut() {
            apply_masks(child, masks, index);
        }
    } else {
        node.borders = masks[*index];
        *index += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vec3;
    use crate::math::Aabb;

    const PATCH: f32 = 256.0;

    fn test_tree() -> QuadTree {
        let aabb = Aabb::new(
            Vec3::new(-128.0, 0.0, -128.0),
            Vec3::new(128.0, 10.0, 128.0),
        );
        QuadTree::new(Vec3::ZERO, PATCH, aabb)
    }

    #[test]
    fn test_lone_root_leaf_has_no_borders() {
        let mut tree = test_tree();
        calculate_borders(&mut tree);
        assert_eq!(tree.root.borders, 0);
    }

    #[test]
    fn test_uniform_depth_has_no_borders() {
        let mut tree = test_tree();
        tree.root.subdivide(PATCH, Vec2::ZERO);
        calculate_borders(&mut tree);

        tree.for_each_leaf(|leaf| {
            assert_eq!(leaf.borders, 0, "equal-depth neighbors need no stitching");
        });
    }

    #[test]
    fn test_neighbor_lookup_finds_adjacent_leaf() {
        let mut tree = test_tree();
        tree.root.subdivide(PATCH, Vec2::ZERO);

        // Child 3 is the west-south quadrant; its right neighbor is the
        // east-south quadrant (child 0).
        let children = tree.root.children().unwrap();
        let neighbor = neighboring_leaf(&tree.root, &children[3], Direction::Right)
            .expect("in-tree neighbor should be found");
        assert_eq!(neighbor.position, children[0].position);
    }

    #[test]
    fn test_neighbor_lookup_none_at_instance_edge() {
        let mut tree = test_tree();
        tree.root.subdivide(PATCH, Vec2::ZERO);

        // The west-south quadrant has no in-tree neighbor to its left.
        let children = tree.root.children().unwrap();
        assert!(neighboring_leaf(&tree.root, &children[3], Direction::Left).is_none());
    }

    #[test]
    fn test_single_level_difference_sets_low_bit() {
        let mut tree = test_tree();
        tree.root.subdivide(PATCH, Vec2::ZERO);
        // Subdivide only the west-south quadrant; its depth-2 leaves border
        // depth-1 leaves to the east and north.
        tree.root.children_mut().unwrap()[3].subdivide(PATCH, Vec2::ZERO);
        calculate_borders(&mut tree);

        let children = tree.root.children().unwrap();
        let grandchildren = children[3].children().unwrap();

        // Grandchild 0 (east-south of the quadrant) touches the depth-1
        // east quadrant on its right; delta 1 sets only the low right bit.
        let east_south = &grandchildren[0];
        assert_eq!(east_south.borders & 0b0000_1100, 0b0000_0100);

        // The coarse east quadrant itself: neighbors are deeper, not
        // shallower, so its left bits stay unset.
        assert_eq!(children[0].borders & 0b0000_0011, 0);
    }

    #[test]
    fn test_two_level_difference_sets_both_bits() {
        let mut tree = test_tree();
        tree.root.subdivide(PATCH, Vec2::ZERO);
        let quadrant = &mut tree.root.children_mut().unwrap()[3];
        quadrant.subdivide(PATCH, Vec2::ZERO);
        quadrant.children_mut().unwrap()[0].subdivide(PATCH, Vec2::ZERO);
        calculate_borders(&mut tree);

        // The depth-3 leaf on the quadrant's east edge borders the east
        // root quadrant, which is still a depth-1 leaf: delta 2.
        let children = tree.root.children().unwrap();
        let deep = &children[3].children().unwrap()[0].children().unwrap()[0];
        assert_eq!(deep.depth, 3);

        let neighbor = neighboring_leaf(&tree.root, deep, Direction::Right).unwrap();
        assert_eq!(neighbor.depth, 1);

        // Both right-direction bits set on the deep leaf.
        assert_eq!(deep.borders & 0b0000_1100, 0b0000_1100);
        // The shallow neighbor's left bits must be unset: from its
        // perspective the neighbor is deeper, not shallower.
        assert_eq!(children[0].borders & 0b0000_0011, 0);
    }

    #[test]
    fn test_edge_fallback_assumes_one_level() {
        let mut tree = test_tree();
        tree.root.subdivide(PATCH, Vec2::ZERO);
        calculate_borders(&mut tree);

        // Depth-1 leaves sit on the instance edge on two sides; the
        // fallback assumes a one-level-shallower neighbor there.
        let children = tree.root.children().unwrap();
        // Child 3 (west-south): left and down are instance edges.
        let low_bits = (1 << Direction::Left.bit_shift()) | (1 << Direction::Down.bit_shift());
        assert_eq!(children[3].borders, low_bits);
    }

    #[test]
    fn test_masks_track_shape_changes() {
        let mut tree = test_tree();
        tree.root.subdivide(PATCH, Vec2::ZERO);
        calculate_borders(&mut tree);
        let before = tree.root.children().unwrap()[0].borders;

        // A sibling elsewhere subdivides; this node's mask must change even
        // though the node itself did not.
        tree.root.children_mut().unwrap()[3].subdivide(PATCH, Vec2::ZERO);
        tree.root.children_mut().unwrap()[3]
            .children_mut()
            .unwrap()[0]
            .subdivide(PATCH, Vec2::ZERO);
        calculate_borders(&mut tree);
        let after = tree.root.children().unwrap()[0].borders;

        assert_eq!(before & 0b0000_0011, 0);
        assert_eq!(after & 0b0000_0011, 0, "deeper neighbors still set no bits");
        // But the reverse direction changed on the subdivided side.
        let deep = &tree.root.children().unwrap()[3].children().unwrap()[0];
        assert!(deep.children().unwrap()[0].borders != 0);
    }
}
