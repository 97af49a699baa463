//! Adaptive terrain LOD
//!
//! Per frame, each terrain instance reshapes its quadtree around the
//! camera (combine, then subdivide), classifies crack-avoidance borders
//! between neighboring leaves of different depth, and culls the leaves
//! against the view frustum.

pub mod heightmap;
pub use heightmap::Heightmap;

pub mod generator;
pub use generator::{HeightmapGenerator, TerrainParams};

pub mod quadtree;
pub use quadtree::{QuadTree, QuadTreeNode};

pub mod policy;

pub mod borders;
pub use borders::{Direction, EDGE_NEIGHBOR_DEPTH_DELTA};

pub mod instance;
pub use instance::{FrameContext, TerrainDescriptor, TerrainInstance, update_batch};

pub mod draw;
pub use draw::{TerrainDrawEntry, gather_draw_entries};
