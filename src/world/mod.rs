//! Floating-origin world grid

pub mod position;

pub use position::{WorldPosition, WorldAabb, WORLD_GRID_SIZE, grid_delta};
