//! Terralod — adaptive terrain LOD quadtree with floating-origin
//! coordinates and frustum culling

pub mod core;
pub mod math;
pub mod world;
pub mod terrain;
