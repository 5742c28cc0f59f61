//! Terrastream - chunked terrain with distance-based LOD and frustum culling

pub mod core;
pub mod math;
pub mod streaming;
pub mod terrain;
pub mod scene;
