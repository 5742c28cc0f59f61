//! Chunked terrain: height sources, chunk meshes, and the streaming grid

pub mod coord;
pub mod height_source;
pub mod heightfield;
pub mod generator;
pub mod mesh;
pub mod chunk;
pub mod config;
pub mod grid;

pub use coord::{ChunkCoord, ChunkId};
pub use height_source::{FlatHeight, HeightSource, SharedHeightSource};
pub use heightfield::{Heightfield, WorldRect};
pub use generator::{TerrainGenerator, TerrainParams};
pub use mesh::{ChunkMesh, MeshBuild, TerrainVertex};
pub use chunk::TerrainChunk;
pub use config::{HeightSourceConfig, TerrainConfig};
pub use grid::{ChunkGrid, FrameStats};
