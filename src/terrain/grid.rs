//! Fixed grid of terrain chunks tiling a square world
//!
//! The grid owns every chunk in one arena for its whole lifetime. Each frame
//! it culls chunks against the camera frustum, forwards visibility changes to
//! the scene, and rebuilds visible chunks whose LOD tier changed, nearest
//! first and within the configured rebuild budget.

use std::time::Instant;

use glam::Vec2;
use rayon::prelude::*;

use super::chunk::TerrainChunk;
use super::config::TerrainConfig;
use super::coord::{ChunkCoord, ChunkId};
use super::height_source::SharedHeightSource;
use crate::core::{CameraView, Result};
use crate::math::Frustum;
use crate::scene::TerrainScene;
use crate::streaming::{LodLadder, RebuildBudget, RebuildQueue, RebuildRequest};

/// Frames between periodic debug summaries
const STATS_LOG_INTERVAL: u64 = 60;

/// Counters for one `update` call
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Chunks intersecting the frustum
    pub visible: usize,
    /// Chunks outside the frustum
    pub culled: usize,
    /// Mesh rebuilds performed
    pub rebuilt: usize,
    /// Visible chunks whose tier changed but were left for a later frame
    pub deferred: usize,
}

/// N x N chunk grid centered on the world origin
pub struct ChunkGrid<S: TerrainScene> {
    world_size: f32,
    chunk_size: f32,
    dimension: u32,
    ladder: LodLadder,
    chunks: Vec<TerrainChunk>,
    scene: S,
    budget: RebuildBudget,
    queue: RebuildQueue,
    last_stats: FrameStats,
    frame: u64,
    disposed: bool,
}

impl<S: TerrainScene> ChunkGrid<S> {
    /// Build the height source `config` describes, then the grid over it
    pub fn from_config(config: &TerrainConfig, scene: S) -> Result<Self> {
        config.validate()?;
        let source = config.height_source.build(config.world_size);
        Self::initialize(config, source, scene)
    }

    /// Build every chunk of the grid and register its mesh with `scene`.
    ///
    /// Chunk geometry is generated in parallel; scene registration happens
    /// afterwards on the calling thread in arena order. `source` is used as
    /// given and `config.height_source` is not consulted; use
    /// [`from_config`](Self::from_config) to build from the config alone.
    pub fn initialize(config: &TerrainConfig, source: SharedHeightSource, mut scene: S) -> Result<Self> {
        let ladder = config.validate()?;
        let start = Instant::now();

        let world_size = config.world_size;
        let chunk_size = config.chunk_size;
        let dimension = config.grid_dimension();
        let half_world = world_size * 0.5;
        let count = dimension as usize * dimension as usize;

        let chunks: Vec<TerrainChunk> = (0..count)
            .into_par_iter()
            .map(|index| {
                let coord = ChunkCoord::from_id(ChunkId(index), dimension);
                let offset = Vec2::new(coord.col as f32, coord.row as f32) * chunk_size;
                // Last row and column end exactly on the world edge
                let edge_extent = |index: u32, offset: f32| {
                    if index + 1 == dimension { world_size - offset } else { chunk_size }
                };
                let extent = Vec2::new(edge_extent(coord.col, offset.x), edge_extent(coord.row, offset.y));
                TerrainChunk::new(
                    offset - Vec2::splat(half_world),
                    extent,
                    source.clone(),
                    config.initial_lod,
                    &ladder,
                )
            })
            .collect();

        for (index, chunk) in chunks.iter().enumerate() {
            if let Some(mesh) = chunk.mesh() {
                scene.add_mesh(ChunkId(index), mesh);
            }
        }

        log::info!(
            "Terrain grid initialized: {}x{} chunks ({}m world, {}m chunks, LOD {}) in {:.1}ms",
            dimension,
            dimension,
            world_size,
            chunk_size,
            config.initial_lod,
            start.elapsed().as_secs_f64() * 1000.0
        );

        Ok(Self {
            world_size,
            chunk_size,
            dimension,
            ladder,
            chunks,
            scene,
            budget: RebuildBudget::new(config.max_rebuilds_per_frame),
            queue: RebuildQueue::new(),
            last_stats: FrameStats::default(),
            frame: 0,
            disposed: false,
        })
    }

    /// Per-frame pass: cull, toggle visibility, then update LOD of visible
    /// chunks. Culled chunks keep their current tier untouched.
    pub fn update(&mut self, camera: &impl CameraView) -> FrameStats {
        if self.disposed {
            return FrameStats::default();
        }

        let frustum = Frustum::from_view_projection(&camera.view_projection());
        let position = camera.position();
        let mut stats = FrameStats::default();

        self.budget.begin_frame();
        self.queue.clear();

        for (index, chunk) in self.chunks.iter_mut().enumerate() {
            let id = ChunkId(index);
            let in_view = chunk.is_in_frustum(&frustum);
            if chunk.set_visible(in_view) {
                self.scene.set_visible(id, in_view);
            }

            if !in_view {
                stats.culled += 1;
                continue;
            }
            stats.visible += 1;

            let target_lod = chunk.target_lod(position, &self.ladder);
            if target_lod != chunk.lod() {
                self.queue.push(RebuildRequest {
                    id,
                    target_lod,
                    distance: chunk.last_distance(),
                });
            }
        }

        while let Some(request) = self.queue.pop() {
            if !self.budget.try_spend() {
                stats.deferred = self.queue.len() + 1;
                break;
            }

            let chunk = &mut self.chunks[request.id.0];
            if chunk.apply_lod(request.target_lod, &self.ladder) {
                stats.rebuilt += 1;
                if let Some(mesh) = chunk.mesh() {
                    self.scene.update_mesh(request.id, mesh);
                }
            }
        }
        self.queue.clear();

        if stats.rebuilt > 0 {
            log::debug!(
                "Frame {}: rebuilt {} chunk meshes ({} deferred)",
                self.frame,
                stats.rebuilt,
                stats.deferred
            );
        }
        if self.frame % STATS_LOG_INTERVAL == 0 {
            log::debug!(
                "Terrain frame {}: {} visible, {} culled, {} rebuilt, {} deferred",
                self.frame,
                stats.visible,
                stats.culled,
                stats.rebuilt,
                stats.deferred
            );
        }

        self.frame += 1;
        self.last_stats = stats;
        stats
    }

    /// Grid cell containing world (x, z). The upper world edge belongs to the
    /// last row/column.
    pub fn coord_at(&self, x: f32, z: f32) -> Option<ChunkCoord> {
        if self.disposed || !x.is_finite() || !z.is_finite() {
            return None;
        }

        let half_world = self.world_size * 0.5;
        let local_x = x + half_world;
        let local_z = z + half_world;
        let inside = |v: f32| (0.0..=self.world_size).contains(&v);
        if !inside(local_x) || !inside(local_z) {
            return None;
        }

        let last = self.dimension - 1;
        let col = ((local_x / self.chunk_size) as u32).min(last);
        let row = ((local_z / self.chunk_size) as u32).min(last);
        Some(ChunkCoord::new(col, row))
    }

    /// Chunk owning world (x, z)
    pub fn chunk_at(&self, x: f32, z: f32) -> Option<&TerrainChunk> {
        self.coord_at(x, z).and_then(|coord| self.chunk(coord))
    }

    /// Terrain elevation at world (x, z), 0.0 outside the world
    pub fn get_height_at(&self, x: f32, z: f32) -> f32 {
        match self.chunk_at(x, z) {
            Some(chunk) => {
                let origin = chunk.origin();
                chunk.get_height(x - origin.x, z - origin.y)
            }
            None => 0.0,
        }
    }

    pub fn chunk(&self, coord: ChunkCoord) -> Option<&TerrainChunk> {
        if coord.col >= self.dimension || coord.row >= self.dimension {
            return None;
        }
        self.chunks.get(coord.to_id(self.dimension).0)
    }

    pub fn chunks(&self) -> &[TerrainChunk] {
        &self.chunks
    }

    /// Chunks per side
    pub fn dimension(&self) -> u32 {
        self.dimension
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn world_size(&self) -> f32 {
        self.world_size
    }

    pub fn chunk_size(&self) -> f32 {
        self.chunk_size
    }

    pub fn ladder(&self) -> &LodLadder {
        &self.ladder
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    /// Stats of the most recent `update`
    pub fn last_stats(&self) -> FrameStats {
        self.last_stats
    }

    /// Number of `update` calls processed
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Dispose every chunk, unregister it from the scene and release the
    /// arena. Height queries return 0.0 afterwards. Calling again is a no-op.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }

        for (index, chunk) in self.chunks.iter_mut().enumerate() {
            if !chunk.is_disposed() {
                chunk.dispose();
                self.scene.remove_mesh(ChunkId(index));
            }
        }
        let count = self.chunks.len();
        self.chunks.clear();
        self.chunks.shrink_to_fit();
        self.disposed = true;
        self.last_stats = FrameStats::default();

        log::info!("Terrain grid disposed ({} chunks)", count);
    }
}

impl<S: TerrainScene> Drop for ChunkGrid<S> {
    fn drop(&mut self) {
        self.dispose();
    }
}
