//! Load-time terrain configuration

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::generator::{TerrainGenerator, TerrainParams};
use super::height_source::{FlatHeight, SharedHeightSource};
use super::heightfield::{Heightfield, WorldRect};
use crate::core::{Error, Result};
use crate::streaming::lod::{LodConfig, LodLadder};

/// Largest grid dimension accepted (chunks per side)
pub const MAX_GRID_DIMENSION: u32 = 1024;

fn default_raster_height_scale() -> f32 {
    1000.0
}

/// Where elevation data comes from
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HeightSourceConfig {
    /// Constant elevation
    Flat { elevation: f32 },
    /// Fractal noise evaluated per query
    Procedural(TerrainParams),
    /// Grayscale image stretched over the whole world square
    Raster {
        path: PathBuf,
        #[serde(default = "default_raster_height_scale")]
        height_scale: f32,
        #[serde(default)]
        base: f32,
    },
}

impl Default for HeightSourceConfig {
    fn default() -> Self {
        Self::Procedural(TerrainParams::default())
    }
}

impl HeightSourceConfig {
    /// Build the source for a world of side `world_size`.
    ///
    /// A raster that cannot be loaded falls back to the default procedural
    /// generator so a grid can always be built.
    pub fn build(&self, world_size: f32) -> SharedHeightSource {
        match self {
            Self::Flat { elevation } => Arc::new(FlatHeight(*elevation)),
            Self::Procedural(params) => Arc::new(TerrainGenerator::new(params.clone())),
            Self::Raster { path, height_scale, base } => {
                match Heightfield::from_image(path, WorldRect::centered(world_size), *height_scale, *base) {
                    Ok(field) => Arc::new(field),
                    Err(e) => {
                        log::warn!(
                            "Failed to load heightfield {}: {}. Falling back to procedural terrain",
                            path.display(),
                            e
                        );
                        Arc::new(TerrainGenerator::new(TerrainParams::default()))
                    }
                }
            }
        }
    }
}

/// Terrain grid configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Side of the square world in meters, centered on the origin
    pub world_size: f32,
    /// Side of one chunk in meters
    pub chunk_size: f32,
    pub lod: LodConfig,
    /// Tier every chunk is built at before the first update
    pub initial_lod: u32,
    /// Cap on mesh rebuilds per update; `None` rebuilds everything at once
    pub max_rebuilds_per_frame: Option<usize>,
    pub height_source: HeightSourceConfig,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            world_size: 16_000.0,
            chunk_size: 256.0,
            lod: LodConfig::default(),
            initial_lod: 0,
            max_rebuilds_per_frame: None,
            height_source: HeightSourceConfig::default(),
        }
    }
}

impl TerrainConfig {
    /// Chunks per side: `ceil(world_size / chunk_size)`, ignoring a trailing
    /// sliver under 0.01% of a chunk left by float rounding
    pub fn grid_dimension(&self) -> u32 {
        let world = f64::from(self.world_size);
        let chunk = f64::from(self.chunk_size);
        let mut dimension = (world / chunk).ceil().max(1.0);
        if dimension > 1.0 && world - (dimension - 1.0) * chunk <= chunk * 1e-4 {
            dimension -= 1.0;
        }
        dimension as u32
    }

    /// Check sizes and LOD settings, returning the ladder they describe
    pub fn validate(&self) -> Result<LodLadder> {
        if !self.world_size.is_finite() || self.world_size <= 0.0 {
            return Err(Error::Config(format!(
                "world_size must be positive, got {}",
                self.world_size
            )));
        }
        if !self.chunk_size.is_finite() || self.chunk_size <= 0.0 {
            return Err(Error::Config(format!(
                "chunk_size must be positive, got {}",
                self.chunk_size
            )));
        }

        let dimension = self.grid_dimension();
        if dimension > MAX_GRID_DIMENSION {
            return Err(Error::Config(format!(
                "{}m world with {}m chunks needs {} chunks per side (max {})",
                self.world_size, self.chunk_size, dimension, MAX_GRID_DIMENSION
            )));
        }

        let ladder = LodLadder::new(&self.lod)?;
        if self.initial_lod > ladder.max_lod() {
            return Err(Error::Config(format!(
                "initial_lod {} out of range, ladder has {} tiers",
                self.initial_lod,
                ladder.lod_count()
            )));
        }

        if self.max_rebuilds_per_frame == Some(0) {
            return Err(Error::Config(
                "max_rebuilds_per_frame must be at least 1 when set".to_string(),
            ));
        }

        Ok(ladder)
    }

    /// Save to a JSON file (sync)
    pub fn save_sync(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load from a JSON file (sync). Missing fields take their defaults.
    pub fn load_sync(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&json)?;
        Ok(config)
    }
}
