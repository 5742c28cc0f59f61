//! Noise-based procedural terrain, the always-available height fallback

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::height_source::HeightSource;
use super::heightfield::{Heightfield, WorldRect};
use crate::core::{Error, Result};

/// Parameters controlling terrain generation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    pub seed: u32,
    pub scale: f32,        // Horizontal scale (larger = smoother)
    pub height_scale: f32, // Vertical scale (max height)
    pub octaves: u32,      // FBM octaves (detail levels)
    pub persistence: f32,  // FBM persistence (0.5 typical)
    pub lacunarity: f32,   // FBM lacunarity (2.0 typical)
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            seed: 12345,
            scale: 800.0,
            height_scale: 120.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

/// Procedural terrain generator using fractal Brownian motion (FBM)
pub struct TerrainGenerator {
    params: TerrainParams,
    noise: Fbm<Perlin>,
}

impl TerrainGenerator {
    /// Create a new terrain generator with the given parameters
    pub fn new(params: TerrainParams) -> Self {
        let noise = Fbm::<Perlin>::new(params.seed)
            .set_octaves(params.octaves.max(1) as usize)
            .set_persistence(params.persistence as f64)
            .set_lacunarity(params.lacunarity as f64);

        Self { params, noise }
    }

    /// Get terrain parameters
    pub fn params(&self) -> &TerrainParams {
        &self.params
    }

    /// Get terrain height at world position (x, z)
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        // Sample noise in normalized coordinates
        let nx = (x / self.params.scale) as f64;
        let nz = (z / self.params.scale) as f64;

        // Get noise value in range [-1, 1]
        let noise_value = self.noise.get([nx, nz]).clamp(-1.0, 1.0);

        // Map to height range [0, height_scale]
        let normalized = (noise_value + 1.0) / 2.0;
        (normalized * self.params.height_scale as f64) as f32
    }

    /// Rasterize the generator into a `resolution x resolution` heightfield
    /// spanning `rect`. Rows are sampled in parallel.
    pub fn bake(&self, resolution: usize, rect: WorldRect) -> Result<Heightfield> {
        if resolution < 2 {
            return Err(Error::Heightfield(format!(
                "bake resolution must be at least 2, got {}",
                resolution
            )));
        }

        let step = rect.size / (resolution - 1) as f32;
        let mut data = vec![0.0_f32; resolution * resolution];

        data.par_chunks_mut(resolution)
            .enumerate()
            .for_each(|(row, out)| {
                let z = rect.min.y + row as f32 * step.y;
                for (col, sample) in out.iter_mut().enumerate() {
                    let x = rect.min.x + col as f32 * step.x;
                    *sample = self.height_at(x, z);
                }
            });

        let field = Heightfield::new(resolution, resolution, data, rect)?;
        if let Some((lo, hi)) = field.min_max() {
            log::debug!(
                "Baked {}x{} procedural heightfield over {:?} ({:.1}m to {:.1}m)",
                resolution,
                resolution,
                rect,
                lo,
                hi
            );
        }
        Ok(field)
    }
}

impl HeightSource for TerrainGenerator {
    fn try_height(&self, x: f32, z: f32) -> Option<f32> {
        let h = self.height_at(x, z);
        h.is_finite().then_some(h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terrain_params_default() {
        let params = TerrainParams::default();
        assert_eq!(params.seed, 12345);
        assert_eq!(params.scale, 800.0);
        assert_eq!(params.height_scale, 120.0);
        assert_eq!(params.octaves, 4);
        assert_eq!(params.persistence, 0.5);
        assert_eq!(params.lacunarity, 2.0);
    }

    #[test]
    fn test_height_at_range() {
        let generator = TerrainGenerator::new(TerrainParams::default());

        for (x, z) in [(0.0, 0.0), (100.0, 100.0), (-5000.0, 7000.0), (123.4, -987.6)] {
            let height = generator.height_at(x, z);
            assert!(height >= 0.0);
            assert!(height <= 120.0);
        }
    }

    #[test]
    fn test_height_at_consistency() {
        let generator = TerrainGenerator::new(TerrainParams::default());
        let positions = [(0.0, 0.0), (50.0, 50.0), (100.0, 100.0), (-50.0, -50.0)];

        for (x, z) in positions {
            let h1 = generator.height_at(x, z);
            let h2 = generator.height_at(x, z);
            assert_eq!(h1, h2, "Height should be consistent at ({}, {})", x, z);
        }
    }

    #[test]
    fn test_different_seeds() {
        let gen1 = TerrainGenerator::new(TerrainParams { seed: 1, ..Default::default() });
        let gen2 = TerrainGenerator::new(TerrainParams { seed: 2, ..Default::default() });

        let h1 = gen1.height_at(350.0, 350.0);
        let h2 = gen2.height_at(350.0, 350.0);
        assert_ne!(h1, h2);
    }

    #[test]
    fn test_height_source_impl() {
        let generator = TerrainGenerator::new(TerrainParams::default());
        assert_eq!(generator.try_height(10.0, 20.0), Some(generator.height_at(10.0, 20.0)));
    }

    #[test]
    fn test_bake_matches_generator_at_samples() {
        let generator = TerrainGenerator::new(TerrainParams::default());
        let rect = WorldRect::centered(2048.0);
        let field = generator.bake(33, rect).unwrap();

        assert_eq!(field.columns(), 33);
        assert_eq!(field.rows(), 33);

        // Raster nodes reproduce the generator exactly
        let step = 2048.0 / 32.0;
        for (col, row) in [(0, 0), (5, 9), (32, 32), (16, 0)] {
            let x = -1024.0 + col as f32 * step;
            let z = -1024.0 + row as f32 * step;
            assert!((field.sample(col, row) - generator.height_at(x, z)).abs() < 1e-4);
            assert!((field.height(x, z) - generator.height_at(x, z)).abs() < 1e-2);
        }
    }

    #[test]
    fn test_bake_rejects_tiny_resolution() {
        let generator = TerrainGenerator::new(TerrainParams::default());
        assert!(generator.bake(1, WorldRect::centered(10.0)).is_err());
    }
}
