//! Raster elevation data with bilinear sampling

use std::path::Path;

use glam::Vec2;

use super::height_source::HeightSource;
use crate::core::{Error, Result};

/// World-space rectangle a raster is stretched over
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldRect {
    /// Minimum (x, z) corner
    pub min: Vec2,
    /// Extent along x and z
    pub size: Vec2,
}

impl WorldRect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    /// Square of side `world_size` centered on the origin
    pub fn centered(world_size: f32) -> Self {
        Self {
            min: Vec2::splat(-world_size * 0.5),
            size: Vec2::splat(world_size),
        }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    fn is_valid(&self) -> bool {
        self.min.is_finite() && self.size.is_finite() && self.size.x > 0.0 && self.size.y > 0.0
    }
}

/// Immutable width x height grid of elevation samples, row-major along z
pub struct Heightfield {
    width: usize,
    height: usize,
    data: Vec<f32>,
    rect: WorldRect,
}

impl Heightfield {
    /// Wrap raw samples. `data[z * width + x]` is the sample at column x, row z.
    pub fn new(width: usize, height: usize, data: Vec<f32>, rect: WorldRect) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::Heightfield(format!(
                "raster must be at least 1x1, got {}x{}",
                width, height
            )));
        }
        if data.len() != width * height {
            return Err(Error::Heightfield(format!(
                "{}x{} raster needs {} samples, got {}",
                width,
                height,
                width * height,
                data.len()
            )));
        }
        if !rect.is_valid() {
            return Err(Error::Heightfield(format!("invalid world rect {:?}", rect)));
        }

        Ok(Self { width, height, data, rect })
    }

    /// Load a grayscale image as a heightfield.
    ///
    /// Pixels are read as 16-bit luma: `elevation = base + luma / 65535 * height_scale`.
    pub fn from_image(
        path: impl AsRef<Path>,
        rect: WorldRect,
        height_scale: f32,
        base: f32,
    ) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path)?.into_luma16();
        let (width, height) = image.dimensions();

        let data = image
            .into_raw()
            .into_iter()
            .map(|luma| base + luma as f32 / u16::MAX as f32 * height_scale)
            .collect();

        let field = Self::new(width as usize, height as usize, data, rect)?;
        if let Some((lo, hi)) = field.min_max() {
            log::info!(
                "Loaded {}x{} heightfield from {} ({:.1}m to {:.1}m)",
                width,
                height,
                path.display(),
                lo,
                hi
            );
        }
        Ok(field)
    }

    /// Samples per row (x direction)
    pub fn columns(&self) -> usize {
        self.width
    }

    /// Number of rows (z direction)
    pub fn rows(&self) -> usize {
        self.height
    }

    pub fn rect(&self) -> WorldRect {
        self.rect
    }

    /// Raw sample at integer raster coordinates (clamped)
    pub fn sample(&self, x: usize, z: usize) -> f32 {
        let x = x.min(self.width - 1);
        let z = z.min(self.height - 1);
        self.data[z * self.width + x]
    }

    /// Lowest and highest finite sample
    pub fn min_max(&self) -> Option<(f32, f32)> {
        self.data
            .iter()
            .copied()
            .filter(|h| h.is_finite())
            .fold(None, |acc, h| match acc {
                None => Some((h, h)),
                Some((lo, hi)) => Some((lo.min(h), hi.max(h))),
            })
    }

    /// Fractional raster coordinate of a world position, clamped to the raster
    fn to_raster(&self, x: f32, z: f32) -> (f32, f32) {
        let max_u = (self.width - 1) as f32;
        let max_v = (self.height - 1) as f32;
        let u = (x - self.rect.min.x) / self.rect.size.x * max_u;
        let v = (z - self.rect.min.y) / self.rect.size.y * max_v;
        (u.clamp(0.0, max_u), v.clamp(0.0, max_v))
    }
}

impl HeightSource for Heightfield {
    fn try_height(&self, x: f32, z: f32) -> Option<f32> {
        if !x.is_finite() || !z.is_finite() {
            return None;
        }

        let (u, v) = self.to_raster(x, z);

        let x0 = (u.floor() as usize).min(self.width - 1);
        let z0 = (v.floor() as usize).min(self.height - 1);
        let x1 = (x0 + 1).min(self.width - 1);
        let z1 = (z0 + 1).min(self.height - 1);

        let tx = u - x0 as f32;
        let tz = v - z0 as f32;

        let h00 = self.data[z0 * self.width + x0];
        let h10 = self.data[z0 * self.width + x1];
        let h01 = self.data[z1 * self.width + x0];
        let h11 = self.data[z1 * self.width + x1];

        // Bilinear interpolation
        let h0 = h00 + tx * (h10 - h00);
        let h1 = h01 + tx * (h11 - h01);
        let h = h0 + tz * (h1 - h0);

        h.is_finite().then_some(h)
    }
}
