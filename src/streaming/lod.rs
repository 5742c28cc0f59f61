//! Level of Detail (LOD) ladder for distance-based mesh resolution
//!
//! Each chunk picks a resolution tier from an ordered list of distance
//! bands, nearest band first. LOD 0 is the finest tier. A hysteresis margin
//! around every threshold keeps a camera parked on a boundary from flipping
//! a chunk between two tiers every frame.

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};

/// Default bands:
/// - LOD 0: 64 vertices/side - 0-512m
/// - LOD 1: 32 vertices/side - 512-1024m
/// - LOD 2: 16 vertices/side - 1024m+
pub const DEFAULT_RESOLUTIONS: [u32; 3] = [64, 32, 16];

/// Upper distance bound of each default band except the last
pub const DEFAULT_THRESHOLDS: [f32; 2] = [512.0, 1024.0];

/// Default hysteresis margin in meters
pub const DEFAULT_HYSTERESIS: f32 = 16.0;

/// One distance band of the ladder
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LodBand {
    /// Vertices per chunk side at this tier
    pub resolution: u32,
    /// Exclusive upper distance bound; `None` means unbounded
    pub max_distance: Option<f32>,
}

/// Configuration for LOD behavior
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LodConfig {
    /// Bands ordered nearest first
    pub bands: Vec<LodBand>,
    /// Distance slack (meters) that must be crossed past a threshold before
    /// a tier change. 0.0 gives the plain ladder.
    pub hysteresis: f32,
}

impl Default for LodConfig {
    fn default() -> Self {
        let bands = DEFAULT_RESOLUTIONS
            .iter()
            .enumerate()
            .map(|(i, &resolution)| LodBand {
                resolution,
                max_distance: DEFAULT_THRESHOLDS.get(i).copied(),
            })
            .collect();

        Self {
            bands,
            hysteresis: DEFAULT_HYSTERESIS,
        }
    }
}

/// Validated, ready-to-query LOD ladder
#[derive(Clone, Debug, PartialEq)]
pub struct LodLadder {
    resolutions: Vec<u32>,
    /// Same length as `resolutions`; last entry is infinity
    thresholds: Vec<f32>,
    hysteresis: f32,
}

impl LodLadder {
    /// Build a ladder from config, rejecting unordered or degenerate bands.
    ///
    /// # Examples
    /// ```
    /// use terrastream::streaming::lod::{LodBand, LodConfig, LodLadder};
    ///
    /// let config = LodConfig {
    ///     bands: vec![
    ///         LodBand { resolution: 33, max_distance: Some(100.0) },
    ///         LodBand { resolution: 9, max_distance: None },
    ///     ],
    ///     hysteresis: 0.0,
    /// };
    /// let ladder = LodLadder::new(&config).unwrap();
    /// assert_eq!(ladder.lod_count(), 2);
    /// assert_eq!(ladder.resolution(1), 9);
    ///
    /// let unordered = LodConfig {
    ///     bands: vec![
    ///         LodBand { resolution: 9, max_distance: Some(100.0) },
    ///         LodBand { resolution: 33, max_distance: None },
    ///     ],
    ///     hysteresis: 0.0,
    /// };
    /// assert!(LodLadder::new(&unordered).is_err());
    /// ```
    pub fn new(config: &LodConfig) -> Result<Self> {
        let bands = &config.bands;
        if bands.is_empty() {
            return Err(Error::Config("LOD ladder needs at least one band".into()));
        }

        let mut resolutions = Vec::with_capacity(bands.len());
        let mut thresholds = Vec::with_capacity(bands.len());
        let last = bands.len() - 1;

        for (i, band) in bands.iter().enumerate() {
            if band.resolution < 2 {
                return Err(Error::Config(format!(
                    "LOD {} resolution {} is below 2 vertices per side",
                    i, band.resolution
                )));
            }
            if let Some(&prev) = resolutions.last() {
                if band.resolution > prev {
                    return Err(Error::Config(format!(
                        "LOD {} resolution {} is finer than LOD {} ({})",
                        i, band.resolution, i - 1, prev
                    )));
                }
            }

            let threshold = match (i == last, band.max_distance) {
                (true, _) => f32::INFINITY,
                (false, Some(d)) if d.is_finite() && d > 0.0 => d,
                (false, other) => {
                    return Err(Error::Config(format!(
                        "LOD {} needs a finite positive max_distance, got {:?}",
                        i, other
                    )));
                }
            };
            if let Some(&prev) = thresholds.last() {
                if threshold <= prev {
                    return Err(Error::Config(format!(
                        "LOD {} threshold {} does not increase past {}",
                        i, threshold, prev
                    )));
                }
            }

            resolutions.push(band.resolution);
            thresholds.push(threshold);
        }

        let hysteresis = config.hysteresis;
        if !hysteresis.is_finite() || hysteresis < 0.0 {
            return Err(Error::Config(format!("invalid hysteresis {}", hysteresis)));
        }
        let narrowest = thresholds[..last]
            .iter()
            .scan(0.0_f32, |start, &end| {
                let width = end - *start;
                *start = end;
                Some(width)
            })
            .fold(f32::INFINITY, f32::min);
        if 2.0 * hysteresis >= narrowest {
            return Err(Error::Config(format!(
                "hysteresis {} is too wide for a {}m band",
                hysteresis, narrowest
            )));
        }

        Ok(Self {
            resolutions,
            thresholds,
            hysteresis,
        })
    }

    /// Number of tiers
    pub fn lod_count(&self) -> usize {
        self.resolutions.len()
    }

    /// Coarsest LOD index
    pub fn max_lod(&self) -> u32 {
        (self.resolutions.len() - 1) as u32
    }

    /// Vertices per side at `lod`, clamped to the coarsest tier
    pub fn resolution(&self, lod: u32) -> u32 {
        let index = (lod as usize).min(self.resolutions.len() - 1);
        self.resolutions[index]
    }

    /// Hysteresis margin in meters
    pub fn hysteresis(&self) -> f32 {
        self.hysteresis
    }

    /// Plain ladder lookup: first band whose threshold exceeds `distance`.
    ///
    /// # Examples
    /// ```
    /// use terrastream::streaming::lod::LodLadder;
    ///
    /// let ladder = LodLadder::default();
    /// assert_eq!(ladder.lod_for_distance(100.0), 0);  // 64 verts
    /// assert_eq!(ladder.lod_for_distance(512.0), 1);  // 32 verts
    /// assert_eq!(ladder.lod_for_distance(2000.0), 2); // 16 verts
    /// ```
    pub fn lod_for_distance(&self, distance: f32) -> u32 {
        for (level, &max_dist) in self.thresholds.iter().enumerate() {
            if distance < max_dist {
                return level as u32;
            }
        }
        self.max_lod()
    }

    /// Tier for `distance` given the chunk currently sits at `current`.
    ///
    /// Moving away, the chunk coarsens only once it is `hysteresis` past a
    /// threshold; moving closer, it refines only once `hysteresis` inside.
    ///
    /// # Examples
    /// ```
    /// use terrastream::streaming::lod::LodLadder;
    ///
    /// let ladder = LodLadder::default(); // 16m hysteresis
    /// assert_eq!(ladder.resolve(520.0, 0), 0);  // not far enough past 512
    /// assert_eq!(ladder.resolve(530.0, 0), 1);
    /// assert_eq!(ladder.resolve(500.0, 1), 1);  // not far enough inside 512
    /// assert_eq!(ladder.resolve(490.0, 1), 0);
    /// ```
    pub fn resolve(&self, distance: f32, current: u32) -> u32 {
        let current = current.min(self.max_lod());

        let coarser = self.lod_for_distance(distance - self.hysteresis);
        if coarser > current {
            return coarser;
        }

        let finer = self.lod_for_distance(distance + self.hysteresis);
        if finer < current {
            return finer;
        }

        current
    }
}

impl Default for LodLadder {
    fn default() -> Self {
        let resolutions = DEFAULT_RESOLUTIONS.to_vec();
        let mut thresholds = DEFAULT_THRESHOLDS.to_vec();
        thresholds.push(f32::INFINITY);

        Self {
            resolutions,
            thresholds,
            hysteresis: DEFAULT_HYSTERESIS,
        }
    }
}
