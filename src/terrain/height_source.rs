//! Elevation data contract
//!
//! Everything that can answer "how high is the ground at (x, z)" implements
//! [`HeightSource`]: rasters, procedural generators, constants. Chunks share
//! one source read-only through an `Arc`.

use std::sync::Arc;

/// Elevation provider over world-space (x, z)
pub trait HeightSource: Send + Sync {
    /// Elevation at a world position, `None` when the source has no data.
    ///
    /// Must be deterministic. Sources backed by finite data clamp
    /// out-of-range coordinates rather than returning `None`.
    fn try_height(&self, x: f32, z: f32) -> Option<f32>;

    /// Elevation with missing or non-finite data mapped to 0.0
    fn height(&self, x: f32, z: f32) -> f32 {
        self.try_height(x, z)
            .filter(|h| h.is_finite())
            .unwrap_or(0.0)
    }
}

/// Shared, immutable height source handle
pub type SharedHeightSource = Arc<dyn HeightSource>;

/// Constant elevation everywhere
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlatHeight(pub f32);

impl HeightSource for FlatHeight {
    fn try_height(&self, _x: f32, _z: f32) -> Option<f32> {
        Some(self.0)
    }
}

impl<T: HeightSource + ?Sized> HeightSource for Arc<T> {
    fn try_height(&self, x: f32, z: f32) -> Option<f32> {
        (**self).try_height(x, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Holes;

    impl HeightSource for Holes {
        fn try_height(&self, x: f32, _z: f32) -> Option<f32> {
            if x < 0.0 {
                None
            } else if x > 100.0 {
                Some(f32::NAN)
            } else {
                Some(x)
            }
        }
    }

    #[test]
    fn test_flat_height() {
        let flat = FlatHeight(50.0);
        assert_eq!(flat.height(0.0, 0.0), 50.0);
        assert_eq!(flat.height(-1e6, 1e6), 50.0);
    }

    #[test]
    fn test_missing_data_falls_back_to_zero() {
        assert_eq!(Holes.height(-5.0, 0.0), 0.0);
        assert_eq!(Holes.height(500.0, 0.0), 0.0);
        assert_eq!(Holes.height(42.0, 0.0), 42.0);
    }

    #[test]
    fn test_shared_source_delegates() {
        let shared: SharedHeightSource = Arc::new(FlatHeight(7.0));
        assert_eq!(shared.height(1.0, 2.0), 7.0);
        assert_eq!(Arc::clone(&shared).try_height(1.0, 2.0), Some(7.0));
    }
}
