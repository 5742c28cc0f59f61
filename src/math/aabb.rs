//! Axis-aligned bounding boxes for chunk culling

use crate::core::types::Vec3;

/// Box spanning `min..=max` on every axis
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Inverted box that the first [`expand`](Self::expand) call overwrites
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    /// Grow to include `point`
    pub fn expand(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_expand_overwrites_empty() {
        let mut aabb = Aabb::empty();
        aabb.expand(Vec3::new(3.0, -1.0, 2.0));
        assert_eq!(aabb.min, Vec3::new(3.0, -1.0, 2.0));
        assert_eq!(aabb.max, aabb.min);
    }

    #[test]
    fn test_expand_accumulates() {
        let mut aabb = Aabb::empty();
        for p in [Vec3::new(1.0, -2.0, 3.0), Vec3::new(-1.0, 4.0, 0.0), Vec3::ZERO] {
            aabb.expand(p);
        }
        assert_eq!(aabb.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 4.0, 3.0));
    }

    #[test]
    fn test_flat_tile_has_zero_height() {
        let mut aabb = Aabb::empty();
        aabb.expand(Vec3::new(0.0, 50.0, 0.0));
        aabb.expand(Vec3::new(256.0, 50.0, 256.0));
        assert_eq!(aabb, Aabb::new(Vec3::new(0.0, 50.0, 0.0), Vec3::new(256.0, 50.0, 256.0)));
    }
}
