//! A single terrain tile and its level-of-detail state

use glam::{Vec2, Vec3};

use super::height_source::SharedHeightSource;
use super::mesh::ChunkMesh;
use crate::math::{Aabb, Frustum};
use crate::streaming::lod::LodLadder;

/// One tile of terrain at one resolution tier
///
/// The chunk always holds geometry matching its recorded LOD until it is
/// disposed. A tier change drops the old mesh before building the new one.
pub struct TerrainChunk {
    origin: Vec2,
    extent: Vec2,
    source: SharedHeightSource,
    lod: u32,
    mesh: Option<ChunkMesh>,
    bounds: Aabb,
    visible: bool,
    last_distance: f32,
    rebuilds: u32,
    missing_samples: usize,
}

impl TerrainChunk {
    /// Build a chunk with its geometry ready at `initial_lod`
    pub fn new(origin: Vec2, extent: Vec2, source: SharedHeightSource, initial_lod: u32, ladder: &LodLadder) -> Self {
        let mut chunk = Self {
            origin,
            extent,
            source,
            lod: initial_lod.min(ladder.max_lod()),
            mesh: None,
            bounds: Aabb::default(),
            visible: false,
            last_distance: f32::INFINITY,
            rebuilds: 0,
            missing_samples: 0,
        };
        chunk.build_mesh(ladder.resolution(chunk.lod));
        chunk
    }

    fn build_mesh(&mut self, resolution: u32) {
        let build = ChunkMesh::build(self.origin, self.extent, resolution, self.source.as_ref());
        if build.missing_samples > 0 {
            log::warn!(
                "Chunk at ({}, {}) missing height data for {} of {} vertices, using 0.0",
                self.origin.x,
                self.origin.y,
                build.missing_samples,
                build.mesh.vertex_count()
            );
        }
        self.missing_samples = build.missing_samples;
        self.bounds = build.mesh.bounds();
        self.mesh = Some(build.mesh);
    }

    /// World-space (x, z) of the minimum corner
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Footprint size along x and z in meters. Square except on clipped
    /// world edges.
    pub fn extent(&self) -> Vec2 {
        self.extent
    }

    /// World-space (x, z) of the footprint center
    pub fn center(&self) -> Vec2 {
        self.origin + self.extent * 0.5
    }

    /// Current LOD tier (0 = finest)
    pub fn lod(&self) -> u32 {
        self.lod
    }

    /// Vertices per side of the current mesh, 0 once disposed
    pub fn resolution(&self) -> u32 {
        self.mesh.as_ref().map_or(0, ChunkMesh::resolution)
    }

    pub fn mesh(&self) -> Option<&ChunkMesh> {
        self.mesh.as_ref()
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_disposed(&self) -> bool {
        self.mesh.is_none()
    }

    /// Horizontal distance recorded at the last LOD evaluation
    pub fn last_distance(&self) -> f32 {
        self.last_distance
    }

    /// Number of tier-change rebuilds since construction
    pub fn rebuild_count(&self) -> u32 {
        self.rebuilds
    }

    /// Vertices of the current mesh that fell back to zero elevation
    pub fn missing_samples(&self) -> usize {
        self.missing_samples
    }

    /// Horizontal (x/z) distance from `camera_position` to the chunk center.
    /// Altitude is ignored so climbing never changes the tier.
    pub fn horizontal_distance(&self, camera_position: Vec3) -> f32 {
        let camera = Vec2::new(camera_position.x, camera_position.z);
        self.center().distance(camera)
    }

    /// Tier the chunk should be at for this camera position
    pub fn target_lod(&mut self, camera_position: Vec3, ladder: &LodLadder) -> u32 {
        let distance = self.horizontal_distance(camera_position);
        self.last_distance = distance;
        ladder.resolve(distance, self.lod)
    }

    /// Rebuild geometry at `lod` if it differs from the current tier.
    /// Returns whether a rebuild happened.
    pub fn apply_lod(&mut self, lod: u32, ladder: &LodLadder) -> bool {
        let lod = lod.min(ladder.max_lod());
        if lod == self.lod || self.is_disposed() {
            return false;
        }

        log::trace!(
            "Chunk at ({}, {}) LOD {} -> {}",
            self.origin.x,
            self.origin.y,
            self.lod,
            lod
        );

        // Release the old buffers before allocating the replacement
        self.mesh = None;
        self.lod = lod;
        self.build_mesh(ladder.resolution(lod));
        self.rebuilds += 1;
        true
    }

    /// Re-evaluate the tier for `camera_position` and rebuild synchronously
    /// on change. Returns whether a rebuild happened.
    pub fn update_lod(&mut self, camera_position: Vec3, ladder: &LodLadder) -> bool {
        let target = self.target_lod(camera_position, ladder);
        self.apply_lod(target, ladder)
    }

    /// Bounding-volume test against the view frustum
    pub fn is_in_frustum(&self, frustum: &Frustum) -> bool {
        !self.is_disposed() && frustum.intersects_aabb(&self.bounds)
    }

    /// Set the visibility flag. Returns whether it changed.
    pub fn set_visible(&mut self, visible: bool) -> bool {
        let visible = visible && !self.is_disposed();
        let changed = self.visible != visible;
        self.visible = visible;
        changed
    }

    /// Elevation at chunk-local (x, z), measured from the chunk origin
    pub fn get_height(&self, local_x: f32, local_z: f32) -> f32 {
        self.source.height(self.origin.x + local_x, self.origin.y + local_z)
    }

    /// Release the mesh. Calling again is a no-op.
    pub fn dispose(&mut self) {
        if self.mesh.take().is_some() {
            self.visible = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::core::types::Mat4;
    use crate::streaming::lod::LodConfig;
    use crate::terrain::height_source::{FlatHeight, HeightSource};

    struct Ramp;

    impl HeightSource for Ramp {
        fn try_height(&self, x: f32, z: f32) -> Option<f32> {
            Some(0.1 * x + 0.05 * z)
        }
    }

    fn flat_chunk(origin: Vec2) -> TerrainChunk {
        TerrainChunk::new(origin, Vec2::splat(256.0), Arc::new(FlatHeight(10.0)), 0, &LodLadder::default())
    }

    fn plain_ladder() -> LodLadder {
        LodLadder::new(&LodConfig {
            hysteresis: 0.0,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_construct_is_render_ready() {
        let chunk = flat_chunk(Vec2::new(-1024.0, -1024.0));
        assert_eq!(chunk.lod(), 0);
        assert_eq!(chunk.resolution(), 64);
        assert!(chunk.mesh().is_some());
        assert!(!chunk.is_visible());
        assert_eq!(chunk.center(), Vec2::new(-896.0, -896.0));
        assert_eq!(chunk.bounds().min, Vec3::new(-1024.0, 10.0, -1024.0));
        assert_eq!(chunk.bounds().max, Vec3::new(-768.0, 10.0, -768.0));
    }

    #[test]
    fn test_initial_lod_clamped() {
        let chunk = TerrainChunk::new(Vec2::ZERO, Vec2::splat(64.0), Arc::new(FlatHeight(0.0)), 9, &LodLadder::default());
        assert_eq!(chunk.lod(), 2);
        assert_eq!(chunk.resolution(), 16);
    }

    #[test]
    fn test_update_lod_rebuilds_on_tier_change() {
        let ladder = plain_ladder();
        let mut chunk = flat_chunk(Vec2::ZERO);

        // Camera over the chunk center: stays at LOD 0
        assert!(!chunk.update_lod(Vec3::new(128.0, 50.0, 128.0), &ladder));
        assert_eq!(chunk.rebuild_count(), 0);

        // 2000m away: straight to the coarsest tier
        assert!(chunk.update_lod(Vec3::new(2128.0, 50.0, 128.0), &ladder));
        assert_eq!(chunk.lod(), 2);
        assert_eq!(chunk.resolution(), 16);
        assert_eq!(chunk.mesh().unwrap().vertex_count(), 256);
        assert_eq!(chunk.rebuild_count(), 1);

        // Same distance again: no work
        assert!(!chunk.update_lod(Vec3::new(2128.0, 50.0, 128.0), &ladder));
        assert_eq!(chunk.rebuild_count(), 1);
    }

    #[test]
    fn test_distance_ignores_altitude() {
        let ladder = plain_ladder();
        let mut chunk = flat_chunk(Vec2::ZERO);

        let low = Vec3::new(128.0, 0.0, 128.0);
        let high = Vec3::new(128.0, 5000.0, 128.0);
        assert_eq!(chunk.horizontal_distance(low), 0.0);
        assert_eq!(chunk.horizontal_distance(high), 0.0);
        assert!(!chunk.update_lod(high, &ladder));
        assert_eq!(chunk.lod(), 0);
    }

    #[test]
    fn test_lod_monotonic_moving_away() {
        let ladder = LodLadder::default();
        let mut chunk = flat_chunk(Vec2::ZERO);
        let mut prev = chunk.lod();
        for step in 0..300 {
            let camera = Vec3::new(128.0 + step as f32 * 10.0, 100.0, 128.0);
            chunk.update_lod(camera, &ladder);
            assert!(chunk.lod() >= prev);
            assert_eq!(chunk.resolution(), ladder.resolution(chunk.lod()));
            prev = chunk.lod();
        }
        assert_eq!(chunk.lod(), 2);
        assert_eq!(chunk.rebuild_count(), 2);
    }

    #[test]
    fn test_set_visible_idempotent() {
        let mut chunk = flat_chunk(Vec2::ZERO);
        assert!(chunk.set_visible(true));
        assert!(!chunk.set_visible(true));
        assert!(chunk.is_visible());
        assert!(chunk.set_visible(false));
        assert!(!chunk.set_visible(false));
        // No geometry side effects
        assert_eq!(chunk.rebuild_count(), 0);
        assert_eq!(chunk.resolution(), 64);
    }

    #[test]
    fn test_is_in_frustum() {
        let chunk = flat_chunk(Vec2::ZERO);
        let proj = Mat4::orthographic_rh(-100.0, 100.0, -100.0, 100.0, 1.0, 1000.0);

        let above = Mat4::look_at_rh(Vec3::new(128.0, 500.0, 128.0), Vec3::new(128.0, 0.0, 128.0), Vec3::Z);
        assert!(chunk.is_in_frustum(&Frustum::from_view_projection(&(proj * above))));

        let elsewhere = Mat4::look_at_rh(Vec3::new(5000.0, 500.0, 5000.0), Vec3::new(5000.0, 0.0, 5000.0), Vec3::Z);
        assert!(!chunk.is_in_frustum(&Frustum::from_view_projection(&(proj * elsewhere))));
    }

    #[test]
    fn test_get_height_local_frame() {
        let chunk = TerrainChunk::new(Vec2::new(100.0, 200.0), Vec2::splat(50.0), Arc::new(Ramp), 0, &LodLadder::default());
        let expected = 0.1 * 110.0 + 0.05 * 220.0;
        assert!((chunk.get_height(10.0, 20.0) - expected).abs() < 1e-4);
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let ladder = plain_ladder();
        let mut chunk = flat_chunk(Vec2::ZERO);
        chunk.set_visible(true);

        chunk.dispose();
        assert!(chunk.is_disposed());
        assert!(!chunk.is_visible());
        assert_eq!(chunk.resolution(), 0);

        chunk.dispose();
        assert!(chunk.is_disposed());

        // Disposed chunks never rebuild or show
        assert!(!chunk.update_lod(Vec3::new(5000.0, 0.0, 0.0), &ladder));
        assert!(!chunk.set_visible(true));
        assert!(!chunk.is_visible());
    }

    #[test]
    fn test_missing_samples_recorded() {
        struct Nothing;
        impl HeightSource for Nothing {
            fn try_height(&self, _x: f32, _z: f32) -> Option<f32> {
                None
            }
        }

        let chunk = TerrainChunk::new(Vec2::ZERO, Vec2::splat(32.0), Arc::new(Nothing), 2, &LodLadder::default());
        assert_eq!(chunk.missing_samples(), 16 * 16);
        assert_eq!(chunk.get_height(1.0, 1.0), 0.0);
        assert_eq!(chunk.bounds().min.y, 0.0);
    }
}
