//! The grid's view of the host renderer
//!
//! The grid never owns GPU resources. It hands each chunk's mesh to a
//! [`TerrainScene`] when the chunk is created or rebuilt, and forwards
//! visibility changes. Hosts map [`ChunkId`] to whatever draw handle they use.

use crate::terrain::coord::ChunkId;
use crate::terrain::mesh::ChunkMesh;

/// Receiver for chunk mesh lifecycle events
pub trait TerrainScene {
    /// A chunk was created with `mesh`
    fn add_mesh(&mut self, id: ChunkId, mesh: &ChunkMesh);

    /// A chunk's geometry was rebuilt at a new resolution
    fn update_mesh(&mut self, id: ChunkId, mesh: &ChunkMesh);

    /// A chunk was disposed
    fn remove_mesh(&mut self, id: ChunkId);

    /// A chunk's visibility flag changed
    fn set_visible(&mut self, id: ChunkId, visible: bool);
}

/// Scene that ignores every event, for headless runs
#[derive(Clone, Copy, Debug, Default)]
pub struct NullScene;

impl TerrainScene for NullScene {
    fn add_mesh(&mut self, _id: ChunkId, _mesh: &ChunkMesh) {}
    fn update_mesh(&mut self, _id: ChunkId, _mesh: &ChunkMesh) {}
    fn remove_mesh(&mut self, _id: ChunkId) {}
    fn set_visible(&mut self, _id: ChunkId, _visible: bool) {}
}

/// One event received by a [`RecordingScene`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneCall {
    Add { id: ChunkId, resolution: u32 },
    Update { id: ChunkId, resolution: u32 },
    Remove(ChunkId),
    Visible(ChunkId, bool),
}

/// Scene that records every event in order
#[derive(Clone, Debug, Default)]
pub struct RecordingScene {
    calls: Vec<SceneCall>,
}

impl RecordingScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[SceneCall] {
        &self.calls
    }

    /// Drain recorded events
    pub fn take_calls(&mut self) -> Vec<SceneCall> {
        std::mem::take(&mut self.calls)
    }

    /// Number of recorded events matching `pred`
    pub fn count(&self, pred: impl Fn(&SceneCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }
}

impl TerrainScene for RecordingScene {
    fn add_mesh(&mut self, id: ChunkId, mesh: &ChunkMesh) {
        self.calls.push(SceneCall::Add {
            id,
            resolution: mesh.resolution(),
        });
    }

    fn update_mesh(&mut self, id: ChunkId, mesh: &ChunkMesh) {
        self.calls.push(SceneCall::Update {
            id,
            resolution: mesh.resolution(),
        });
    }

    fn remove_mesh(&mut self, id: ChunkId) {
        self.calls.push(SceneCall::Remove(id));
    }

    fn set_visible(&mut self, id: ChunkId, visible: bool) {
        self.calls.push(SceneCall::Visible(id, visible));
    }
}
