//! Scene collaborator that receives terrain meshes

pub mod terrain_scene;

pub use terrain_scene::{NullScene, RecordingScene, SceneCall, TerrainScene};
