//! Per-frame LOD scheduling

pub mod lod;
pub mod budget;
pub mod priority;

pub use lod::{
    LodBand, LodConfig, LodLadder,
    DEFAULT_HYSTERESIS, DEFAULT_RESOLUTIONS, DEFAULT_THRESHOLDS,
};
pub use budget::RebuildBudget;
pub use priority::{RebuildQueue, RebuildRequest};
