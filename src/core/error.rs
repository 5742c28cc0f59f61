//! Error types for terrain construction
//!
//! Only load-time paths return these. The per-frame update and height
//! queries degrade locally instead of failing.

use thiserror::Error;

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Heightfield error: {0}")]
    Heightfield(String),
}
