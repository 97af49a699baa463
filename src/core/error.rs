//! Error types for the terralod crate

use thiserror::Error;

/// Main error type for the crate
///
/// Errors only arise at the data-ingestion boundary (heightmap validation,
/// descriptor I/O). The per-frame quadtree update is infallible.
#[derive(Debug, Error)]
pub enum Error {
    #[error("heightmap error: {0}")]
    Heightmap(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
