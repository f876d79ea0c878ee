//! Error types for unwind-core

use thiserror::Error;

/// Main error type for the unwind-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Snapshot content is structurally unusable
    #[error("snapshot error: {0}")]
    Snapshot(String),

    /// Person thumbnail lookup failed
    #[error("image lookup error: {0}")]
    ImageLookup(String),
}

/// Result type alias for unwind-core
pub type Result<T> = std::result::Result<T, Error>;
