//! Error types for schema conversion

use thiserror::Error;

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, ErdError>;

/// Conversion errors
///
/// Normalizer-stage errors are fatal and abort the whole run. Per-field
/// resolution misses are not errors at all; they simply produce no edge.
#[derive(Error, Debug)]
pub enum ErdError {
    #[error("unrecognized format: document root is not an array of type definitions")]
    UnrecognizedFormat,

    #[error("parse failure: {0}")]
    ParseFailure(String),

    #[error("dialect not implemented: {0}")]
    NotImplemented(&'static str),

    #[error("invalid style config: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
