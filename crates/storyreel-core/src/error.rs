//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A scene identifier did not resolve to any scene record.
    #[error("scene not found: {0}")]
    SceneNotFound(String),

    /// Content failed eager validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// Content could not be parsed.
    #[error("content format error: {0}")]
    ContentFormat(String),

    /// An infrastructure error (analytics transport, I/O).
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
