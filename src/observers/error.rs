//! Error type for observers that can fail.
//!
//! Only serialization can fail; the table observer always succeeds.

use thiserror::Error;

/// Error type for observer operations.
#[derive(Debug, Error)]
pub enum ObserverError {
    /// Error from the JSON observer.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for observer operations.
pub type Result<T> = std::result::Result<T, ObserverError>;
