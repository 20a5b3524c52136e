//! Error types for kegg-annotate
//!
//! All errors are designed to be user-facing with clear messages and
//! suggestions where a fix is obvious.

use thiserror::Error;

/// Result type alias for annotation operations
pub type Result<T> = std::result::Result<T, AnnotateError>;

/// Error type for annotation operations
#[derive(Error, Debug)]
pub enum AnnotateError {
    /// File system operation failed
    #[error("File operation failed: {0}. Check file permissions and disk space.")]
    Io(#[from] std::io::Error),

    /// Reading or writing the hit table failed
    #[error("CSV error: {0}. Verify the input is a 12-column DIAMOND tabular file.")]
    Csv(#[from] csv::Error),

    /// HTTP request failed
    #[error("Network request failed: {0}. Check your internet connection and the mapping service URL.")]
    Http(#[from] reqwest::Error),

    /// JSON serialization failed
    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Input arguments don't make sense
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Error from the shared workspace types
    #[error(transparent)]
    Common(#[from] kegg_common::KeggError),
}

impl AnnotateError {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
