//! Error types for UltraKey.

use thiserror::Error;

/// Main error type for keying operations.
#[derive(Error, Debug)]
pub enum KeyerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Malformed frame: {0}")]
    MalformedFrame(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for keying operations.
pub type Result<T> = std::result::Result<T, KeyerError>;
