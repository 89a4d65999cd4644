//! Error types for filehost.

use thiserror::Error;

/// Common error type for filehost.
#[derive(Error, Debug)]
pub enum FilehostError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// A filename that cannot be used to address a stored file.
    #[error("invalid filename: {0}")]
    InvalidFilename(String),

    /// Payload claimed an image extension but could not be decoded.
    #[error("image decode error: {0}")]
    ImageDecode(String),

    /// Re-encoding a decoded image failed.
    #[error("image encode error: {0}")]
    ImageEncode(String),

    /// Reading the upload payload failed.
    #[error("upload error: {0}")]
    Upload(String),

    /// Upload exceeded the configured size limit.
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for filehost operations.
pub type Result<T> = std::result::Result<T, FilehostError>;
