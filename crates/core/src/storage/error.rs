//! Blob store error types.

use thiserror::Error;

/// Blob store operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Blob size exceeds maximum allowed.
    #[error("blob size {size} bytes exceeds maximum allowed {max} bytes")]
    BlobTooLarge {
        /// Bytes received so far.
        size: u64,
        /// Maximum allowed size.
        max: u64,
    },

    /// Blob not found in storage.
    #[error("blob not found: {key}")]
    NotFound {
        /// Storage key that was not found.
        key: String,
    },

    /// Storage provider configuration error.
    #[error("storage configuration error: {0}")]
    Configuration(String),

    /// OpenDAL operation error.
    #[error("storage operation failed: {0}")]
    Operation(String),
}

impl StorageError {
    /// Create a blob too large error.
    #[must_use]
    pub fn blob_too_large(size: u64, max: u64) -> Self {
        Self::BlobTooLarge { size, max }
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create an operation error.
    #[must_use]
    pub fn operation(msg: impl Into<String>) -> Self {
        Self::Operation(msg.into())
    }

    /// Whether this error means the blob does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<opendal::Error> for StorageError {
    fn from(err: opendal::Error) -> Self {
        match err.kind() {
            opendal::ErrorKind::NotFound => Self::NotFound {
                key: err.to_string(),
            },
            _ => Self::Operation(err.to_string()),
        }
    }
}
