//! Document error types.

use thiserror::Error;
use uuid::Uuid;

use crate::share::ShareTokenError;
use crate::storage::StorageError;

/// Document operation errors.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Document absent or not owned by the caller; the two cases are
    /// deliberately indistinguishable.
    #[error("document not found: {0}")]
    NotFound(Uuid),

    /// Referenced folder absent or not owned by the caller.
    #[error("folder not found: {0}")]
    FolderNotFound(Uuid),

    /// Malformed or missing input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Blob store operation failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Share token invalid or expired.
    #[error("share token error: {0}")]
    ShareToken(#[from] ShareTokenError),

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl DocumentError {
    /// Create a not found error.
    #[must_use]
    pub const fn not_found(id: Uuid) -> Self {
        Self::NotFound(id)
    }

    /// Create a validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }
}
