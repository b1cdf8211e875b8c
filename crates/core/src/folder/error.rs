//! Folder error types.

use thiserror::Error;
use uuid::Uuid;

/// Folder operation errors.
#[derive(Debug, Error)]
pub enum FolderError {
    /// Folder absent or not owned by the caller.
    #[error("folder not found: {0}")]
    NotFound(Uuid),

    /// Folder still contains documents and cannot be deleted.
    #[error("folder {id} is not empty ({document_count} documents)")]
    NotEmpty {
        /// The folder that was targeted for deletion.
        id: Uuid,
        /// Number of documents still filed under it.
        document_count: u64,
    },

    /// Malformed or missing input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl FolderError {
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
