//! Folder types and data structures.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Folder domain model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    /// Unique identifier, generated on create.
    pub id: Uuid,
    /// Owner identity, set at creation from the caller's verified identity.
    pub owner_id: Uuid,
    /// Display name, unique only in the owner's head.
    pub name: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Creation timestamp, immutable.
    pub created_at: DateTime<Utc>,
    /// Bumped on every mutation.
    pub updated_at: DateTime<Utc>,
}

/// A folder annotated with the number of documents filed under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderWithCount {
    /// The folder itself.
    pub folder: Folder,
    /// Documents currently filed under the folder.
    pub document_count: u64,
}

/// Input for creating a folder.
#[derive(Debug, Clone, Default)]
pub struct CreateFolderInput {
    /// Display name (required, 1 to 100 characters).
    pub name: String,
    /// Optional description (at most 500 characters).
    pub description: Option<String>,
}

/// Explicit set of patchable folder fields.
///
/// `description` is a double option: `None` leaves it untouched,
/// `Some(None)` clears it, `Some(Some(text))` replaces it.
#[derive(Debug, Clone, Default)]
pub struct FolderPatch {
    /// New display name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<Option<String>>,
}

impl FolderPatch {
    /// Whether the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}
