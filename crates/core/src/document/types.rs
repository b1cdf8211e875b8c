//! Document types and data structures.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Kind-specific document fields.
///
/// Each constructor carries only its own mandatory fields: a file document
/// always has a blob reference, a text document never does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentKind {
    /// An uploaded binary file backed by a blob.
    File {
        /// Key addressing the blob in the blob store.
        storage_key: String,
        /// Filename as uploaded.
        original_name: String,
        /// Blob size in bytes.
        size_bytes: u64,
        /// MIME type as uploaded.
        mime_type: String,
    },
    /// A rich-text record stored inline.
    Text {
        /// Rich-text body (may be empty).
        content: String,
        /// Optional reference to an external template. Never validated by
        /// the core.
        template_id: Option<String>,
    },
}

impl DocumentKind {
    /// Kind discriminant as stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::File { .. } => "file",
            Self::Text { .. } => "text",
        }
    }

    /// Whether this is a file document.
    #[must_use]
    pub const fn is_file(&self) -> bool {
        matches!(self, Self::File { .. })
    }
}

/// Document domain model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Unique identifier, generated on create.
    pub id: Uuid,
    /// Owner identity, set at creation from the caller's verified identity.
    pub owner_id: Uuid,
    /// Mutable display name.
    pub name: String,
    /// Containing folder; `None` means unfiled.
    pub folder_id: Option<Uuid>,
    /// Kind-specific fields.
    pub kind: DocumentKind,
    /// Creation timestamp, immutable.
    pub uploaded_at: DateTime<Utc>,
    /// Bumped on every mutation.
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// The blob storage key, for file documents.
    #[must_use]
    pub fn storage_key(&self) -> Option<&str> {
        match &self.kind {
            DocumentKind::File { storage_key, .. } => Some(storage_key),
            DocumentKind::Text { .. } => None,
        }
    }
}

/// A blob already written to the blob store, awaiting its metadata record.
#[derive(Debug, Clone)]
pub struct StagedBlob {
    /// Document id reserved for the record (also part of the storage key).
    pub document_id: Uuid,
    /// Key the blob was written under.
    pub storage_key: String,
    /// Filename as uploaded.
    pub original_name: String,
    /// MIME type as uploaded.
    pub mime_type: String,
    /// Bytes actually written.
    pub size_bytes: u64,
}

/// Input for creating a text document.
#[derive(Debug, Clone, Default)]
pub struct CreateTextDocumentInput {
    /// Display name (required, non-empty).
    pub name: String,
    /// Rich-text body; defaults to the empty string.
    pub content: Option<String>,
    /// Containing folder.
    pub folder_id: Option<Uuid>,
    /// Optional template reference.
    pub template_id: Option<String>,
}

/// Explicit set of patchable document fields.
///
/// `folder_id` is a double option: `None` leaves the folder untouched,
/// `Some(None)` unfiles the document, `Some(Some(id))` moves it. Everything
/// not listed here (kind, owner, timestamps, blob metadata) is immutable.
#[derive(Debug, Clone, Default)]
pub struct DocumentPatch {
    /// New display name.
    pub name: Option<String>,
    /// New folder assignment.
    pub folder_id: Option<Option<Uuid>>,
    /// New rich-text body (text documents only).
    pub content: Option<String>,
}

impl DocumentPatch {
    /// Whether the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.folder_id.is_none() && self.content.is_none()
    }
}
