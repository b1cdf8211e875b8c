//! Document records and the document service.
//!
//! A document is either an uploaded file (metadata plus a blob in the blob
//! store) or a rich-text record. The document service owns the coupling
//! between a record and its blob: nothing else reads or writes blobs.

mod error;
mod service;
mod types;

pub use error::DocumentError;
pub use service::{DocumentRepository, DocumentService};
pub use types::{
    CreateTextDocumentInput, Document, DocumentKind, DocumentPatch, StagedBlob,
};
