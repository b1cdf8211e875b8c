//! Folders and the folder service.
//!
//! Folders are a flat, per-owner namespace for organizing documents. A
//! folder is only ever deleted when it is empty; documents filed under it
//! keep it alive.

mod error;
mod service;
mod types;

pub use error::FolderError;
pub use service::{DeleteIfEmptyOutcome, FolderRepository, FolderService};
pub use types::{CreateFolderInput, Folder, FolderPatch, FolderWithCount};
