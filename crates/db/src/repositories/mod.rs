//! Repository implementations backed by `SeaORM`.

mod document;
mod folder;
#[cfg(test)]
mod folder_integration_tests;

pub use document::DocumentRepository;
pub use folder::FolderRepository;
