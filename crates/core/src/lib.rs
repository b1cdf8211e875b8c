//! Core business logic for Docuvault.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, validation rules, and the service
//! orchestration live here.
//!
//! # Modules
//!
//! - `storage` - Blob store for uploaded file content
//! - `share` - Signed capability tokens for time-limited document access
//! - `document` - Document records and the document service
//! - `folder` - Folder records and the folder service
//! - `template` - Built-in rich-text template catalog

pub mod document;
pub mod folder;
pub mod share;
pub mod storage;
pub mod template;
