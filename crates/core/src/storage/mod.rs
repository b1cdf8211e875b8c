//! Blob store for uploaded file content, built on Apache OpenDAL.
//!
//! The store is a pure byte-addressable layer: it never parses content and
//! never invents keys. Storage keys are generated by the document service.
//! Supported backends:
//! - S3-compatible: Cloudflare R2, Supabase Storage, AWS S3, DigitalOcean Spaces
//! - Azure Blob Storage
//! - Local filesystem (development)
//! - In-memory (tests)

mod config;
mod error;
mod service;

pub use config::{BlobStoreConfig, StorageProvider};
pub use error::StorageError;
pub use service::{BlobStore, blob_key, sanitize_filename};
