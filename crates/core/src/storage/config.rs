//! Blob store configuration types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Storage provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageProvider {
    /// S3-compatible storage: Cloudflare R2, Supabase, AWS S3, DigitalOcean Spaces
    S3 {
        /// S3 endpoint URL.
        endpoint: String,
        /// S3 bucket name.
        bucket: String,
        /// AWS access key ID.
        access_key_id: String,
        /// AWS secret access key.
        secret_access_key: String,
        /// AWS region.
        region: String,
    },
    /// Azure Blob Storage
    AzureBlob {
        /// Azure storage account name.
        account: String,
        /// Azure storage access key.
        access_key: String,
        /// Azure container name.
        container: String,
    },
    /// Local filesystem (development only)
    LocalFs {
        /// Root directory path.
        root: PathBuf,
    },
    /// In-memory storage (tests only)
    Memory,
}

impl StorageProvider {
    /// Create S3-compatible provider (Cloudflare R2, Supabase, AWS S3).
    #[must_use]
    pub fn s3(
        endpoint: impl Into<String>,
        bucket: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self::S3 {
            endpoint: endpoint.into(),
            bucket: bucket.into(),
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            region: region.into(),
        }
    }

    /// Create Azure Blob Storage provider.
    #[must_use]
    pub fn azure_blob(
        account: impl Into<String>,
        access_key: impl Into<String>,
        container: impl Into<String>,
    ) -> Self {
        Self::AzureBlob {
            account: account.into(),
            access_key: access_key.into(),
            container: container.into(),
        }
    }

    /// Create local filesystem provider (development only).
    #[must_use]
    pub fn local_fs(root: impl Into<PathBuf>) -> Self {
        Self::LocalFs { root: root.into() }
    }

    /// Create in-memory provider (tests only).
    #[must_use]
    pub const fn memory() -> Self {
        Self::Memory
    }

    /// Get the provider name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::S3 { .. } => "s3",
            Self::AzureBlob { .. } => "azure_blob",
            Self::LocalFs { .. } => "local",
            Self::Memory => "memory",
        }
    }
}

/// Blob store configuration.
#[derive(Debug, Clone)]
pub struct BlobStoreConfig {
    /// Storage provider configuration.
    pub provider: StorageProvider,
    /// Maximum blob size in bytes, enforced while streaming an upload.
    pub max_blob_size: u64,
}

impl BlobStoreConfig {
    /// Default max blob size: 25MB.
    pub const DEFAULT_MAX_BLOB_SIZE: u64 = 25 * 1024 * 1024;

    /// Create a new blob store config with default settings.
    #[must_use]
    pub fn new(provider: StorageProvider) -> Self {
        Self {
            provider,
            max_blob_size: Self::DEFAULT_MAX_BLOB_SIZE,
        }
    }

    /// Set maximum blob size.
    #[must_use]
    pub const fn with_max_blob_size(mut self, size: u64) -> Self {
        self.max_blob_size = size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_provider_s3() {
        let provider = StorageProvider::s3(
            "https://account.r2.cloudflarestorage.com",
            "documents",
            "access_key",
            "secret_key",
            "auto",
        );
        assert_eq!(provider.name(), "s3");
    }

    #[test]
    fn test_storage_provider_local() {
        let provider = StorageProvider::local_fs("./uploads");
        assert_eq!(provider.name(), "local");
    }

    #[test]
    fn test_blob_store_config_defaults() {
        let config = BlobStoreConfig::new(StorageProvider::memory());
        assert_eq!(config.max_blob_size, BlobStoreConfig::DEFAULT_MAX_BLOB_SIZE);
    }
}
