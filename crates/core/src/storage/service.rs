//! Blob store implementation using Apache OpenDAL.

use bytes::Bytes;
use futures::{Stream, StreamExt};
use opendal::{ErrorKind, Operator, services};
use uuid::Uuid;

use super::config::{BlobStoreConfig, StorageProvider};
use super::error::StorageError;

/// Byte-addressable blob store for uploaded file content.
///
/// Keys are supplied by the caller (the document service); the store never
/// invents or rewrites them. Writes and deletes mutate durable storage
/// directly, no in-memory caching is assumed.
pub struct BlobStore {
    operator: Operator,
    config: BlobStoreConfig,
}

impl BlobStore {
    /// Create a new blob store from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: BlobStoreConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self { operator, config })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        match provider {
            StorageProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
            StorageProvider::AzureBlob {
                account,
                access_key,
                container,
            } => {
                let builder = services::Azblob::default()
                    .account_name(account)
                    .account_key(access_key)
                    .container(container);

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
            StorageProvider::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
            StorageProvider::Memory => {
                let builder = services::Memory::default();

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
        }
    }

    /// Stream a blob into storage under the given key.
    ///
    /// The upload is written chunk by chunk so large files are never fully
    /// buffered in memory. Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::BlobTooLarge` if the stream exceeds the
    /// configured size limit (the partial write is aborted), or an operation
    /// error if the underlying write fails.
    pub async fn put<S, E>(&self, key: &str, mut stream: S) -> Result<u64, StorageError>
    where
        S: Stream<Item = Result<Bytes, E>> + Unpin,
        E: std::error::Error,
    {
        let mut writer = self.operator.writer(key).await.map_err(StorageError::from)?;
        let mut written: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    let _ = writer.abort().await;
                    return Err(StorageError::operation(e.to_string()));
                }
            };

            written += chunk.len() as u64;
            if written > self.config.max_blob_size {
                let _ = writer.abort().await;
                return Err(StorageError::blob_too_large(
                    written,
                    self.config.max_blob_size,
                ));
            }

            if let Err(e) = writer.write(chunk).await {
                let _ = writer.abort().await;
                return Err(StorageError::from(e));
            }
        }

        writer.close().await.map_err(StorageError::from)?;
        Ok(written)
    }

    /// Open a blob for streamed reading.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no blob exists under the key.
    pub async fn open_for_read(
        &self,
        key: &str,
    ) -> Result<impl Stream<Item = std::io::Result<Bytes>> + Send + 'static, StorageError> {
        let meta = self.operator.stat(key).await.map_err(StorageError::from)?;
        let reader = self.operator.reader(key).await.map_err(StorageError::from)?;

        reader
            .into_bytes_stream(0..meta.content_length())
            .await
            .map_err(StorageError::from)
    }

    /// Delete a blob.
    ///
    /// Deleting a missing key is not an error; the operation is idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error only if the underlying delete fails for a reason
    /// other than the blob being absent.
    pub async fn delete(&self, key: &str) -> Result<(), StorageError> {
        match self.operator.delete(key).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::from(e)),
        }
    }

    /// Check if a blob exists under the key.
    pub async fn exists(&self, key: &str) -> bool {
        match self.operator.stat(key).await {
            Ok(_) => true,
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(_) => false,
        }
    }

    /// Get the storage provider name.
    #[must_use]
    pub const fn provider_name(&self) -> &'static str {
        self.config.provider.name()
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &BlobStoreConfig {
        &self.config
    }
}

/// Generate the storage key for an uploaded document.
///
/// Format: `{owner_id}/{document_id}/{sanitized_filename}`. The document id
/// makes the key collision-free even for repeated uploads of the same name.
#[must_use]
pub fn blob_key(owner_id: Uuid, document_id: Uuid, original_name: &str) -> String {
    format!(
        "{}/{}/{}",
        owner_id,
        document_id,
        sanitize_filename(original_name)
    )
}

/// Sanitize a filename for use inside a storage key.
///
/// Only ASCII alphanumeric characters, dots, hyphens, and underscores
/// survive; everything else becomes an underscore.
#[must_use]
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    // Sanitized filenames only contain storage-safe characters.
    proptest! {
        #[test]
        fn prop_sanitized_filename_safe_chars(filename in ".*") {
            let sanitized = sanitize_filename(&filename);

            for c in sanitized.chars() {
                let is_safe = c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_';
                prop_assert!(is_safe, "Unexpected character in sanitized filename: {}", c);
            }
        }
    }

    // Keys always carry owner and document segments, so two documents can
    // never collide even for identical filenames.
    proptest! {
        #[test]
        fn prop_blob_key_segments(filename in "[a-zA-Z0-9 _-]{1,40}\\.[a-z]{2,4}") {
            let owner = Uuid::new_v4();
            let doc = Uuid::new_v4();

            let key = blob_key(owner, doc, &filename);
            let parts: Vec<&str> = key.split('/').collect();
            prop_assert_eq!(parts.len(), 3);
            prop_assert_eq!(parts[0], owner.to_string());
            prop_assert_eq!(parts[1], doc.to_string());
        }
    }
}
