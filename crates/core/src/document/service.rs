//! Document service implementation.

use std::sync::Arc;

use bytes::Bytes;
use chrono::{Duration, Utc};
use futures::Stream;
use tracing::warn;
use uuid::Uuid;

use super::error::DocumentError;
use super::types::{
    CreateTextDocumentInput, Document, DocumentKind, DocumentPatch, StagedBlob,
};
use crate::share::{ShareGrant, ShareTokenService};
use crate::storage::{BlobStore, blob_key};

/// Maximum document display name length.
const MAX_NAME_LEN: usize = 255;

/// Repository trait for document persistence.
///
/// This trait is implemented by the db crate to provide actual database
/// operations. All methods except `find_by_id` are ownership-scoped: a record
/// belonging to a different owner behaves exactly like a missing one.
pub trait DocumentRepository: Send + Sync {
    /// Insert a new document record.
    fn insert(
        &self,
        document: Document,
    ) -> impl std::future::Future<Output = Result<Document, DocumentError>> + Send;

    /// Find a document by id, scoped to its owner.
    fn find_one(
        &self,
        owner_id: Uuid,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Document>, DocumentError>> + Send;

    /// Find a document by id without ownership scoping.
    ///
    /// Used only by capability resolution, where the token itself is the
    /// authorization.
    fn find_by_id(
        &self,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Document>, DocumentError>> + Send;

    /// List an owner's documents, newest first, optionally filtered by
    /// folder and truncated to `limit`.
    fn list(
        &self,
        owner_id: Uuid,
        folder_id: Option<Uuid>,
        limit: Option<u64>,
    ) -> impl std::future::Future<Output = Result<Vec<Document>, DocumentError>> + Send;

    /// Apply a patch to a document, bumping `updated_at`.
    fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        patch: DocumentPatch,
    ) -> impl std::future::Future<Output = Result<Option<Document>, DocumentError>> + Send;

    /// Delete a document record. Returns whether a record was deleted.
    fn delete(
        &self,
        owner_id: Uuid,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<bool, DocumentError>> + Send;

    /// Count documents filed under a folder.
    fn count_by_folder(
        &self,
        owner_id: Uuid,
        folder_id: Uuid,
    ) -> impl std::future::Future<Output = Result<u64, DocumentError>> + Send;

    /// Check that a folder exists and is owned by the given owner.
    fn folder_exists(
        &self,
        owner_id: Uuid,
        folder_id: Uuid,
    ) -> impl std::future::Future<Output = Result<bool, DocumentError>> + Send;
}

/// Document service orchestrating metadata records and blobs.
pub struct DocumentService<R: DocumentRepository> {
    blobs: Arc<BlobStore>,
    tokens: Arc<ShareTokenService>,
    repo: Arc<R>,
}

impl<R: DocumentRepository> DocumentService<R> {
    /// Create a new document service.
    #[must_use]
    pub fn new(blobs: Arc<BlobStore>, tokens: Arc<ShareTokenService>, repo: Arc<R>) -> Self {
        Self {
            blobs,
            tokens,
            repo,
        }
    }

    /// Name of the configured blob storage provider.
    #[must_use]
    pub fn storage_provider(&self) -> &'static str {
        self.blobs.provider_name()
    }

    /// Stream an upload into the blob store.
    ///
    /// Reserves a document id, derives the storage key from it, and writes
    /// the blob. The returned [`StagedBlob`] must be handed to
    /// [`create_file_document`](Self::create_file_document) or discarded via
    /// [`discard_blob`](Self::discard_blob); a staged blob without a metadata
    /// record is an orphan.
    ///
    /// # Errors
    ///
    /// Returns a validation error before anything is written if the original
    /// filename or MIME type is missing, and a storage error if the write
    /// fails.
    pub async fn store_blob<S, E>(
        &self,
        owner_id: Uuid,
        original_name: &str,
        mime_type: &str,
        stream: S,
    ) -> Result<StagedBlob, DocumentError>
    where
        S: Stream<Item = Result<Bytes, E>> + Unpin,
        E: std::error::Error,
    {
        if original_name.is_empty() {
            return Err(DocumentError::validation("originalName is required"));
        }
        if mime_type.is_empty() {
            return Err(DocumentError::validation("mimeType is required"));
        }

        let document_id = Uuid::new_v4();
        let storage_key = blob_key(owner_id, document_id, original_name);
        let size_bytes = self.blobs.put(&storage_key, stream).await?;

        Ok(StagedBlob {
            document_id,
            storage_key,
            original_name: original_name.to_string(),
            mime_type: mime_type.to_string(),
            size_bytes,
        })
    }

    /// Create a file document from a staged blob.
    ///
    /// The blob was already written, so any failure from here on (validation
    /// or insert) deletes it again before the error propagates: a failed
    /// create never leaves an orphaned blob behind.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a bad display name, `FolderNotFound`
    /// for a folder that does not exist or belongs to someone else, and a
    /// repository error if the insert fails.
    pub async fn create_file_document(
        &self,
        owner_id: Uuid,
        staged: StagedBlob,
        display_name: Option<String>,
        folder_id: Option<Uuid>,
    ) -> Result<Document, DocumentError> {
        let result = self
            .insert_file_record(owner_id, &staged, display_name, folder_id)
            .await;

        if result.is_err() {
            self.discard_blob(&staged.storage_key).await;
        }

        result
    }

    async fn insert_file_record(
        &self,
        owner_id: Uuid,
        staged: &StagedBlob,
        display_name: Option<String>,
        folder_id: Option<Uuid>,
    ) -> Result<Document, DocumentError> {
        let name = match display_name {
            Some(name) => validated_name(name)?,
            None => staged.original_name.clone(),
        };
        self.check_folder(owner_id, folder_id).await?;

        let now = Utc::now();
        self.repo
            .insert(Document {
                id: staged.document_id,
                owner_id,
                name,
                folder_id,
                kind: DocumentKind::File {
                    storage_key: staged.storage_key.clone(),
                    original_name: staged.original_name.clone(),
                    size_bytes: staged.size_bytes,
                    mime_type: staged.mime_type.clone(),
                },
                uploaded_at: now,
                updated_at: now,
            })
            .await
    }

    /// Delete a staged blob that will never get a metadata record.
    ///
    /// Failures are logged, not surfaced; the upload is already failing for
    /// another reason.
    pub async fn discard_blob(&self, storage_key: &str) {
        if let Err(e) = self.blobs.delete(storage_key).await {
            warn!(key = %storage_key, error = %e, "failed to delete orphaned blob");
        }
    }

    /// Create a text document.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the name is empty or too long, and
    /// `FolderNotFound` for a bad folder reference.
    pub async fn create_text_document(
        &self,
        owner_id: Uuid,
        input: CreateTextDocumentInput,
    ) -> Result<Document, DocumentError> {
        let name = validated_name(input.name)?;
        self.check_folder(owner_id, input.folder_id).await?;

        let now = Utc::now();
        self.repo
            .insert(Document {
                id: Uuid::new_v4(),
                owner_id,
                name,
                folder_id: input.folder_id,
                kind: DocumentKind::Text {
                    content: input.content.unwrap_or_default(),
                    template_id: input.template_id,
                },
                uploaded_at: now,
                updated_at: now,
            })
            .await
    }

    /// Get a document by id, scoped to the caller.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the document is absent or owned by another
    /// identity.
    pub async fn get_document(&self, owner_id: Uuid, id: Uuid) -> Result<Document, DocumentError> {
        self.repo
            .find_one(owner_id, id)
            .await?
            .ok_or(DocumentError::NotFound(id))
    }

    /// List the caller's documents, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository query fails.
    pub async fn list_documents(
        &self,
        owner_id: Uuid,
        folder_id: Option<Uuid>,
        limit: Option<u64>,
    ) -> Result<Vec<Document>, DocumentError> {
        self.repo.list(owner_id, folder_id, limit).await
    }

    /// Apply a patch to a document.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a bad name, for `content` on a file
    /// document, or `FolderNotFound` for a bad folder reference; `NotFound`
    /// if the document is absent or foreign.
    pub async fn update_document(
        &self,
        owner_id: Uuid,
        id: Uuid,
        patch: DocumentPatch,
    ) -> Result<Document, DocumentError> {
        let current = self.get_document(owner_id, id).await?;
        if patch.is_empty() {
            return Ok(current);
        }

        let patch = DocumentPatch {
            name: patch.name.map(validated_name).transpose()?,
            ..patch
        };
        if patch.content.is_some() && current.kind.is_file() {
            return Err(DocumentError::validation(
                "content can only be set on text documents",
            ));
        }
        if let Some(Some(folder_id)) = patch.folder_id {
            self.check_folder(owner_id, Some(folder_id)).await?;
        }

        self.repo
            .update(owner_id, id, patch)
            .await?
            .ok_or(DocumentError::NotFound(id))
    }

    /// Delete a document.
    ///
    /// The metadata record is removed first and is authoritative; the blob
    /// delete (file documents only) tolerates a missing blob, and any other
    /// blob-store failure is logged without failing the overall delete.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the document is absent or foreign.
    pub async fn delete_document(&self, owner_id: Uuid, id: Uuid) -> Result<(), DocumentError> {
        let document = self.get_document(owner_id, id).await?;

        let deleted = self.repo.delete(owner_id, id).await?;
        if !deleted {
            return Err(DocumentError::NotFound(id));
        }

        if let Some(key) = document.storage_key() {
            if let Err(e) = self.blobs.delete(key).await {
                warn!(document_id = %id, key = %key, error = %e, "blob delete failed after metadata delete");
            }
        }

        Ok(())
    }

    /// Mint a share token for a document the caller owns.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the caller does not own the document.
    pub async fn generate_share_token(
        &self,
        owner_id: Uuid,
        id: Uuid,
        ttl: Duration,
    ) -> Result<String, DocumentError> {
        let document = self.get_document(owner_id, id).await?;
        Ok(self.tokens.issue(document.id, ttl)?)
    }

    /// Resolve a share token to the document it grants access to.
    ///
    /// The lookup is deliberately unscoped: the capability itself is the
    /// authorization, not the caller's identity.
    ///
    /// # Errors
    ///
    /// Returns a share-token error if the token is invalid or expired, and
    /// `NotFound` if the referenced document no longer exists.
    pub async fn resolve_share_token(&self, token: &str) -> Result<Document, DocumentError> {
        let ShareGrant { document_id } = self.tokens.verify(token)?;

        self.repo
            .find_by_id(document_id)
            .await?
            .ok_or(DocumentError::NotFound(document_id))
    }

    /// Open the blob of a file document for streamed reading.
    ///
    /// # Errors
    ///
    /// Returns a validation error for text documents and a storage error if
    /// the blob cannot be opened.
    pub async fn open_file_stream(
        &self,
        document: &Document,
    ) -> Result<impl Stream<Item = std::io::Result<Bytes>> + Send + 'static, DocumentError> {
        let Some(key) = document.storage_key() else {
            return Err(DocumentError::validation(
                "text documents have no downloadable blob",
            ));
        };

        Ok(self.blobs.open_for_read(key).await?)
    }

    async fn check_folder(
        &self,
        owner_id: Uuid,
        folder_id: Option<Uuid>,
    ) -> Result<(), DocumentError> {
        let Some(folder_id) = folder_id else {
            return Ok(());
        };

        if self.repo.folder_exists(owner_id, folder_id).await? {
            Ok(())
        } else {
            Err(DocumentError::FolderNotFound(folder_id))
        }
    }
}

/// Validate a display name: non-empty, at most 255 characters.
fn validated_name(name: String) -> Result<String, DocumentError> {
    if name.is_empty() {
        return Err(DocumentError::validation("name must not be empty"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(DocumentError::validation(format!(
            "name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{BlobStoreConfig, StorageProvider};
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    /// Mock repository for testing.
    #[derive(Default)]
    struct MockDocumentRepository {
        documents: Mutex<HashMap<Uuid, Document>>,
        insertion_order: Mutex<Vec<Uuid>>,
        folders: Mutex<HashSet<(Uuid, Uuid)>>,
        fail_inserts: Mutex<bool>,
    }

    impl MockDocumentRepository {
        fn new() -> Self {
            Self::default()
        }

        fn add_folder(&self, owner_id: Uuid, folder_id: Uuid) {
            self.folders.lock().unwrap().insert((owner_id, folder_id));
        }

        fn fail_next_insert(&self) {
            *self.fail_inserts.lock().unwrap() = true;
        }
    }

    impl DocumentRepository for MockDocumentRepository {
        async fn insert(&self, document: Document) -> Result<Document, DocumentError> {
            if *self.fail_inserts.lock().unwrap() {
                return Err(DocumentError::repository("insert failed"));
            }
            self.documents
                .lock()
                .unwrap()
                .insert(document.id, document.clone());
            self.insertion_order.lock().unwrap().push(document.id);
            Ok(document)
        }

        async fn find_one(
            &self,
            owner_id: Uuid,
            id: Uuid,
        ) -> Result<Option<Document>, DocumentError> {
            Ok(self
                .documents
                .lock()
                .unwrap()
                .get(&id)
                .filter(|d| d.owner_id == owner_id)
                .cloned())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<Document>, DocumentError> {
            Ok(self.documents.lock().unwrap().get(&id).cloned())
        }

        async fn list(
            &self,
            owner_id: Uuid,
            folder_id: Option<Uuid>,
            limit: Option<u64>,
        ) -> Result<Vec<Document>, DocumentError> {
            let documents = self.documents.lock().unwrap();
            let order = self.insertion_order.lock().unwrap();

            let mut result: Vec<Document> = order
                .iter()
                .rev()
                .filter_map(|id| documents.get(id))
                .filter(|d| d.owner_id == owner_id)
                .filter(|d| folder_id.is_none() || d.folder_id == folder_id)
                .cloned()
                .collect();
            if let Some(limit) = limit {
                result.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
            }
            Ok(result)
        }

        async fn update(
            &self,
            owner_id: Uuid,
            id: Uuid,
            patch: DocumentPatch,
        ) -> Result<Option<Document>, DocumentError> {
            let mut documents = self.documents.lock().unwrap();
            let Some(doc) = documents.get_mut(&id).filter(|d| d.owner_id == owner_id) else {
                return Ok(None);
            };

            if let Some(name) = patch.name {
                doc.name = name;
            }
            if let Some(folder_id) = patch.folder_id {
                doc.folder_id = folder_id;
            }
            if let Some(content) = patch.content {
                if let DocumentKind::Text {
                    content: existing, ..
                } = &mut doc.kind
                {
                    *existing = content;
                }
            }
            doc.updated_at = Utc::now();
            Ok(Some(doc.clone()))
        }

        async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<bool, DocumentError> {
            let mut documents = self.documents.lock().unwrap();
            let owned = documents.get(&id).is_some_and(|d| d.owner_id == owner_id);
            if owned {
                documents.remove(&id);
            }
            Ok(owned)
        }

        async fn count_by_folder(
            &self,
            owner_id: Uuid,
            folder_id: Uuid,
        ) -> Result<u64, DocumentError> {
            Ok(self
                .documents
                .lock()
                .unwrap()
                .values()
                .filter(|d| d.owner_id == owner_id && d.folder_id == Some(folder_id))
                .count() as u64)
        }

        async fn folder_exists(
            &self,
            owner_id: Uuid,
            folder_id: Uuid,
        ) -> Result<bool, DocumentError> {
            Ok(self.folders.lock().unwrap().contains(&(owner_id, folder_id)))
        }
    }

    fn create_service() -> (DocumentService<MockDocumentRepository>, Arc<MockDocumentRepository>, Arc<BlobStore>)
    {
        let blobs = Arc::new(
            BlobStore::from_config(BlobStoreConfig::new(StorageProvider::memory()))
                .expect("should create store"),
        );
        let tokens = Arc::new(ShareTokenService::new("test-secret"));
        let repo = Arc::new(MockDocumentRepository::new());
        (
            DocumentService::new(blobs.clone(), tokens, repo.clone()),
            repo,
            blobs,
        )
    }

    fn bytes_of(len: usize) -> impl Stream<Item = Result<Bytes, std::io::Error>> + Unpin {
        futures::stream::iter(vec![Ok(Bytes::from(vec![0u8; len]))])
    }

    async fn upload_file(
        service: &DocumentService<MockDocumentRepository>,
        owner: Uuid,
        name: &str,
        mime: &str,
        len: usize,
        folder_id: Option<Uuid>,
    ) -> Document {
        let staged = service
            .store_blob(owner, name, mime, bytes_of(len))
            .await
            .expect("should stage");
        service
            .create_file_document(owner, staged, None, folder_id)
            .await
            .expect("should create")
    }

    #[tokio::test]
    async fn test_file_create_get_roundtrip() {
        let (service, _, _) = create_service();
        let owner = Uuid::new_v4();

        let created =
            upload_file(&service, owner, "inv.pdf", "application/pdf", 1024, None).await;
        let fetched = service
            .get_document(owner, created.id)
            .await
            .expect("should fetch");

        assert_eq!(fetched.name, "inv.pdf");
        match fetched.kind {
            DocumentKind::File {
                ref original_name,
                size_bytes,
                ref mime_type,
                ..
            } => {
                assert_eq!(original_name, "inv.pdf");
                assert_eq!(size_bytes, 1024);
                assert_eq!(mime_type, "application/pdf");
            }
            DocumentKind::Text { .. } => panic!("expected a file document"),
        }
    }

    #[tokio::test]
    async fn test_cross_owner_document_is_invisible() {
        let (service, _, _) = create_service();
        let owner_a = Uuid::new_v4();
        let owner_b = Uuid::new_v4();

        let doc = upload_file(&service, owner_a, "a.pdf", "application/pdf", 16, None).await;

        assert!(matches!(
            service.get_document(owner_b, doc.id).await,
            Err(DocumentError::NotFound(_))
        ));
        assert!(matches!(
            service.delete_document(owner_b, doc.id).await,
            Err(DocumentError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_store_blob_requires_name_and_mime() {
        let (service, _, _) = create_service();
        let owner = Uuid::new_v4();

        assert!(matches!(
            service.store_blob(owner, "", "application/pdf", bytes_of(4)).await,
            Err(DocumentError::Validation(_))
        ));
        assert!(matches!(
            service.store_blob(owner, "a.pdf", "", bytes_of(4)).await,
            Err(DocumentError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_insert_deletes_orphaned_blob() {
        let (service, repo, blobs) = create_service();
        let owner = Uuid::new_v4();

        let staged = service
            .store_blob(owner, "a.pdf", "application/pdf", bytes_of(8))
            .await
            .expect("should stage");
        let key = staged.storage_key.clone();
        assert!(blobs.exists(&key).await);

        repo.fail_next_insert();
        let result = service.create_file_document(owner, staged, None, None).await;

        assert!(matches!(result, Err(DocumentError::Repository(_))));
        assert!(!blobs.exists(&key).await, "orphaned blob must be deleted");
    }

    #[tokio::test]
    async fn test_unknown_folder_rejected_and_blob_deleted() {
        let (service, _, blobs) = create_service();
        let owner = Uuid::new_v4();

        let staged = service
            .store_blob(owner, "a.pdf", "application/pdf", bytes_of(8))
            .await
            .expect("should stage");
        let key = staged.storage_key.clone();

        let result = service
            .create_file_document(owner, staged, None, Some(Uuid::new_v4()))
            .await;

        assert!(matches!(result, Err(DocumentError::FolderNotFound(_))));
        assert!(!blobs.exists(&key).await);
    }

    #[tokio::test]
    async fn test_create_text_document_defaults() {
        let (service, repo, _) = create_service();
        let owner = Uuid::new_v4();
        let folder = Uuid::new_v4();
        repo.add_folder(owner, folder);

        let doc = service
            .create_text_document(
                owner,
                CreateTextDocumentInput {
                    name: "Draft A".into(),
                    folder_id: Some(folder),
                    ..CreateTextDocumentInput::default()
                },
            )
            .await
            .expect("should create");

        assert_eq!(doc.folder_id, Some(folder));
        assert_eq!(
            doc.kind,
            DocumentKind::Text {
                content: String::new(),
                template_id: None
            }
        );
    }

    #[tokio::test]
    async fn test_create_text_document_empty_name() {
        let (service, _, _) = create_service();

        let result = service
            .create_text_document(Uuid::new_v4(), CreateTextDocumentInput::default())
            .await;
        assert!(matches!(result, Err(DocumentError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_text_content_keeps_name() {
        let (service, _, _) = create_service();
        let owner = Uuid::new_v4();

        let doc = service
            .create_text_document(
                owner,
                CreateTextDocumentInput {
                    name: "Draft A".into(),
                    content: Some("<p>hi</p>".into()),
                    ..CreateTextDocumentInput::default()
                },
            )
            .await
            .expect("should create");

        let updated = service
            .update_document(
                owner,
                doc.id,
                DocumentPatch {
                    content: Some("<p>bye</p>".into()),
                    ..DocumentPatch::default()
                },
            )
            .await
            .expect("should update");

        assert_eq!(updated.name, "Draft A");
        assert_eq!(
            updated.kind,
            DocumentKind::Text {
                content: "<p>bye</p>".into(),
                template_id: None
            }
        );
    }

    #[tokio::test]
    async fn test_update_rejects_content_on_file_document() {
        let (service, _, _) = create_service();
        let owner = Uuid::new_v4();

        let doc = upload_file(&service, owner, "a.pdf", "application/pdf", 4, None).await;

        let result = service
            .update_document(
                owner,
                doc.id,
                DocumentPatch {
                    content: Some("<p>hi</p>".into()),
                    ..DocumentPatch::default()
                },
            )
            .await;
        assert!(matches!(result, Err(DocumentError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_rejects_overlong_name() {
        let (service, _, _) = create_service();
        let owner = Uuid::new_v4();

        let doc = upload_file(&service, owner, "a.pdf", "application/pdf", 4, None).await;

        let result = service
            .update_document(
                owner,
                doc.id,
                DocumentPatch {
                    name: Some("x".repeat(256)),
                    ..DocumentPatch::default()
                },
            )
            .await;
        assert!(matches!(result, Err(DocumentError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_rejects_unknown_folder() {
        let (service, _, _) = create_service();
        let owner = Uuid::new_v4();

        let doc = upload_file(&service, owner, "a.pdf", "application/pdf", 4, None).await;

        let result = service
            .update_document(
                owner,
                doc.id,
                DocumentPatch {
                    folder_id: Some(Some(Uuid::new_v4())),
                    ..DocumentPatch::default()
                },
            )
            .await;
        assert!(matches!(result, Err(DocumentError::FolderNotFound(_))));
    }

    #[tokio::test]
    async fn test_update_can_unfile_document() {
        let (service, repo, _) = create_service();
        let owner = Uuid::new_v4();
        let folder = Uuid::new_v4();
        repo.add_folder(owner, folder);

        let doc = upload_file(&service, owner, "a.pdf", "application/pdf", 4, Some(folder)).await;

        let updated = service
            .update_document(
                owner,
                doc.id,
                DocumentPatch {
                    folder_id: Some(None),
                    ..DocumentPatch::default()
                },
            )
            .await
            .expect("should update");
        assert_eq!(updated.folder_id, None);
    }

    #[tokio::test]
    async fn test_delete_document_removes_blob() {
        let (service, _, blobs) = create_service();
        let owner = Uuid::new_v4();

        let doc = upload_file(&service, owner, "a.pdf", "application/pdf", 4, None).await;
        let key = doc.storage_key().expect("file document").to_string();
        assert!(blobs.exists(&key).await);

        service
            .delete_document(owner, doc.id)
            .await
            .expect("should delete");

        assert!(!blobs.exists(&key).await);
        assert!(matches!(
            service.delete_document(owner, doc.id).await,
            Err(DocumentError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_document_tolerates_missing_blob() {
        let (service, _, blobs) = create_service();
        let owner = Uuid::new_v4();

        let doc = upload_file(&service, owner, "a.pdf", "application/pdf", 4, None).await;
        let key = doc.storage_key().expect("file document").to_string();
        blobs.delete(&key).await.expect("should delete blob");

        service
            .delete_document(owner, doc.id)
            .await
            .expect("delete must tolerate an already-missing blob");
    }

    #[tokio::test]
    async fn test_list_newest_first_with_limit() {
        let (service, repo, _) = create_service();
        let owner = Uuid::new_v4();
        let folder = Uuid::new_v4();
        repo.add_folder(owner, folder);

        let _first = upload_file(&service, owner, "one.pdf", "application/pdf", 1, None).await;
        let second =
            upload_file(&service, owner, "two.pdf", "application/pdf", 2, Some(folder)).await;
        let third = upload_file(&service, owner, "three.pdf", "application/pdf", 3, None).await;

        let all = service
            .list_documents(owner, None, None)
            .await
            .expect("should list");
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].id, third.id);

        let limited = service
            .list_documents(owner, None, Some(2))
            .await
            .expect("should list");
        assert_eq!(limited.len(), 2);

        let filed = service
            .list_documents(owner, Some(folder), None)
            .await
            .expect("should list");
        assert_eq!(filed.len(), 1);
        assert_eq!(filed[0].id, second.id);
    }

    #[tokio::test]
    async fn test_share_token_lifecycle() {
        let (service, _, _) = create_service();
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();

        let doc = upload_file(&service, owner, "a.pdf", "application/pdf", 4, None).await;

        // Only the owner may mint a token.
        assert!(matches!(
            service
                .generate_share_token(stranger, doc.id, Duration::seconds(60))
                .await,
            Err(DocumentError::NotFound(_))
        ));

        let token = service
            .generate_share_token(owner, doc.id, Duration::seconds(60))
            .await
            .expect("should issue");

        // Resolution is identity-free.
        let resolved = service
            .resolve_share_token(&token)
            .await
            .expect("should resolve");
        assert_eq!(resolved.id, doc.id);

        // A vanished document turns a valid token into NotFound.
        service
            .delete_document(owner, doc.id)
            .await
            .expect("should delete");
        assert!(matches!(
            service.resolve_share_token(&token).await,
            Err(DocumentError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_zero_ttl_share_token_rejected() {
        let (service, _, _) = create_service();
        let owner = Uuid::new_v4();

        let doc = upload_file(&service, owner, "a.pdf", "application/pdf", 4, None).await;
        let token = service
            .generate_share_token(owner, doc.id, Duration::zero())
            .await
            .expect("should issue");

        assert!(matches!(
            service.resolve_share_token(&token).await,
            Err(DocumentError::ShareToken(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_share_token_rejected() {
        let (service, _, _) = create_service();

        assert!(matches!(
            service.resolve_share_token("garbage").await,
            Err(DocumentError::ShareToken(_))
        ));
    }

    #[tokio::test]
    async fn test_open_file_stream_rejects_text() {
        let (service, _, _) = create_service();
        let owner = Uuid::new_v4();

        let doc = service
            .create_text_document(
                owner,
                CreateTextDocumentInput {
                    name: "Draft".into(),
                    ..CreateTextDocumentInput::default()
                },
            )
            .await
            .expect("should create");

        assert!(matches!(
            service.open_file_stream(&doc).await,
            Err(DocumentError::Validation(_))
        ));
    }
}
