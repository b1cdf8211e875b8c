//! Folder service implementation.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::error::FolderError;
use super::types::{CreateFolderInput, Folder, FolderPatch, FolderWithCount};
use crate::document::DocumentRepository;

/// Maximum folder display name length.
const MAX_NAME_LEN: usize = 100;

/// Maximum folder description length.
const MAX_DESCRIPTION_LEN: usize = 500;

/// Result of a conditional folder delete.
///
/// `delete_if_empty` is a single atomic primitive so that a document filed
/// concurrently between an emptiness check and the delete can never strand
/// itself in a vanished folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteIfEmptyOutcome {
    /// The folder existed, was empty, and is now gone.
    Deleted,
    /// The folder exists but still contains documents.
    NotEmpty,
    /// No such folder for this owner.
    NotFound,
}

/// Repository trait for folder persistence.
///
/// All methods are ownership-scoped.
pub trait FolderRepository: Send + Sync {
    /// Insert a new folder record.
    fn insert(
        &self,
        folder: Folder,
    ) -> impl std::future::Future<Output = Result<Folder, FolderError>> + Send;

    /// Find a folder by id, scoped to its owner.
    fn find_one(
        &self,
        owner_id: Uuid,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Folder>, FolderError>> + Send;

    /// List an owner's folders, newest first.
    fn list(
        &self,
        owner_id: Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<Folder>, FolderError>> + Send;

    /// Apply a patch to a folder, bumping `updated_at`.
    fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        patch: FolderPatch,
    ) -> impl std::future::Future<Output = Result<Option<Folder>, FolderError>> + Send;

    /// Delete a folder only if no documents reference it, atomically.
    fn delete_if_empty(
        &self,
        owner_id: Uuid,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<DeleteIfEmptyOutcome, FolderError>> + Send;
}

/// Folder service.
///
/// Needs a view of documents as well: listing annotates each folder with its
/// document count, and deletion reports how many documents block it.
pub struct FolderService<F: FolderRepository, D: DocumentRepository> {
    folders: Arc<F>,
    documents: Arc<D>,
}

impl<F: FolderRepository, D: DocumentRepository> FolderService<F, D> {
    /// Create a new folder service.
    #[must_use]
    pub fn new(folders: Arc<F>, documents: Arc<D>) -> Self {
        Self { folders, documents }
    }

    /// Create a folder.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a bad name or description.
    pub async fn create_folder(
        &self,
        owner_id: Uuid,
        input: CreateFolderInput,
    ) -> Result<Folder, FolderError> {
        let name = validated_name(input.name)?;
        let description = input.description.map(validated_description).transpose()?;

        let now = Utc::now();
        self.folders
            .insert(Folder {
                id: Uuid::new_v4(),
                owner_id,
                name,
                description,
                created_at: now,
                updated_at: now,
            })
            .await
    }

    /// Get a folder by id, scoped to the caller.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the folder is absent or owned by another
    /// identity.
    pub async fn get_folder(&self, owner_id: Uuid, id: Uuid) -> Result<Folder, FolderError> {
        self.folders
            .find_one(owner_id, id)
            .await?
            .ok_or(FolderError::NotFound(id))
    }

    /// List the caller's folders, newest first, each with its document
    /// count.
    ///
    /// # Errors
    ///
    /// Returns an error if a repository query fails.
    pub async fn list_folders(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<FolderWithCount>, FolderError> {
        let folders = self.folders.list(owner_id).await?;

        let mut result = Vec::with_capacity(folders.len());
        for folder in folders {
            let document_count = self
                .documents
                .count_by_folder(owner_id, folder.id)
                .await
                .map_err(|e| FolderError::repository(e.to_string()))?;
            result.push(FolderWithCount {
                folder,
                document_count,
            });
        }
        Ok(result)
    }

    /// Apply a patch to a folder.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a bad name or description and
    /// `NotFound` if the folder is absent or foreign.
    pub async fn update_folder(
        &self,
        owner_id: Uuid,
        id: Uuid,
        patch: FolderPatch,
    ) -> Result<Folder, FolderError> {
        if patch.is_empty() {
            return self.get_folder(owner_id, id).await;
        }

        let patch = FolderPatch {
            name: patch.name.map(validated_name).transpose()?,
            description: match patch.description {
                Some(Some(d)) => Some(Some(validated_description(d)?)),
                other => other,
            },
        };

        self.folders
            .update(owner_id, id, patch)
            .await?
            .ok_or(FolderError::NotFound(id))
    }

    /// Delete a folder, refusing if any document is still filed under it.
    ///
    /// # Errors
    ///
    /// Returns `NotEmpty` with the blocking document count when the folder
    /// still has documents, and `NotFound` if it is absent or foreign.
    pub async fn delete_folder(&self, owner_id: Uuid, id: Uuid) -> Result<(), FolderError> {
        match self.folders.delete_if_empty(owner_id, id).await? {
            DeleteIfEmptyOutcome::Deleted => Ok(()),
            DeleteIfEmptyOutcome::NotFound => Err(FolderError::NotFound(id)),
            DeleteIfEmptyOutcome::NotEmpty => {
                // The count is advisory detail for the error message; the
                // refusal itself was already decided atomically.
                let document_count = self
                    .documents
                    .count_by_folder(owner_id, id)
                    .await
                    .map_err(|e| FolderError::repository(e.to_string()))?;
                Err(FolderError::NotEmpty { id, document_count })
            }
        }
    }
}

/// Validate a folder name: 1 to 100 characters.
fn validated_name(name: String) -> Result<String, FolderError> {
    if name.is_empty() {
        return Err(FolderError::validation("name must not be empty"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(FolderError::validation(format!(
            "name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(name)
}

/// Validate a folder description: at most 500 characters.
fn validated_description(description: String) -> Result<String, FolderError> {
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(FolderError::validation(format!(
            "description must be at most {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(description)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Document, DocumentError, DocumentPatch};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Mock repository for testing.
    #[derive(Default)]
    struct MockFolderRepository {
        folders: Mutex<HashMap<Uuid, Folder>>,
        insertion_order: Mutex<Vec<Uuid>>,
        document_counts: Mutex<HashMap<Uuid, u64>>,
    }

    impl MockFolderRepository {
        fn new() -> Self {
            Self::default()
        }

        fn file_documents(&self, folder_id: Uuid, count: u64) {
            self.document_counts
                .lock()
                .unwrap()
                .insert(folder_id, count);
        }
    }

    impl FolderRepository for MockFolderRepository {
        async fn insert(&self, folder: Folder) -> Result<Folder, FolderError> {
            self.folders
                .lock()
                .unwrap()
                .insert(folder.id, folder.clone());
            self.insertion_order.lock().unwrap().push(folder.id);
            Ok(folder)
        }

        async fn find_one(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Folder>, FolderError> {
            Ok(self
                .folders
                .lock()
                .unwrap()
                .get(&id)
                .filter(|f| f.owner_id == owner_id)
                .cloned())
        }

        async fn list(&self, owner_id: Uuid) -> Result<Vec<Folder>, FolderError> {
            let folders = self.folders.lock().unwrap();
            let order = self.insertion_order.lock().unwrap();
            Ok(order
                .iter()
                .rev()
                .filter_map(|id| folders.get(id))
                .filter(|f| f.owner_id == owner_id)
                .cloned()
                .collect())
        }

        async fn update(
            &self,
            owner_id: Uuid,
            id: Uuid,
            patch: FolderPatch,
        ) -> Result<Option<Folder>, FolderError> {
            let mut folders = self.folders.lock().unwrap();
            let Some(folder) = folders.get_mut(&id).filter(|f| f.owner_id == owner_id) else {
                return Ok(None);
            };

            if let Some(name) = patch.name {
                folder.name = name;
            }
            if let Some(description) = patch.description {
                folder.description = description;
            }
            folder.updated_at = Utc::now();
            Ok(Some(folder.clone()))
        }

        async fn delete_if_empty(
            &self,
            owner_id: Uuid,
            id: Uuid,
        ) -> Result<DeleteIfEmptyOutcome, FolderError> {
            let mut folders = self.folders.lock().unwrap();
            let owned = folders.get(&id).is_some_and(|f| f.owner_id == owner_id);
            if !owned {
                return Ok(DeleteIfEmptyOutcome::NotFound);
            }
            let count = *self.document_counts.lock().unwrap().get(&id).unwrap_or(&0);
            if count > 0 {
                return Ok(DeleteIfEmptyOutcome::NotEmpty);
            }
            folders.remove(&id);
            Ok(DeleteIfEmptyOutcome::Deleted)
        }
    }

    /// Document repository stub exposing only per-folder counts.
    #[derive(Default)]
    struct StubDocumentCounts {
        counts: Mutex<HashMap<Uuid, u64>>,
    }

    impl StubDocumentCounts {
        fn set(&self, folder_id: Uuid, count: u64) {
            self.counts.lock().unwrap().insert(folder_id, count);
        }
    }

    impl DocumentRepository for StubDocumentCounts {
        async fn insert(&self, _document: Document) -> Result<Document, DocumentError> {
            unreachable!("folder tests never insert documents")
        }

        async fn find_one(
            &self,
            _owner_id: Uuid,
            _id: Uuid,
        ) -> Result<Option<Document>, DocumentError> {
            unreachable!("folder tests never fetch documents")
        }

        async fn find_by_id(&self, _id: Uuid) -> Result<Option<Document>, DocumentError> {
            unreachable!("folder tests never fetch documents")
        }

        async fn list(
            &self,
            _owner_id: Uuid,
            _folder_id: Option<Uuid>,
            _limit: Option<u64>,
        ) -> Result<Vec<Document>, DocumentError> {
            unreachable!("folder tests never list documents")
        }

        async fn update(
            &self,
            _owner_id: Uuid,
            _id: Uuid,
            _patch: DocumentPatch,
        ) -> Result<Option<Document>, DocumentError> {
            unreachable!("folder tests never update documents")
        }

        async fn delete(&self, _owner_id: Uuid, _id: Uuid) -> Result<bool, DocumentError> {
            unreachable!("folder tests never delete documents")
        }

        async fn count_by_folder(
            &self,
            _owner_id: Uuid,
            folder_id: Uuid,
        ) -> Result<u64, DocumentError> {
            Ok(*self.counts.lock().unwrap().get(&folder_id).unwrap_or(&0))
        }

        async fn folder_exists(
            &self,
            _owner_id: Uuid,
            _folder_id: Uuid,
        ) -> Result<bool, DocumentError> {
            unreachable!("folder tests never check folder existence")
        }
    }

    fn create_service() -> (
        FolderService<MockFolderRepository, StubDocumentCounts>,
        Arc<MockFolderRepository>,
        Arc<StubDocumentCounts>,
    ) {
        let folders = Arc::new(MockFolderRepository::new());
        let documents = Arc::new(StubDocumentCounts::default());
        (
            FolderService::new(folders.clone(), documents.clone()),
            folders,
            documents,
        )
    }

    #[tokio::test]
    async fn test_create_and_get_folder() {
        let (service, _, _) = create_service();
        let owner = Uuid::new_v4();

        let created = service
            .create_folder(
                owner,
                CreateFolderInput {
                    name: "Invoices".into(),
                    description: Some("2026 invoices".into()),
                },
            )
            .await
            .expect("should create");

        let fetched = service
            .get_folder(owner, created.id)
            .await
            .expect("should fetch");
        assert_eq!(fetched.name, "Invoices");
        assert_eq!(fetched.description.as_deref(), Some("2026 invoices"));
    }

    #[tokio::test]
    async fn test_create_folder_name_bounds() {
        let (service, _, _) = create_service();
        let owner = Uuid::new_v4();

        assert!(matches!(
            service
                .create_folder(owner, CreateFolderInput::default())
                .await,
            Err(FolderError::Validation(_))
        ));
        assert!(matches!(
            service
                .create_folder(
                    owner,
                    CreateFolderInput {
                        name: "x".repeat(101),
                        description: None,
                    },
                )
                .await,
            Err(FolderError::Validation(_))
        ));
        assert!(matches!(
            service
                .create_folder(
                    owner,
                    CreateFolderInput {
                        name: "ok".into(),
                        description: Some("x".repeat(501)),
                    },
                )
                .await,
            Err(FolderError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_cross_owner_folder_is_invisible() {
        let (service, _, _) = create_service();
        let owner_a = Uuid::new_v4();
        let owner_b = Uuid::new_v4();

        let folder = service
            .create_folder(
                owner_a,
                CreateFolderInput {
                    name: "Private".into(),
                    description: None,
                },
            )
            .await
            .expect("should create");

        assert!(matches!(
            service.get_folder(owner_b, folder.id).await,
            Err(FolderError::NotFound(_))
        ));
        assert!(matches!(
            service.delete_folder(owner_b, folder.id).await,
            Err(FolderError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_folder_clears_description() {
        let (service, _, _) = create_service();
        let owner = Uuid::new_v4();

        let folder = service
            .create_folder(
                owner,
                CreateFolderInput {
                    name: "Invoices".into(),
                    description: Some("old".into()),
                },
            )
            .await
            .expect("should create");

        let updated = service
            .update_folder(
                owner,
                folder.id,
                FolderPatch {
                    description: Some(None),
                    ..FolderPatch::default()
                },
            )
            .await
            .expect("should update");

        assert_eq!(updated.name, "Invoices");
        assert_eq!(updated.description, None);
    }

    #[tokio::test]
    async fn test_delete_nonempty_folder_is_refused() {
        let (service, folders, documents) = create_service();
        let owner = Uuid::new_v4();

        let folder = service
            .create_folder(
                owner,
                CreateFolderInput {
                    name: "Invoices".into(),
                    description: None,
                },
            )
            .await
            .expect("should create");
        folders.file_documents(folder.id, 3);
        documents.set(folder.id, 3);

        let result = service.delete_folder(owner, folder.id).await;
        assert!(matches!(
            result,
            Err(FolderError::NotEmpty {
                document_count: 3,
                ..
            })
        ));

        // The folder survives the refused delete.
        assert!(service.get_folder(owner, folder.id).await.is_ok());

        // Emptying it makes the delete go through.
        folders.file_documents(folder.id, 0);
        service
            .delete_folder(owner, folder.id)
            .await
            .expect("should delete once empty");
        assert!(matches!(
            service.get_folder(owner, folder.id).await,
            Err(FolderError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_folders_with_counts() {
        let (service, folders, documents) = create_service();
        let owner = Uuid::new_v4();

        let first = service
            .create_folder(
                owner,
                CreateFolderInput {
                    name: "Invoices".into(),
                    description: None,
                },
            )
            .await
            .expect("should create");
        let second = service
            .create_folder(
                owner,
                CreateFolderInput {
                    name: "Contracts".into(),
                    description: None,
                },
            )
            .await
            .expect("should create");
        folders.file_documents(first.id, 2);
        documents.set(first.id, 2);

        let listed = service.list_folders(owner).await.expect("should list");
        assert_eq!(listed.len(), 2);
        // Newest first.
        assert_eq!(listed[0].folder.id, second.id);
        assert_eq!(listed[0].document_count, 0);
        assert_eq!(listed[1].folder.id, first.id);
        assert_eq!(listed[1].document_count, 2);
    }
}
