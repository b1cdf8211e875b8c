//! Document repository for database operations.
//!
//! Implements document CRUD operations using SeaORM.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entities::{documents, folders};
use docuvault_core::document::{
    Document, DocumentError, DocumentKind, DocumentPatch,
    DocumentRepository as DocumentRepoTrait,
};

/// Document repository implementation.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    db: DatabaseConnection,
}

impl DocumentRepository {
    /// Create a new document repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl DocumentRepoTrait for DocumentRepository {
    async fn insert(&self, document: Document) -> Result<Document, DocumentError> {
        let active_model = to_active_model(document)?;

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| DocumentError::repository(e.to_string()))?;

        to_domain(model)
    }

    async fn find_one(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Document>, DocumentError> {
        let model = documents::Entity::find_by_id(id)
            .filter(documents::Column::OwnerId.eq(owner_id))
            .one(&self.db)
            .await
            .map_err(|e| DocumentError::repository(e.to_string()))?;

        model.map(to_domain).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Document>, DocumentError> {
        let model = documents::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| DocumentError::repository(e.to_string()))?;

        model.map(to_domain).transpose()
    }

    async fn list(
        &self,
        owner_id: Uuid,
        folder_id: Option<Uuid>,
        limit: Option<u64>,
    ) -> Result<Vec<Document>, DocumentError> {
        let mut query = documents::Entity::find()
            .filter(documents::Column::OwnerId.eq(owner_id))
            .order_by_desc(documents::Column::UploadedAt);

        if let Some(folder_id) = folder_id {
            query = query.filter(documents::Column::FolderId.eq(folder_id));
        }
        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        let models = query
            .all(&self.db)
            .await
            .map_err(|e| DocumentError::repository(e.to_string()))?;

        models.into_iter().map(to_domain).collect()
    }

    async fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        patch: DocumentPatch,
    ) -> Result<Option<Document>, DocumentError> {
        let Some(model) = documents::Entity::find_by_id(id)
            .filter(documents::Column::OwnerId.eq(owner_id))
            .one(&self.db)
            .await
            .map_err(|e| DocumentError::repository(e.to_string()))?
        else {
            return Ok(None);
        };

        let mut active_model: documents::ActiveModel = model.into();
        if let Some(name) = patch.name {
            active_model.name = Set(name);
        }
        if let Some(folder_id) = patch.folder_id {
            active_model.folder_id = Set(folder_id);
        }
        if let Some(content) = patch.content {
            active_model.content = Set(Some(content));
        }
        active_model.updated_at = Set(Utc::now().into());

        let updated = active_model
            .update(&self.db)
            .await
            .map_err(|e| DocumentError::repository(e.to_string()))?;

        to_domain(updated).map(Some)
    }

    async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<bool, DocumentError> {
        let result = documents::Entity::delete_many()
            .filter(documents::Column::Id.eq(id))
            .filter(documents::Column::OwnerId.eq(owner_id))
            .exec(&self.db)
            .await
            .map_err(|e| DocumentError::repository(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    async fn count_by_folder(&self, owner_id: Uuid, folder_id: Uuid) -> Result<u64, DocumentError> {
        documents::Entity::find()
            .filter(documents::Column::OwnerId.eq(owner_id))
            .filter(documents::Column::FolderId.eq(folder_id))
            .count(&self.db)
            .await
            .map_err(|e| DocumentError::repository(e.to_string()))
    }

    async fn folder_exists(&self, owner_id: Uuid, folder_id: Uuid) -> Result<bool, DocumentError> {
        let count: u64 = folders::Entity::find_by_id(folder_id)
            .filter(folders::Column::OwnerId.eq(owner_id))
            .count(&self.db)
            .await
            .map_err(|e| DocumentError::repository(e.to_string()))?;

        Ok(count > 0)
    }
}

/// Convert a domain document into an active model for insertion.
fn to_active_model(document: Document) -> Result<documents::ActiveModel, DocumentError> {
    let kind = document.kind.as_str().to_string();
    let mut active_model = documents::ActiveModel {
        id: Set(document.id),
        owner_id: Set(document.owner_id),
        name: Set(document.name),
        folder_id: Set(document.folder_id),
        kind: Set(kind),
        storage_key: Set(None),
        original_name: Set(None),
        size_bytes: Set(None),
        mime_type: Set(None),
        content: Set(None),
        template_id: Set(None),
        uploaded_at: Set(document.uploaded_at.into()),
        updated_at: Set(document.updated_at.into()),
    };

    match document.kind {
        DocumentKind::File {
            storage_key,
            original_name,
            size_bytes,
            mime_type,
        } => {
            let size_bytes = i64::try_from(size_bytes)
                .map_err(|_| DocumentError::repository("blob size exceeds storable range"))?;
            active_model.storage_key = Set(Some(storage_key));
            active_model.original_name = Set(Some(original_name));
            active_model.size_bytes = Set(Some(size_bytes));
            active_model.mime_type = Set(Some(mime_type));
        }
        DocumentKind::Text {
            content,
            template_id,
        } => {
            active_model.content = Set(Some(content));
            active_model.template_id = Set(template_id);
        }
    }

    Ok(active_model)
}

/// Convert a database model to the domain document.
///
/// A row violating the kind column contract is reported as a repository
/// error rather than silently coerced.
fn to_domain(model: documents::Model) -> Result<Document, DocumentError> {
    let kind = match model.kind.as_str() {
        "file" => {
            let (Some(storage_key), Some(original_name), Some(size_bytes), Some(mime_type)) = (
                model.storage_key,
                model.original_name,
                model.size_bytes,
                model.mime_type,
            ) else {
                return Err(malformed(model.id, "file document missing blob metadata"));
            };
            let size_bytes = u64::try_from(size_bytes)
                .map_err(|_| malformed(model.id, "negative blob size"))?;
            DocumentKind::File {
                storage_key,
                original_name,
                size_bytes,
                mime_type,
            }
        }
        "text" => DocumentKind::Text {
            content: model.content.unwrap_or_default(),
            template_id: model.template_id,
        },
        _ => return Err(malformed(model.id, "unknown document kind")),
    };

    Ok(Document {
        id: model.id,
        owner_id: model.owner_id,
        name: model.name,
        folder_id: model.folder_id,
        kind,
        uploaded_at: model.uploaded_at.into(),
        updated_at: model.updated_at.into(),
    })
}

fn malformed(id: Uuid, detail: &str) -> DocumentError {
    DocumentError::repository(format!("malformed document record {id}: {detail}"))
}
