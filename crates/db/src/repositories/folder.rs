//! Folder repository for database operations.
//!
//! Implements folder CRUD operations using SeaORM. The conditional delete is
//! a single SQL statement so the emptiness check and the delete cannot be
//! interleaved with a concurrent document create.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, Statement,
};
use uuid::Uuid;

use crate::entities::folders;
use docuvault_core::folder::{
    DeleteIfEmptyOutcome, Folder, FolderError, FolderPatch,
    FolderRepository as FolderRepoTrait,
};

/// Folder repository implementation.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    db: DatabaseConnection,
}

impl FolderRepository {
    /// Create a new folder repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl FolderRepoTrait for FolderRepository {
    async fn insert(&self, folder: Folder) -> Result<Folder, FolderError> {
        let active_model = folders::ActiveModel {
            id: Set(folder.id),
            owner_id: Set(folder.owner_id),
            name: Set(folder.name),
            description: Set(folder.description),
            created_at: Set(folder.created_at.into()),
            updated_at: Set(folder.updated_at.into()),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| FolderError::repository(e.to_string()))?;

        Ok(to_domain(model))
    }

    async fn find_one(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Folder>, FolderError> {
        let model = folders::Entity::find_by_id(id)
            .filter(folders::Column::OwnerId.eq(owner_id))
            .one(&self.db)
            .await
            .map_err(|e| FolderError::repository(e.to_string()))?;

        Ok(model.map(to_domain))
    }

    async fn list(&self, owner_id: Uuid) -> Result<Vec<Folder>, FolderError> {
        let models = folders::Entity::find()
            .filter(folders::Column::OwnerId.eq(owner_id))
            .order_by_desc(folders::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| FolderError::repository(e.to_string()))?;

        Ok(models.into_iter().map(to_domain).collect())
    }

    async fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        patch: FolderPatch,
    ) -> Result<Option<Folder>, FolderError> {
        let Some(model) = folders::Entity::find_by_id(id)
            .filter(folders::Column::OwnerId.eq(owner_id))
            .one(&self.db)
            .await
            .map_err(|e| FolderError::repository(e.to_string()))?
        else {
            return Ok(None);
        };

        let mut active_model: folders::ActiveModel = model.into();
        if let Some(name) = patch.name {
            active_model.name = Set(name);
        }
        if let Some(description) = patch.description {
            active_model.description = Set(description);
        }
        active_model.updated_at = Set(Utc::now().into());

        let updated = active_model
            .update(&self.db)
            .await
            .map_err(|e| FolderError::repository(e.to_string()))?;

        Ok(Some(to_domain(updated)))
    }

    async fn delete_if_empty(
        &self,
        owner_id: Uuid,
        id: Uuid,
    ) -> Result<DeleteIfEmptyOutcome, FolderError> {
        let result = self
            .db
            .execute(Statement::from_sql_and_values(
                DbBackend::Postgres,
                r"DELETE FROM folders f
                  WHERE f.id = $1 AND f.owner_id = $2
                    AND NOT EXISTS (
                        SELECT 1 FROM documents d WHERE d.folder_id = f.id
                    )",
                [id.into(), owner_id.into()],
            ))
            .await
            .map_err(|e| FolderError::repository(e.to_string()))?;

        if result.rows_affected() > 0 {
            return Ok(DeleteIfEmptyOutcome::Deleted);
        }

        // Nothing deleted: either the folder is missing or it still has
        // documents. One more lookup tells the two apart.
        let exists: u64 = folders::Entity::find_by_id(id)
            .filter(folders::Column::OwnerId.eq(owner_id))
            .count(&self.db)
            .await
            .map_err(|e| FolderError::repository(e.to_string()))?;

        if exists > 0 {
            Ok(DeleteIfEmptyOutcome::NotEmpty)
        } else {
            Ok(DeleteIfEmptyOutcome::NotFound)
        }
    }
}

/// Convert a database model to the domain folder.
fn to_domain(model: folders::Model) -> Folder {
    Folder {
        id: model.id,
        owner_id: model.owner_id,
        name: model.name,
        description: model.description,
        created_at: model.created_at.into(),
        updated_at: model.updated_at.into(),
    }
}
