//! Folder management routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::AuthOwner};
use docuvault_core::folder::{CreateFolderInput, Folder, FolderPatch, FolderWithCount};

/// Creates the folder routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/folders", post(create_folder).get(list_folders))
        .route(
            "/folders/{id}",
            get(get_folder).put(update_folder).delete(delete_folder),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a folder.
#[derive(Debug, Deserialize)]
pub struct CreateFolderRequest {
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
}

/// Request body for updating a folder.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateFolderRequest {
    /// New display name.
    pub name: Option<String>,
    /// New description; an explicit null clears it.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,
}

/// Response for a folder.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderResponse {
    /// Folder ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Description, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Documents filed under the folder (listings only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_count: Option<u64>,
    /// Creation timestamp (ISO 8601).
    pub created_at: String,
    /// Last mutation timestamp (ISO 8601).
    pub updated_at: String,
}

impl From<Folder> for FolderResponse {
    fn from(folder: Folder) -> Self {
        Self {
            id: folder.id,
            name: folder.name,
            description: folder.description,
            document_count: None,
            created_at: folder.created_at.to_rfc3339(),
            updated_at: folder.updated_at.to_rfc3339(),
        }
    }
}

impl From<FolderWithCount> for FolderResponse {
    fn from(counted: FolderWithCount) -> Self {
        let mut response = Self::from(counted.folder);
        response.document_count = Some(counted.document_count);
        response
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/folders` — create a folder.
async fn create_folder(
    State(state): State<AppState>,
    owner: AuthOwner,
    Json(payload): Json<CreateFolderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let folder = state
        .folders
        .create_folder(
            owner.owner_id(),
            CreateFolderInput {
                name: payload.name,
                description: payload.description,
            },
        )
        .await?;

    info!(owner_id = %owner.owner_id(), folder_id = %folder.id, "folder created");
    Ok((StatusCode::CREATED, Json(FolderResponse::from(folder))))
}

/// GET `/folders` — list the caller's folders with document counts.
async fn list_folders(
    State(state): State<AppState>,
    owner: AuthOwner,
) -> Result<impl IntoResponse, ApiError> {
    let folders = state.folders.list_folders(owner.owner_id()).await?;

    Ok(Json(
        folders
            .into_iter()
            .map(FolderResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// GET `/folders/{id}` — fetch one folder.
async fn get_folder(
    State(state): State<AppState>,
    owner: AuthOwner,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let folder = state.folders.get_folder(owner.owner_id(), id).await?;
    Ok(Json(FolderResponse::from(folder)))
}

/// PUT `/folders/{id}` — update name or description.
async fn update_folder(
    State(state): State<AppState>,
    owner: AuthOwner,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateFolderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let folder = state
        .folders
        .update_folder(
            owner.owner_id(),
            id,
            FolderPatch {
                name: payload.name,
                description: payload.description,
            },
        )
        .await?;

    Ok(Json(FolderResponse::from(folder)))
}

/// DELETE `/folders/{id}` — delete an empty folder.
///
/// A folder that still contains documents is refused with 409; the documents
/// must be moved or deleted first.
async fn delete_folder(
    State(state): State<AppState>,
    owner: AuthOwner,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.folders.delete_folder(owner.owner_id(), id).await?;

    info!(owner_id = %owner.owner_id(), folder_id = %id, "folder deleted");
    Ok(Json(json!({ "message": "Folder deleted" })))
}
