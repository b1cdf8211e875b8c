//! Document management routes.

use axum::{
    Json, Router,
    body::Body,
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::AuthOwner};
use docuvault_core::document::{
    CreateTextDocumentInput, Document, DocumentKind, DocumentPatch, StagedBlob,
};
use docuvault_shared::AppError;

/// Upload request body cap: the largest accepted blob plus form overhead.
const MAX_UPLOAD_BODY: usize = 26 * 1024 * 1024;

/// Creates the document routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/documents", post(upload_document).get(list_documents))
        .route("/documents/text", post(create_text_document))
        .route(
            "/documents/{id}",
            get(get_document)
                .put(update_document)
                .delete(delete_document),
        )
        .route("/documents/{id}/download", get(download_document))
        .route("/documents/{id}/share", post(share_document))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BODY))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing documents.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDocumentsQuery {
    /// Only documents filed under this folder.
    pub folder_id: Option<Uuid>,
    /// Truncate the listing to this many documents.
    pub limit: Option<u64>,
}

/// Request body for creating a text document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTextDocumentRequest {
    /// Display name.
    pub name: String,
    /// Rich-text body.
    pub content: Option<String>,
    /// Containing folder.
    pub folder_id: Option<Uuid>,
    /// Template the document started from.
    pub template_id: Option<String>,
}

/// Request body for updating a document.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDocumentRequest {
    /// New display name.
    pub name: Option<String>,
    /// New folder assignment; an explicit null unfiles the document.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub folder_id: Option<Option<Uuid>>,
    /// New rich-text body (text documents only).
    pub content: Option<String>,
}

/// Request body for minting a share token.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareDocumentRequest {
    /// Requested token lifetime in seconds.
    pub ttl_secs: Option<i64>,
}

/// Response for a minted share token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareDocumentResponse {
    /// The signed capability token.
    pub token: String,
    /// Ready-to-use share link.
    pub url: String,
    /// When the token expires (ISO 8601).
    pub expires_at: String,
}

/// Response for a document.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    /// Document ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Containing folder.
    pub folder_id: Option<Uuid>,
    /// Document kind: `file` or `text`.
    pub kind: &'static str,
    /// Original filename (file documents).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_name: Option<String>,
    /// Blob size in bytes (file documents).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    /// MIME type (file documents).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Rich-text body (text documents).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Template reference (text documents).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    /// Creation timestamp (ISO 8601).
    pub uploaded_at: String,
    /// Last mutation timestamp (ISO 8601).
    pub updated_at: String,
}

impl From<Document> for DocumentResponse {
    fn from(document: Document) -> Self {
        let mut response = Self {
            id: document.id,
            name: document.name,
            folder_id: document.folder_id,
            kind: document.kind.as_str(),
            original_name: None,
            size_bytes: None,
            mime_type: None,
            content: None,
            template_id: None,
            uploaded_at: document.uploaded_at.to_rfc3339(),
            updated_at: document.updated_at.to_rfc3339(),
        };
        match document.kind {
            DocumentKind::File {
                original_name,
                size_bytes,
                mime_type,
                ..
            } => {
                response.original_name = Some(original_name);
                response.size_bytes = Some(size_bytes);
                response.mime_type = Some(mime_type);
            }
            DocumentKind::Text {
                content,
                template_id,
            } => {
                response.content = Some(content);
                response.template_id = template_id;
            }
        }
        response
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/documents` — multipart upload of a file document.
///
/// Accepts the parts in any order: the blob is streamed to storage as soon
/// as the `file` part arrives, and the metadata record is only created once
/// the whole form has been read.
async fn upload_document(
    State(state): State<AppState>,
    owner: AuthOwner,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut staged: Option<StagedBlob> = None;
    let mut display_name: Option<String> = None;
    let mut folder_id: Option<Uuid> = None;

    let collected: Result<(), ApiError> = async {
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError(AppError::Validation(e.to_string())))?
        {
            match field.name() {
                Some("file") => {
                    if staged.is_some() {
                        return Err(ApiError(AppError::Validation(
                            "only one file part is allowed".into(),
                        )));
                    }
                    let original_name = field.file_name().unwrap_or_default().to_string();
                    let mime_type = field
                        .content_type()
                        .unwrap_or("application/octet-stream")
                        .to_string();
                    staged = Some(
                        state
                            .documents
                            .store_blob(
                                owner.owner_id(),
                                &original_name,
                                &mime_type,
                                Box::pin(field),
                            )
                            .await?,
                    );
                }
                Some("name") => {
                    display_name = Some(
                        field
                            .text()
                            .await
                            .map_err(|e| ApiError(AppError::Validation(e.to_string())))?,
                    );
                }
                Some("folderId") => {
                    let raw = field
                        .text()
                        .await
                        .map_err(|e| ApiError(AppError::Validation(e.to_string())))?;
                    folder_id = Some(Uuid::parse_str(raw.trim()).map_err(|_| {
                        ApiError(AppError::Validation("folderId must be a UUID".into()))
                    })?);
                }
                _ => {}
            }
        }
        Ok(())
    }
    .await;

    if let Err(e) = collected {
        if let Some(staged) = staged {
            state.documents.discard_blob(&staged.storage_key).await;
        }
        return Err(e);
    }

    let Some(staged) = staged else {
        return Err(ApiError(AppError::Validation(
            "multipart field 'file' is required".into(),
        )));
    };

    let document = state
        .documents
        .create_file_document(owner.owner_id(), staged, display_name, folder_id)
        .await?;

    info!(owner_id = %owner.owner_id(), document_id = %document.id, "file document created");
    Ok((
        StatusCode::CREATED,
        Json(DocumentResponse::from(document)),
    ))
}

/// POST `/documents/text` — create a rich-text document.
async fn create_text_document(
    State(state): State<AppState>,
    owner: AuthOwner,
    Json(payload): Json<CreateTextDocumentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let document = state
        .documents
        .create_text_document(
            owner.owner_id(),
            CreateTextDocumentInput {
                name: payload.name,
                content: payload.content,
                folder_id: payload.folder_id,
                template_id: payload.template_id,
            },
        )
        .await?;

    info!(owner_id = %owner.owner_id(), document_id = %document.id, "text document created");
    Ok((
        StatusCode::CREATED,
        Json(DocumentResponse::from(document)),
    ))
}

/// GET `/documents` — list the caller's documents, newest first.
async fn list_documents(
    State(state): State<AppState>,
    owner: AuthOwner,
    Query(query): Query<ListDocumentsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let documents = state
        .documents
        .list_documents(owner.owner_id(), query.folder_id, query.limit)
        .await?;

    Ok(Json(
        documents
            .into_iter()
            .map(DocumentResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// GET `/documents/{id}` — fetch one document record.
async fn get_document(
    State(state): State<AppState>,
    owner: AuthOwner,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let document = state.documents.get_document(owner.owner_id(), id).await?;
    Ok(Json(DocumentResponse::from(document)))
}

/// PUT `/documents/{id}` — update name, folder, or text content.
async fn update_document(
    State(state): State<AppState>,
    owner: AuthOwner,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDocumentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let document = state
        .documents
        .update_document(
            owner.owner_id(),
            id,
            DocumentPatch {
                name: payload.name,
                folder_id: payload.folder_id,
                content: payload.content,
            },
        )
        .await?;

    Ok(Json(DocumentResponse::from(document)))
}

/// DELETE `/documents/{id}` — delete a document and its blob.
async fn delete_document(
    State(state): State<AppState>,
    owner: AuthOwner,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.documents.delete_document(owner.owner_id(), id).await?;

    info!(owner_id = %owner.owner_id(), document_id = %id, "document deleted");
    Ok(Json(json!({ "ok": true })))
}

/// GET `/documents/{id}/download` — download the caller's own document.
async fn download_document(
    State(state): State<AppState>,
    owner: AuthOwner,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let document = state.documents.get_document(owner.owner_id(), id).await?;
    serve_document_content(&state, document).await
}

/// POST `/documents/{id}/share` — mint a time-limited download link.
async fn share_document(
    State(state): State<AppState>,
    owner: AuthOwner,
    Path(id): Path<Uuid>,
    payload: Option<Json<ShareDocumentRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let requested = payload.and_then(|Json(p)| p.ttl_secs);
    let ttl = match requested {
        Some(secs) if secs <= 0 => {
            return Err(ApiError(AppError::Validation(
                "ttlSecs must be positive".into(),
            )));
        }
        Some(secs) => Duration::seconds(secs),
        None => state.default_share_ttl,
    };

    let token = state
        .documents
        .generate_share_token(owner.owner_id(), id, ttl)
        .await?;
    let expires_at: DateTime<Utc> = Utc::now() + ttl;

    info!(owner_id = %owner.owner_id(), document_id = %id, "share token minted");
    Ok(Json(ShareDocumentResponse {
        url: format!("{}/api/v1/share/{id}?token={token}", state.public_url),
        token,
        expires_at: expires_at.to_rfc3339(),
    }))
}

// ============================================================================
// Helpers
// ============================================================================

/// Serve a document's content: stream the blob for file documents, return
/// the rich-text body for text documents.
///
/// Shared with share-link resolution, which performs the same delivery once
/// the capability has been verified.
pub(crate) async fn serve_document_content(
    state: &AppState,
    document: Document,
) -> Result<Response, ApiError> {
    match &document.kind {
        DocumentKind::Text { content, .. } => Ok((
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            content.clone(),
        )
            .into_response()),
        DocumentKind::File {
            original_name,
            size_bytes,
            mime_type,
            ..
        } => {
            let stream = state.documents.open_file_stream(&document).await?;

            let disposition = format!(
                "attachment; filename=\"{}\"",
                original_name.replace(['"', '\\'], "_")
            );
            let response = Response::builder()
                .header(header::CONTENT_TYPE, mime_type)
                .header(header::CONTENT_LENGTH, *size_bytes)
                .header(header::CONTENT_DISPOSITION, disposition)
                .body(Body::from_stream(stream))
                .map_err(|e| ApiError(AppError::Internal(e.to_string())))?;
            Ok(response)
        }
    }
}
