//! Mapping from core errors to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use docuvault_core::document::DocumentError;
use docuvault_core::folder::FolderError;
use docuvault_core::share::ShareTokenError;
use docuvault_shared::AppError;

/// Error wrapper turning the shared taxonomy into JSON responses.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = Json(json!({
            "error": self.0.error_code(),
            "message": self.0.to_string(),
        }));
        (status, body).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(e: AppError) -> Self {
        Self(e)
    }
}

impl From<DocumentError> for ApiError {
    fn from(e: DocumentError) -> Self {
        let app = match e {
            DocumentError::NotFound(id) => AppError::NotFound(format!("document {id}")),
            // An unknown or foreign folder reference is a bad input, not a
            // missing resource: the request targeted a document.
            DocumentError::FolderNotFound(id) => {
                AppError::Validation(format!("folder {id} does not exist"))
            }
            DocumentError::Validation(msg) => AppError::Validation(msg),
            DocumentError::Storage(e) if e.is_not_found() => {
                AppError::NotFound("stored file".to_string())
            }
            DocumentError::Storage(e) => AppError::Storage(e.to_string()),
            DocumentError::ShareToken(e) => return Self::from(e),
            DocumentError::Repository(msg) => AppError::Database(msg),
        };
        Self(app)
    }
}

impl From<FolderError> for ApiError {
    fn from(e: FolderError) -> Self {
        let app = match e {
            FolderError::NotFound(id) => AppError::NotFound(format!("folder {id}")),
            FolderError::NotEmpty { document_count, .. } => AppError::Conflict(format!(
                "folder still contains {document_count} document(s)"
            )),
            FolderError::Validation(msg) => AppError::Validation(msg),
            FolderError::Repository(msg) => AppError::Database(msg),
        };
        Self(app)
    }
}

impl From<ShareTokenError> for ApiError {
    fn from(e: ShareTokenError) -> Self {
        let app = match e {
            ShareTokenError::Expired => AppError::Unauthorized("share link has expired".into()),
            ShareTokenError::Invalid => AppError::Unauthorized("invalid share token".into()),
            ShareTokenError::Encoding(msg) => AppError::Internal(msg),
        };
        Self(app)
    }
}
