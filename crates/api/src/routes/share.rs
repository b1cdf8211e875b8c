//! Share-link resolution.
//!
//! The only route outside the auth layer besides health: the signed
//! capability token in the query string is the whole authorization.

use axum::{
    Router,
    extract::{Path, Query, State},
    response::Response,
    routing::get,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::{AppState, error::ApiError, routes::documents::serve_document_content};
use docuvault_shared::AppError;

/// Creates the share routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/share/{id}", get(resolve_share))
}

/// Query parameters for share resolution.
///
/// The token is optional at the extractor level so that its absence reaches
/// the handler and is reported as an authorization failure, not a malformed
/// request.
#[derive(Debug, Default, Deserialize)]
pub struct ShareQuery {
    /// The signed capability token.
    pub token: Option<String>,
}

/// A missing or blank token is an authorization failure: the capability is
/// the only credential this route accepts.
fn require_token(query: ShareQuery) -> Result<String, ApiError> {
    query
        .token
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError(AppError::Unauthorized("missing share token".into())))
}

/// GET `/share/{id}?token=` — download a shared document.
async fn resolve_share(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ShareQuery>,
) -> Result<Response, ApiError> {
    let token = require_token(query)?;
    let document = state.documents.resolve_share_token(&token).await?;

    // A valid token for some other document does not open this one.
    if document.id != id {
        return Err(ApiError(AppError::Unauthorized(
            "token does not match the requested document".into(),
        )));
    }

    info!(document_id = %id, "share link resolved");
    serve_document_content(&state, document).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_token_is_unauthorized() {
        let err = require_token(ShareQuery::default()).unwrap_err();
        assert_eq!(err.0.status_code(), 401);
    }

    #[test]
    fn test_blank_token_is_unauthorized() {
        let err = require_token(ShareQuery {
            token: Some(String::new()),
        })
        .unwrap_err();
        assert_eq!(err.0.status_code(), 401);
    }

    #[test]
    fn test_present_token_passes_through() {
        let token = require_token(ShareQuery {
            token: Some("signed-token".into()),
        })
        .expect("token should pass");
        assert_eq!(token, "signed-token");
    }
}
