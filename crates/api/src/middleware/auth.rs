//! Authentication middleware for protected routes.

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::AppState;
use docuvault_shared::{AuthError, OwnerClaims};

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

/// Authentication middleware validating owner credentials.
///
/// This middleware:
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Validates the token with the shared verifier
/// 3. Stores the claims in request extensions for handlers to access
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "UNAUTHORIZED",
                "message": "Authorization header with Bearer token is required"
            })),
        )
            .into_response();
    };

    match state.auth.verify(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => {
            let message = match e {
                AuthError::Expired => "Credential has expired",
                AuthError::Invalid => "Invalid or malformed credential",
            };
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "UNAUTHORIZED", "message": message })),
            )
                .into_response()
        }
    }
}

/// Extractor for the authenticated owner.
///
/// Use this in handlers to get the verified owner identity:
///
/// ```ignore
/// async fn handler(owner: AuthOwner) -> impl IntoResponse {
///     let owner_id = owner.owner_id();
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthOwner(pub OwnerClaims);

impl AuthOwner {
    /// Returns the verified owner identity.
    #[must_use]
    pub const fn owner_id(&self) -> uuid::Uuid {
        self.0.owner_id()
    }
}

impl<S> FromRequestParts<S> for AuthOwner
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<OwnerClaims>()
            .cloned()
            .map(AuthOwner)
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({
                        "error": "UNAUTHORIZED",
                        "message": "Authentication required"
                    })),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
        assert_eq!(extract_bearer_token("abc"), None);
    }
}
