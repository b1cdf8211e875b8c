//! Health check endpoints.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
    /// Configured blob storage provider.
    pub storage: &'static str,
}

fn health_response(storage: &'static str) -> HealthResponse {
    HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        storage,
    }
}

/// Health check handler.
///
/// Reports the configured storage provider so a deployment can be told apart
/// from one accidentally running on the development filesystem backend.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(health_response(state.documents.storage_provider()))
}

/// Creates health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_reports_storage_provider() {
        let response = health_response("memory");
        assert_eq!(response.status, "healthy");
        assert_eq!(response.storage, "memory");
        assert!(!response.version.is_empty());
    }
}
