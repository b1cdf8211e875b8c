//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes
//! - Authentication middleware
//! - Error mapping to the shared taxonomy

pub mod error;
pub mod middleware;
pub mod routes;

use axum::Router;
use chrono::Duration;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use docuvault_core::document::DocumentService;
use docuvault_core::folder::FolderService;
use docuvault_db::repositories::{DocumentRepository, FolderRepository};
use docuvault_shared::AuthVerifier;

/// Document service over the database-backed repository.
pub type Documents = DocumentService<DocumentRepository>;

/// Folder service over the database-backed repositories.
pub type Folders = FolderService<FolderRepository, DocumentRepository>;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Verifier for owner credentials.
    pub auth: Arc<AuthVerifier>,
    /// Document service.
    pub documents: Arc<Documents>,
    /// Folder service.
    pub folders: Arc<Folders>,
    /// Public base URL used when building share links.
    pub public_url: String,
    /// Share token lifetime when the request does not pick one.
    pub default_share_ttl: Duration,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
