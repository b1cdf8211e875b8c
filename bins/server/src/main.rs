//! Docuvault API Server
//!
//! Main entry point for the document storage backend.

use std::sync::Arc;

use chrono::Duration;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docuvault_api::{AppState, create_router};
use docuvault_core::document::DocumentService;
use docuvault_core::folder::FolderService;
use docuvault_core::share::ShareTokenService;
use docuvault_core::storage::{BlobStore, BlobStoreConfig, StorageProvider};
use docuvault_db::connect;
use docuvault_db::repositories::{DocumentRepository, FolderRepository};
use docuvault_shared::{AppConfig, AuthVerifier, config::StorageSettings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docuvault=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Connect to database
    let db = connect(&config.database).await?;
    info!("Connected to database");

    // Build the blob store from the configured provider
    let provider = match config.storage.clone() {
        StorageSettings::Fs { root } => StorageProvider::local_fs(root),
        StorageSettings::S3 {
            endpoint,
            bucket,
            access_key_id,
            secret_access_key,
            region,
        } => StorageProvider::s3(endpoint, bucket, access_key_id, secret_access_key, region),
        StorageSettings::AzureBlob {
            account,
            access_key,
            container,
        } => StorageProvider::azure_blob(account, access_key, container),
    };
    info!(provider = provider.name(), "Blob storage configured");
    let blobs = Arc::new(BlobStore::from_config(BlobStoreConfig::new(provider))?);

    // Token services
    let auth = Arc::new(AuthVerifier::new(&config.auth.secret));
    let share_tokens = Arc::new(ShareTokenService::new(&config.share.secret));

    // Repositories and services
    let document_repo = Arc::new(DocumentRepository::new(db.clone()));
    let folder_repo = Arc::new(FolderRepository::new(db));
    let documents = Arc::new(DocumentService::new(
        blobs,
        share_tokens,
        document_repo.clone(),
    ));
    let folders = Arc::new(FolderService::new(folder_repo, document_repo));

    #[allow(clippy::cast_possible_wrap)]
    let default_share_ttl = Duration::seconds(config.share.default_ttl_secs as i64);

    // Create application state
    let state = AppState {
        auth,
        documents,
        folders,
        public_url: config.server.public_url.clone(),
        default_share_ttl,
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
