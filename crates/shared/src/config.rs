//! Application configuration management.

use serde::Deserialize;
use std::path::PathBuf;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Owner-credential verification configuration.
    pub auth: AuthConfig,
    /// Share capability token configuration.
    pub share: ShareConfig,
    /// Blob storage configuration.
    #[serde(default)]
    pub storage: StorageSettings,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public base URL used when building share links.
    #[serde(default = "default_public_url")]
    pub public_url: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_public_url() -> String {
    "http://localhost:8080".to_string()
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Owner-credential verification configuration.
///
/// Credential issuance lives in the external identity service; this process
/// only verifies bearer tokens signed with the shared secret.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Secret key the identity service signs owner credentials with.
    pub secret: String,
}

/// Share capability token configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ShareConfig {
    /// Secret key for signing share tokens.
    pub secret: String,
    /// Default share token lifetime in seconds.
    #[serde(default = "default_share_ttl")]
    pub default_ttl_secs: u64,
}

fn default_share_ttl() -> u64 {
    1_209_600 // 14 days
}

/// Blob storage settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "provider", rename_all = "snake_case")]
pub enum StorageSettings {
    /// Local filesystem (development default).
    Fs {
        /// Root directory for blobs.
        #[serde(default = "default_storage_root")]
        root: PathBuf,
    },
    /// S3-compatible object storage.
    S3 {
        /// Endpoint URL.
        endpoint: String,
        /// Bucket name.
        bucket: String,
        /// Access key ID.
        access_key_id: String,
        /// Secret access key.
        secret_access_key: String,
        /// Region.
        region: String,
    },
    /// Azure Blob Storage.
    AzureBlob {
        /// Storage account name.
        account: String,
        /// Storage access key.
        access_key: String,
        /// Container name.
        container: String,
    },
}

fn default_storage_root() -> PathBuf {
    PathBuf::from("./uploads")
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self::Fs {
            root: default_storage_root(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("DOCUVAULT").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
