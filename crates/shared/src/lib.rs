//! Shared types, errors, and configuration for Docuvault.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error taxonomy with HTTP status mapping
//! - Configuration management
//! - Owner-credential verification (credential issuance is external)

pub mod auth;
pub mod config;
pub mod error;

pub use auth::{AuthError, AuthVerifier, OwnerClaims};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
