//! Owner-credential verification.
//!
//! Credential issuance and password verification live in the external
//! identity service. This module only validates the bearer tokens that
//! service signs, producing the opaque owner identity the core trusts.

use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Claims carried by an owner credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerClaims {
    /// Owner identity (subject).
    pub sub: Uuid,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
}

impl OwnerClaims {
    /// Returns the verified owner identity.
    #[must_use]
    pub const fn owner_id(&self) -> Uuid {
        self.sub
    }
}

/// Errors that can occur while verifying an owner credential.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Token has expired.
    #[error("credential has expired")]
    Expired,

    /// Token is malformed or carries a bad signature.
    #[error("invalid credential")]
    Invalid,
}

/// Verifier for owner credentials.
#[derive(Clone)]
pub struct AuthVerifier {
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for AuthVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthVerifier")
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl AuthVerifier {
    /// Creates a verifier for credentials signed with the given secret.
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Validates and decodes an owner credential.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Expired` if the token has expired and
    /// `AuthError::Invalid` for any other decoding failure.
    pub fn verify(&self, token: &str) -> Result<OwnerClaims, AuthError> {
        let validation = Validation::default();

        decode::<OwnerClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::Invalid,
            })
    }
}
