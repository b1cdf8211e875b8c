//! Share token issuing and verification.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ShareTokenError;

/// The single purpose share tokens are minted for.
pub const SHARE_PURPOSE: &str = "share-download";

/// Claims embedded in a share token.
#[derive(Debug, Serialize, Deserialize)]
struct ShareClaims {
    /// Document the token grants access to.
    sub: Uuid,
    /// Purpose the token was minted for.
    purpose: String,
    /// Expiration timestamp (seconds since epoch).
    exp: i64,
    /// Issued-at timestamp (seconds since epoch).
    iat: i64,
}

/// The decoded, verified payload of a share token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShareGrant {
    /// Document the holder may download.
    pub document_id: Uuid,
}

/// Service for minting and verifying share tokens.
#[derive(Clone)]
pub struct ShareTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for ShareTokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShareTokenService")
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl ShareTokenService {
    /// Creates a new share token service signing with the given secret.
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issues a signed share token for a document.
    ///
    /// # Errors
    ///
    /// Returns `ShareTokenError::Encoding` if token generation fails.
    pub fn issue(&self, document_id: Uuid, ttl: Duration) -> Result<String, ShareTokenError> {
        self.issue_at(document_id, ttl, Utc::now())
    }

    fn issue_at(
        &self,
        document_id: Uuid,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, ShareTokenError> {
        let claims = ShareClaims {
            sub: document_id,
            purpose: SHARE_PURPOSE.to_string(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ShareTokenError::Encoding(e.to_string()))
    }

    /// Verifies a share token and returns the grant it carries.
    ///
    /// # Errors
    ///
    /// Returns `ShareTokenError::Expired` when `exp <= now` and
    /// `ShareTokenError::Invalid` for a bad signature, malformed token, or
    /// wrong purpose.
    pub fn verify(&self, token: &str) -> Result<ShareGrant, ShareTokenError> {
        self.verify_at(token, Utc::now())
    }

    fn verify_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<ShareGrant, ShareTokenError> {
        // Expiry is checked explicitly below so the boundary sits exactly at
        // `now` with no library leeway.
        let mut validation = Validation::default();
        validation.validate_exp = false;

        let claims = decode::<ShareClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| ShareTokenError::Invalid)?;

        if claims.purpose != SHARE_PURPOSE {
            return Err(ShareTokenError::Invalid);
        }
        if claims.exp <= now.timestamp() {
            return Err(ShareTokenError::Expired);
        }

        Ok(ShareGrant {
            document_id: claims.sub,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> ShareTokenService {
        ShareTokenService::new("test-secret-key-for-testing")
    }

    #[test]
    fn test_issue_and_verify() {
        let service = create_test_service();
        let document_id = Uuid::new_v4();

        let token = service
            .issue(document_id, Duration::seconds(60))
            .expect("should issue");
        let grant = service.verify(&token).expect("should verify");

        assert_eq!(grant.document_id, document_id);
    }

    #[test]
    fn test_zero_ttl_token_is_rejected_immediately() {
        let service = create_test_service();

        let token = service
            .issue(Uuid::new_v4(), Duration::zero())
            .expect("should issue");

        assert!(matches!(
            service.verify(&token),
            Err(ShareTokenError::Expired)
        ));
    }

    #[test]
    fn test_token_expires_after_ttl() {
        let service = create_test_service();
        let now = Utc::now();

        let token = service
            .issue_at(Uuid::new_v4(), Duration::seconds(60), now)
            .expect("should issue");

        // Still valid just before expiry.
        assert!(service.verify_at(&token, now + Duration::seconds(59)).is_ok());

        // Rejected once the clock passes expiry.
        assert!(matches!(
            service.verify_at(&token, now + Duration::seconds(61)),
            Err(ShareTokenError::Expired)
        ));
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let service = create_test_service();
        let other = ShareTokenService::new("a-different-secret");

        let token = other
            .issue(Uuid::new_v4(), Duration::seconds(60))
            .expect("should issue");

        assert!(matches!(
            service.verify(&token),
            Err(ShareTokenError::Invalid)
        ));
    }

    #[test]
    fn test_malformed_token_is_invalid() {
        let service = create_test_service();
        assert!(matches!(
            service.verify("not.a.token"),
            Err(ShareTokenError::Invalid)
        ));
    }

    #[test]
    fn test_wrong_purpose_is_invalid() {
        let service = create_test_service();
        let now = Utc::now();

        // Mint a structurally identical token with a different purpose claim.
        let claims = ShareClaims {
            sub: Uuid::new_v4(),
            purpose: "password-reset".to_string(),
            exp: (now + Duration::seconds(60)).timestamp(),
            iat: now.timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret-key-for-testing"),
        )
        .expect("should encode");

        assert!(matches!(
            service.verify(&token),
            Err(ShareTokenError::Invalid)
        ));
    }
}
