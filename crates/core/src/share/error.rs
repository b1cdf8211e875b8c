//! Share token error types.

use thiserror::Error;

/// Errors that can occur during share token operations.
#[derive(Debug, Error)]
pub enum ShareTokenError {
    /// Token is malformed, carries a bad signature, or has the wrong purpose.
    #[error("invalid share token")]
    Invalid,

    /// Token has expired.
    #[error("share token has expired")]
    Expired,

    /// Token encoding failed.
    #[error("failed to encode share token: {0}")]
    Encoding(String),
}
