//! Signed capability tokens for time-limited document access.
//!
//! A share token is a stateless, self-contained credential granting a
//! single purpose (downloading one document) until it expires. There is no
//! server-side revocation list: a leaked token stays valid until its natural
//! expiry.

mod error;
mod token;

pub use error::ShareTokenError;
pub use token::{SHARE_PURPOSE, ShareGrant, ShareTokenService};
