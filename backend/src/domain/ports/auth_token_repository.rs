//! Port for persisting API token digests.
//!
//! A user may hold several tokens at once, one per login. Each digest stays
//! valid until its owner is deleted.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{TokenDigest, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token repository adapters.
    pub enum AuthTokenRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "token repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "token repository query failed: {message}",
    }
}

/// Storage for token digests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthTokenRepository: Send + Sync {
    /// Store `digest` as an additional token for `user_id`.
    async fn insert(
        &self,
        user_id: &UserId,
        digest: &TokenDigest,
        issued_at: DateTime<Utc>,
    ) -> Result<(), AuthTokenRepositoryError>;

    /// Resolve a digest back to its owner.
    async fn find_user_id(
        &self,
        digest: &TokenDigest,
    ) -> Result<Option<UserId>, AuthTokenRepositoryError>;
}
