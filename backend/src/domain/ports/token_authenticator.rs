//! Driving port resolving a presented API token to its user.

use async_trait::async_trait;

use crate::domain::{AuthToken, Error, User};

/// Token check used by the HTTP auth extractor.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenAuthenticator: Send + Sync {
    /// Return the active user owning `token`, or an unauthorised error.
    async fn authenticate(&self, token: &AuthToken) -> Result<User, Error>;
}
