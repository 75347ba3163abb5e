//! Driving port for account management: registration, token issuance and
//! profile edits.

use async_trait::async_trait;

use crate::domain::{AuthToken, Email, Error, LoginCredentials, Password, User, UserId, UserName};

/// Registration request.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Login email.
    pub email: Email,
    /// Plain-text password, hashed before storage.
    pub password: Password,
    /// Optional display name.
    pub name: UserName,
}

/// Profile update; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    /// New login email.
    pub email: Option<Email>,
    /// New password.
    pub password: Option<Password>,
    /// New display name.
    pub name: Option<UserName>,
}

/// Account use-cases consumed by inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAccounts: Send + Sync {
    /// Create a regular account.
    async fn register(&self, account: NewAccount) -> Result<User, Error>;

    /// Check credentials and issue a fresh token. Earlier tokens stay valid.
    async fn issue_token(&self, credentials: &LoginCredentials) -> Result<AuthToken, Error>;

    /// Load the account for an authenticated user.
    async fn profile(&self, user_id: &UserId) -> Result<User, Error>;

    /// Apply profile changes for an authenticated user.
    async fn update_profile(&self, user_id: &UserId, changes: ProfileChanges)
    -> Result<User, Error>;
}
