//! Account services: registration, token issuance and token checks.
//!
//! Implements [`UserAccounts`] and [`TokenAuthenticator`] over the user and
//! token repositories. Credential failures are deliberately vague: a wrong
//! password, an unknown email and an inactive account all yield the same
//! message.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::ports::{
    AuthTokenRepository, AuthTokenRepositoryError, NewAccount, ProfileChanges, TokenAuthenticator,
    UserAccounts, UserPersistenceError, UserRepository,
};
use crate::domain::{
    AuthToken, Email, Error, LoginCredentials, Password, PasswordError, PasswordHash, User,
    UserFlags, UserId, UserRole,
};

const INVALID_CREDENTIALS: &str = "unable to authenticate with provided credentials";

/// Account service implementing the account driving ports.
#[derive(Clone)]
pub struct UserAccountsService<U, T> {
    users: Arc<U>,
    tokens: Arc<T>,
    clock: Arc<dyn Clock>,
}

impl<U, T> UserAccountsService<U, T> {
    /// Create a service over the given repositories.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use backend::domain::UserAccountsService;
    /// use backend::outbound::memory::InMemoryStore;
    /// use mockable::DefaultClock;
    ///
    /// let store = Arc::new(InMemoryStore::default());
    /// let _service = UserAccountsService::new(store.clone(), store, Arc::new(DefaultClock));
    /// ```
    pub fn new(users: Arc<U>, tokens: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            tokens,
            clock,
        }
    }
}

pub(crate) fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { .. } => {
            Error::invalid_request("user with this email already exists")
                .with_details(json!({ "field": "email", "code": "duplicate_email" }))
        }
    }
}

fn map_token_error(error: AuthTokenRepositoryError) -> Error {
    match error {
        AuthTokenRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("token repository unavailable: {message}"))
        }
        AuthTokenRepositoryError::Query { message } => {
            Error::internal(format!("token repository error: {message}"))
        }
    }
}

fn hash_password(password: &Password) -> Result<PasswordHash, Error> {
    PasswordHash::generate(password).map_err(|err: PasswordError| Error::internal(err.to_string()))
}

fn invalid_credentials() -> Error {
    Error::invalid_request(INVALID_CREDENTIALS)
        .with_details(json!({ "field": "non_field_errors", "code": "authorization" }))
}

impl<U, T> UserAccountsService<U, T>
where
    U: UserRepository,
    T: AuthTokenRepository,
{
    async fn create_account(&self, account: NewAccount, role: UserRole) -> Result<User, Error> {
        let NewAccount {
            email,
            password,
            name,
        } = account;
        let user = User::new(
            UserId::random(),
            email,
            name,
            hash_password(&password)?,
            UserFlags::for_role(role),
        );
        self.users
            .insert(&user)
            .await
            .map_err(map_user_persistence_error)?;
        info!(user_id = %user.id(), ?role, "user created");
        Ok(user)
    }

    /// Create an account with staff and superuser rights.
    pub async fn create_superuser(&self, account: NewAccount) -> Result<User, Error> {
        self.create_account(account, UserRole::Superuser).await
    }

    async fn load_user(&self, user_id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }
}

#[async_trait]
impl<U, T> UserAccounts for UserAccountsService<U, T>
where
    U: UserRepository,
    T: AuthTokenRepository,
{
    async fn register(&self, account: NewAccount) -> Result<User, Error> {
        self.create_account(account, UserRole::Member).await
    }

    async fn issue_token(&self, credentials: &LoginCredentials) -> Result<AuthToken, Error> {
        let Ok(email) = Email::new(credentials.email()) else {
            debug!("token request with malformed email rejected");
            return Err(invalid_credentials());
        };
        let user = self
            .users
            .find_by_email(&email)
            .await
            .map_err(map_user_persistence_error)?;

        let Some(user) = user.filter(|user| user.is_active()) else {
            debug!("token request for unknown or inactive user rejected");
            return Err(invalid_credentials());
        };
        if !user.check_password(credentials.password()) {
            debug!(user_id = %user.id(), "token request with wrong password rejected");
            return Err(invalid_credentials());
        }

        let token = AuthToken::generate();
        self.tokens
            .insert(user.id(), &token.digest(), self.clock.utc())
            .await
            .map_err(map_token_error)?;
        info!(user_id = %user.id(), "token issued");
        Ok(token)
    }

    async fn profile(&self, user_id: &UserId) -> Result<User, Error> {
        self.load_user(user_id).await
    }

    async fn update_profile(
        &self,
        user_id: &UserId,
        changes: ProfileChanges,
    ) -> Result<User, Error> {
        let mut user = self.load_user(user_id).await?;
        let ProfileChanges {
            email,
            password,
            name,
        } = changes;

        if let Some(email) = email {
            user.set_email(email);
        }
        if let Some(name) = name {
            user.set_name(name);
        }
        if let Some(password) = password {
            user.set_password_hash(hash_password(&password)?);
        }

        self.users
            .update(&user)
            .await
            .map_err(map_user_persistence_error)?;
        info!(user_id = %user.id(), "user profile updated");
        Ok(user)
    }
}

#[async_trait]
impl<U, T> TokenAuthenticator for UserAccountsService<U, T>
where
    U: UserRepository,
    T: AuthTokenRepository,
{
    async fn authenticate(&self, token: &AuthToken) -> Result<User, Error> {
        let owner = self
            .tokens
            .find_user_id(&token.digest())
            .await
            .map_err(map_token_error)?;
        let Some(owner) = owner else {
            debug!("unknown token presented");
            return Err(Error::unauthorized("invalid token"));
        };

        let user = self
            .users
            .find_by_id(&owner)
            .await
            .map_err(map_user_persistence_error)?;
        match user {
            Some(user) if user.is_active() => Ok(user),
            _ => {
                debug!(user_id = %owner, "token for inactive or deleted user rejected");
                Err(Error::unauthorized("user inactive or deleted"))
            }
        }
    }
}

#[cfg(test)]
#[path = "user_accounts_service_tests.rs"]
mod tests;
