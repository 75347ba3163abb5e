//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Email, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses the email address.
        DuplicateEmail { email: String } => "email already registered: {email}",
    }
}

/// Storage for user accounts keyed by id and by normalised email.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user. Fails with `DuplicateEmail` if the email is taken.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Overwrite an existing user. Fails with `DuplicateEmail` when the new
    /// email belongs to another account.
    async fn update(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by normalised email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError>;
}
