//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Email, PasswordHash, User, UserFlags, UserId, UserName};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{NewUserRow, UserRow, UserUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::users;

const EMAIL_CONSTRAINT: &str = "users_email_key";

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    map_basic_pool_error(error, UserPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_basic_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

fn map_write_error(error: diesel::result::Error, email: &Email) -> UserPersistenceError {
    if is_unique_violation(&error, EMAIL_CONSTRAINT) {
        return UserPersistenceError::duplicate_email(email.as_ref());
    }
    map_diesel_error(error)
}

/// Convert a database row into a domain user.
///
/// Rows are written through validated domain types, so a failure here means
/// the table was edited by hand.
fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let corrupt = |field: &str, err: String| {
        warn!(user_id = %row.id, field, "stored user row failed validation");
        UserPersistenceError::query(format!("stored user has invalid {field}: {err}"))
    };
    let email = Email::new(&row.email).map_err(|err| corrupt("email", err.to_string()))?;
    let name = UserName::new(&row.name).map_err(|err| corrupt("name", err.to_string()))?;
    let password_hash = PasswordHash::from_phc(row.password_hash.clone())
        .map_err(|err| corrupt("password_hash", err.to_string()))?;

    Ok(User::new(
        UserId::from_uuid(row.id),
        email,
        name,
        password_hash,
        UserFlags {
            is_active: row.is_active,
            is_staff: row.is_staff,
            is_superuser: row.is_superuser,
        },
    ))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let flags = user.flags();
        let new_row = NewUserRow {
            id: *user.id().as_uuid(),
            email: user.email().as_ref(),
            name: user.name().as_ref(),
            password_hash: user.password_hash().as_ref(),
            is_active: flags.is_active,
            is_staff: flags.is_staff,
            is_superuser: flags.is_superuser,
        };

        diesel::insert_into(users::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_write_error(err, user.email()))
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let flags = user.flags();
        let changes = UserUpdate {
            email: user.email().as_ref(),
            name: user.name().as_ref(),
            password_hash: user.password_hash().as_ref(),
            is_active: flags.is_active,
            is_staff: flags.is_staff,
            is_superuser: flags.is_superuser,
        };

        let updated = diesel::update(users::table.filter(users::id.eq(user.id().as_uuid())))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(|err| map_write_error(err, user.email()))?;
        if updated == 0 {
            return Err(UserPersistenceError::query("user not found for update"));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }
}
