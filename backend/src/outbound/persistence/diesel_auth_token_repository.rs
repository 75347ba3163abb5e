//! PostgreSQL-backed `AuthTokenRepository`.
//!
//! `auth_tokens` is keyed by digest, so a user may hold one row per login.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{AuthTokenRepository, AuthTokenRepositoryError};
use crate::domain::{TokenDigest, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::NewAuthTokenRow;
use super::pool::{DbPool, PoolError};
use super::schema::auth_tokens;

/// Diesel-backed implementation of the `AuthTokenRepository` port.
#[derive(Clone)]
pub struct DieselAuthTokenRepository {
    pool: DbPool,
}

impl DieselAuthTokenRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AuthTokenRepositoryError {
    map_basic_pool_error(error, AuthTokenRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> AuthTokenRepositoryError {
    map_basic_diesel_error(
        error,
        AuthTokenRepositoryError::query,
        AuthTokenRepositoryError::connection,
    )
}

#[async_trait]
impl AuthTokenRepository for DieselAuthTokenRepository {
    async fn insert(
        &self,
        user_id: &UserId,
        digest: &TokenDigest,
        created_at: DateTime<Utc>,
    ) -> Result<(), AuthTokenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewAuthTokenRow {
            user_id: *user_id.as_uuid(),
            token_digest: digest.as_ref(),
            created_at,
        };

        diesel::insert_into(auth_tokens::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_user_id(
        &self,
        digest: &TokenDigest,
    ) -> Result<Option<UserId>, AuthTokenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let owner: Option<Uuid> = auth_tokens::table
            .filter(auth_tokens::token_digest.eq(digest.as_ref()))
            .select(auth_tokens::user_id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(owner.map(UserId::from_uuid))
    }
}
