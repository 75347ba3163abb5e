//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the repository ports backed by PostgreSQL via
//! `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. No business logic resides here.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Owner scoping**: every tag, ingredient and recipe query filters on
//!   `user_id`.
//! - **Typed errors**: Diesel and pool failures map onto each port's own
//!   error enum through `diesel_basic_error_mapping`.
//!
//! # Example
//!
//! ```no_run
//! use backend::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! # async fn connect() -> Result<(), backend::outbound::persistence::PoolError> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/recipes")).await?;
//! let _users = DieselUserRepository::new(pool);
//! # Ok(())
//! # }
//! ```

mod diesel_attribute_repositories;
mod diesel_auth_token_repository;
mod diesel_basic_error_mapping;
mod diesel_recipe_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_attribute_repositories::{DieselIngredientRepository, DieselTagRepository};
pub use diesel_auth_token_repository::DieselAuthTokenRepository;
pub use diesel_recipe_repository::DieselRecipeRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
