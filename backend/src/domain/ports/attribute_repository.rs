//! Ports for tag and ingredient persistence.
//!
//! Every operation is scoped to an owner; adapters never return another
//! user's rows. Lists are ordered by name descending.

use async_trait::async_trait;

use crate::domain::{AttributeName, Ingredient, IngredientId, Tag, TagId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by tag and ingredient repository adapters.
    pub enum AttributeRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "attribute repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "attribute repository query failed: {message}",
    }
}

/// Storage for tags.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// List the owner's tags. With `assigned_only`, keep tags attached to at
    /// least one recipe.
    async fn list(
        &self,
        owner: &UserId,
        assigned_only: bool,
    ) -> Result<Vec<Tag>, AttributeRepositoryError>;

    /// Create a tag.
    async fn create(
        &self,
        owner: &UserId,
        name: &AttributeName,
    ) -> Result<Tag, AttributeRepositoryError>;

    /// Fetch the owner's tags among `ids`. Unknown or foreign ids are skipped.
    async fn find_many(
        &self,
        owner: &UserId,
        ids: &[TagId],
    ) -> Result<Vec<Tag>, AttributeRepositoryError>;
}

/// Storage for ingredients.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IngredientRepository: Send + Sync {
    /// List the owner's ingredients. With `assigned_only`, keep ingredients
    /// attached to at least one recipe.
    async fn list(
        &self,
        owner: &UserId,
        assigned_only: bool,
    ) -> Result<Vec<Ingredient>, AttributeRepositoryError>;

    /// Create an ingredient.
    async fn create(
        &self,
        owner: &UserId,
        name: &AttributeName,
    ) -> Result<Ingredient, AttributeRepositoryError>;

    /// Fetch the owner's ingredients among `ids`. Unknown or foreign ids are
    /// skipped.
    async fn find_many(
        &self,
        owner: &UserId,
        ids: &[IngredientId],
    ) -> Result<Vec<Ingredient>, AttributeRepositoryError>;
}
