//! Port for recipe persistence.
//!
//! Adapters resolve attached tags and ingredients when returning a
//! [`Recipe`]. Every operation is scoped to the owner: a recipe belonging to
//! someone else behaves exactly like a missing one.

use async_trait::async_trait;

use crate::domain::{Recipe, RecipeDraft, RecipeFilter, RecipeId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by recipe repository adapters.
    pub enum RecipeRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "recipe repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "recipe repository query failed: {message}",
    }
}

/// Storage for recipes and their attribute links.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// List the owner's recipes matching `filter`, ordered by id ascending.
    async fn list(
        &self,
        owner: &UserId,
        filter: &RecipeFilter,
    ) -> Result<Vec<Recipe>, RecipeRepositoryError>;

    /// Fetch one of the owner's recipes.
    async fn find(
        &self,
        owner: &UserId,
        id: RecipeId,
    ) -> Result<Option<Recipe>, RecipeRepositoryError>;

    /// Create a recipe. Attribute ids are assumed to belong to the owner.
    async fn create(
        &self,
        owner: &UserId,
        draft: &RecipeDraft,
    ) -> Result<Recipe, RecipeRepositoryError>;

    /// Replace every writable field. Returns `None` when the recipe is absent.
    async fn update(
        &self,
        owner: &UserId,
        id: RecipeId,
        draft: &RecipeDraft,
    ) -> Result<Option<Recipe>, RecipeRepositoryError>;

    /// Point the recipe at a stored image. Returns `None` when absent.
    async fn set_image(
        &self,
        owner: &UserId,
        id: RecipeId,
        image: &str,
    ) -> Result<Option<Recipe>, RecipeRepositoryError>;

    /// Delete a recipe. Returns `false` when nothing was deleted.
    async fn delete(&self, owner: &UserId, id: RecipeId) -> Result<bool, RecipeRepositoryError>;
}
