//! Driving port for recipe use-cases.

use async_trait::async_trait;

use crate::domain::{Error, Recipe, RecipeChanges, RecipeDraft, RecipeFilter, RecipeId, UserId};

/// An uploaded image as received from the client.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Original filename; only its extension is kept.
    pub filename: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

/// Recipe use-cases. Every call is scoped to `owner`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeService: Send + Sync {
    /// Recipes matching `filter`, id ascending.
    async fn list_recipes(&self, owner: &UserId, filter: RecipeFilter)
    -> Result<Vec<Recipe>, Error>;

    /// A single recipe.
    async fn get_recipe(&self, owner: &UserId, id: RecipeId) -> Result<Recipe, Error>;

    /// Create a recipe.
    async fn create_recipe(&self, owner: &UserId, draft: RecipeDraft) -> Result<Recipe, Error>;

    /// Replace all writable fields.
    async fn replace_recipe(
        &self,
        owner: &UserId,
        id: RecipeId,
        draft: RecipeDraft,
    ) -> Result<Recipe, Error>;

    /// Update only the provided fields.
    async fn update_recipe(
        &self,
        owner: &UserId,
        id: RecipeId,
        changes: RecipeChanges,
    ) -> Result<Recipe, Error>;

    /// Delete a recipe and its image.
    async fn delete_recipe(&self, owner: &UserId, id: RecipeId) -> Result<(), Error>;

    /// Store an image and attach it to the recipe.
    async fn upload_image(
        &self,
        owner: &UserId,
        id: RecipeId,
        upload: ImageUpload,
    ) -> Result<Recipe, Error>;
}
