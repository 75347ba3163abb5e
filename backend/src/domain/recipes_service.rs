//! Recipe service.
//!
//! Implements [`RecipeService`] over the recipe, tag and ingredient
//! repositories plus the image store. Attribute ids supplied by a client are
//! checked against the caller's own tags and ingredients before anything is
//! written.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::attribute_services::map_attribute_error;
use crate::domain::ports::{
    ImageStoreError, ImageUpload, IngredientRepository, RecipeImageStore, RecipeRepository,
    RecipeRepositoryError, RecipeService, TagRepository,
};
use crate::domain::{
    Error, IngredientId, Recipe, RecipeChanges, RecipeDraft, RecipeFilter, RecipeId, TagId,
    UserId, recipe_image_path,
};

fn map_recipe_error(error: RecipeRepositoryError) -> Error {
    match error {
        RecipeRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("recipe repository unavailable: {message}"))
        }
        RecipeRepositoryError::Query { message } => {
            Error::internal(format!("recipe repository error: {message}"))
        }
    }
}

fn map_image_error(error: ImageStoreError) -> Error {
    Error::internal(format!("image storage failed: {error}"))
}

fn recipe_not_found(id: RecipeId) -> Error {
    Error::not_found(format!("recipe {id} not found"))
}

fn unknown_ids<T: PartialEq + Copy + std::fmt::Display>(requested: &[T], found: &[T]) -> Vec<T> {
    requested
        .iter()
        .filter(|id| !found.contains(id))
        .copied()
        .collect()
}

fn unknown_attribute_error<T: std::fmt::Display>(field: &str, missing: &[T]) -> Error {
    let ids: Vec<String> = missing.iter().map(ToString::to_string).collect();
    Error::invalid_request(format!("unknown {field}: {}", ids.join(", "))).with_details(json!({
        "field": field,
        "code": "unknown_id",
        "value": ids,
    }))
}

/// Service implementing [`RecipeService`].
#[derive(Clone)]
pub struct RecipesService<R, Tg, In, Im> {
    recipes: Arc<R>,
    tags: Arc<Tg>,
    ingredients: Arc<In>,
    images: Arc<Im>,
}

impl<R, Tg, In, Im> RecipesService<R, Tg, In, Im> {
    /// Create a service over the given adapters.
    pub fn new(recipes: Arc<R>, tags: Arc<Tg>, ingredients: Arc<In>, images: Arc<Im>) -> Self {
        Self {
            recipes,
            tags,
            ingredients,
            images,
        }
    }
}

impl<R, Tg, In, Im> RecipesService<R, Tg, In, Im>
where
    R: RecipeRepository,
    Tg: TagRepository,
    In: IngredientRepository,
    Im: RecipeImageStore,
{
    async fn ensure_owned_attributes(
        &self,
        owner: &UserId,
        draft: &RecipeDraft,
    ) -> Result<(), Error> {
        if !draft.tags.is_empty() {
            let found: Vec<TagId> = self
                .tags
                .find_many(owner, &draft.tags)
                .await
                .map_err(map_attribute_error)?
                .into_iter()
                .map(|tag| tag.id)
                .collect();
            let missing = unknown_ids(&draft.tags, &found);
            if !missing.is_empty() {
                return Err(unknown_attribute_error("tags", &missing));
            }
        }
        if !draft.ingredients.is_empty() {
            let found: Vec<IngredientId> = self
                .ingredients
                .find_many(owner, &draft.ingredients)
                .await
                .map_err(map_attribute_error)?
                .into_iter()
                .map(|ingredient| ingredient.id)
                .collect();
            let missing = unknown_ids(&draft.ingredients, &found);
            if !missing.is_empty() {
                return Err(unknown_attribute_error("ingredients", &missing));
            }
        }
        Ok(())
    }

    async fn write_draft(
        &self,
        owner: &UserId,
        id: RecipeId,
        draft: RecipeDraft,
    ) -> Result<Recipe, Error> {
        let draft = draft.dedup_attributes();
        self.ensure_owned_attributes(owner, &draft).await?;
        let recipe = self
            .recipes
            .update(owner, id, &draft)
            .await
            .map_err(map_recipe_error)?
            .ok_or_else(|| recipe_not_found(id))?;
        info!(recipe_id = %id, user_id = %owner, "recipe updated");
        Ok(recipe)
    }

    async fn discard_image(&self, path: &str) {
        if let Err(error) = self.images.remove(path).await {
            warn!(%error, path, "failed to remove recipe image");
        }
    }
}

#[async_trait]
impl<R, Tg, In, Im> RecipeService for RecipesService<R, Tg, In, Im>
where
    R: RecipeRepository,
    Tg: TagRepository,
    In: IngredientRepository,
    Im: RecipeImageStore,
{
    async fn list_recipes(
        &self,
        owner: &UserId,
        filter: RecipeFilter,
    ) -> Result<Vec<Recipe>, Error> {
        self.recipes
            .list(owner, &filter)
            .await
            .map_err(map_recipe_error)
    }

    async fn get_recipe(&self, owner: &UserId, id: RecipeId) -> Result<Recipe, Error> {
        self.recipes
            .find(owner, id)
            .await
            .map_err(map_recipe_error)?
            .ok_or_else(|| recipe_not_found(id))
    }

    async fn create_recipe(&self, owner: &UserId, draft: RecipeDraft) -> Result<Recipe, Error> {
        let draft = draft.dedup_attributes();
        self.ensure_owned_attributes(owner, &draft).await?;
        let recipe = self
            .recipes
            .create(owner, &draft)
            .await
            .map_err(map_recipe_error)?;
        info!(recipe_id = %recipe.id, user_id = %owner, "recipe created");
        Ok(recipe)
    }

    async fn replace_recipe(
        &self,
        owner: &UserId,
        id: RecipeId,
        draft: RecipeDraft,
    ) -> Result<Recipe, Error> {
        self.write_draft(owner, id, draft).await
    }

    async fn update_recipe(
        &self,
        owner: &UserId,
        id: RecipeId,
        changes: RecipeChanges,
    ) -> Result<Recipe, Error> {
        let current = self.get_recipe(owner, id).await?;
        self.write_draft(owner, id, changes.apply_to(current.to_draft()))
            .await
    }

    async fn delete_recipe(&self, owner: &UserId, id: RecipeId) -> Result<(), Error> {
        let current = self.get_recipe(owner, id).await?;
        let deleted = self
            .recipes
            .delete(owner, id)
            .await
            .map_err(map_recipe_error)?;
        if !deleted {
            return Err(recipe_not_found(id));
        }
        if let Some(image) = current.image.as_deref() {
            self.discard_image(image).await;
        }
        info!(recipe_id = %id, user_id = %owner, "recipe deleted");
        Ok(())
    }

    async fn upload_image(
        &self,
        owner: &UserId,
        id: RecipeId,
        upload: ImageUpload,
    ) -> Result<Recipe, Error> {
        let path = recipe_image_path(&upload.filename).map_err(|err| {
            Error::invalid_request(err.to_string())
                .with_details(json!({ "field": "image", "code": "invalid_filename" }))
        })?;
        if upload.bytes.is_empty() {
            return Err(Error::invalid_request("image file is empty")
                .with_details(json!({ "field": "image", "code": "empty" })));
        }
        let current = self.get_recipe(owner, id).await?;

        self.images
            .store(&path, &upload.bytes)
            .await
            .map_err(map_image_error)?;
        let updated = match self.recipes.set_image(owner, id, &path).await {
            Ok(Some(recipe)) => recipe,
            Ok(None) => {
                self.discard_image(&path).await;
                return Err(recipe_not_found(id));
            }
            Err(error) => {
                self.discard_image(&path).await;
                return Err(map_recipe_error(error));
            }
        };

        if let Some(previous) = current.image.as_deref().filter(|old| *old != path) {
            self.discard_image(previous).await;
        }
        info!(recipe_id = %id, user_id = %owner, image = %path, "recipe image uploaded");
        Ok(updated)
    }
}

#[cfg(test)]
#[path = "recipes_service_tests.rs"]
mod tests;
