//! In-memory adapters for the driven ports.
//!
//! Used when no database URL is configured and by the HTTP tests. State lives
//! behind a single mutex, so every operation sees a consistent snapshot and
//! foreign keys behave like the PostgreSQL schema: deleting a recipe drops
//! its attribute links, and ids are assigned from per-table sequences.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    AttributeRepositoryError, AuthTokenRepository, AuthTokenRepositoryError, ImageStoreError,
    IngredientRepository, RecipeImageStore, RecipeRepository, RecipeRepositoryError,
    TagRepository, UserPersistenceError, UserRepository,
};
use crate::domain::{
    AttributeName, Email, Ingredient, IngredientId, Recipe, RecipeDraft, RecipeFilter, RecipeId,
    Tag, TagId, TokenDigest, User, UserId, sort_by_name_descending,
};

#[derive(Debug, Clone)]
struct StoredRecipe {
    owner: UserId,
    draft: RecipeDraft,
    image: Option<String>,
}

#[derive(Debug, Default)]
struct StoreState {
    users: HashMap<UserId, User>,
    tokens: HashMap<TokenDigest, UserId>,
    tags: BTreeMap<TagId, Tag>,
    ingredients: BTreeMap<IngredientId, Ingredient>,
    recipes: BTreeMap<RecipeId, StoredRecipe>,
    last_tag_id: i64,
    last_ingredient_id: i64,
    last_recipe_id: i64,
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

impl StoreState {
    fn email_taken(&self, email: &Email, except: Option<&UserId>) -> bool {
        self.users
            .values()
            .any(|user| user.email() == email && Some(user.id()) != except)
    }

    fn assigned_tags(&self, owner: &UserId) -> BTreeSet<TagId> {
        self.recipes
            .values()
            .filter(|recipe| &recipe.owner == owner)
            .flat_map(|recipe| recipe.draft.tags.iter().copied())
            .collect()
    }

    fn assigned_ingredients(&self, owner: &UserId) -> BTreeSet<IngredientId> {
        self.recipes
            .values()
            .filter(|recipe| &recipe.owner == owner)
            .flat_map(|recipe| recipe.draft.ingredients.iter().copied())
            .collect()
    }

    fn resolve(&self, id: RecipeId, stored: &StoredRecipe) -> Recipe {
        let mut tags: Vec<Tag> = stored
            .draft
            .tags
            .iter()
            .filter_map(|tag_id| self.tags.get(tag_id))
            .filter(|tag| tag.owner == stored.owner)
            .cloned()
            .collect();
        tags.sort_by_key(|tag| tag.id);
        let mut ingredients: Vec<Ingredient> = stored
            .draft
            .ingredients
            .iter()
            .filter_map(|ingredient_id| self.ingredients.get(ingredient_id))
            .filter(|ingredient| ingredient.owner == stored.owner)
            .cloned()
            .collect();
        ingredients.sort_by_key(|ingredient| ingredient.id);

        Recipe {
            id,
            owner: stored.owner.clone(),
            title: stored.draft.title.clone(),
            time_minutes: stored.draft.time_minutes,
            price: stored.draft.price,
            link: stored.draft.link.clone(),
            tags,
            ingredients,
            image: stored.image.clone(),
        }
    }

    fn owned_recipe(&self, owner: &UserId, id: RecipeId) -> Option<&StoredRecipe> {
        self.recipes.get(&id).filter(|recipe| &recipe.owner == owner)
    }
}

/// Shared in-memory store implementing every repository port.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut state = self.state();
        if state.email_taken(user.email(), None) {
            return Err(UserPersistenceError::duplicate_email(user.email().as_ref()));
        }
        state.users.insert(user.id().clone(), user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut state = self.state();
        if state.email_taken(user.email(), Some(user.id())) {
            return Err(UserPersistenceError::duplicate_email(user.email().as_ref()));
        }
        match state.users.get_mut(user.id()) {
            Some(existing) => {
                *existing = user.clone();
                Ok(())
            }
            None => Err(UserPersistenceError::query(format!(
                "user {} does not exist",
                user.id()
            ))),
        }
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.state().users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .state()
            .users
            .values()
            .find(|user| user.email() == email)
            .cloned())
    }
}

#[async_trait]
impl AuthTokenRepository for InMemoryStore {
    async fn insert(
        &self,
        user_id: &UserId,
        digest: &TokenDigest,
        _created_at: DateTime<Utc>,
    ) -> Result<(), AuthTokenRepositoryError> {
        let mut state = self.state();
        if !state.users.contains_key(user_id) {
            return Err(AuthTokenRepositoryError::query(format!(
                "user {user_id} does not exist"
            )));
        }
        state.tokens.insert(digest.clone(), user_id.clone());
        Ok(())
    }

    async fn find_user_id(
        &self,
        digest: &TokenDigest,
    ) -> Result<Option<UserId>, AuthTokenRepositoryError> {
        Ok(self.state().tokens.get(digest).cloned())
    }
}

#[async_trait]
impl TagRepository for InMemoryStore {
    async fn list(
        &self,
        owner: &UserId,
        assigned_only: bool,
    ) -> Result<Vec<Tag>, AttributeRepositoryError> {
        let state = self.state();
        let assigned = assigned_only.then(|| state.assigned_tags(owner));
        let mut tags: Vec<Tag> = state
            .tags
            .values()
            .filter(|tag| &tag.owner == owner)
            .filter(|tag| assigned.as_ref().is_none_or(|ids| ids.contains(&tag.id)))
            .cloned()
            .collect();
        sort_by_name_descending(&mut tags, |tag| (&tag.name, tag.id));
        Ok(tags)
    }

    async fn create(
        &self,
        owner: &UserId,
        name: &AttributeName,
    ) -> Result<Tag, AttributeRepositoryError> {
        let mut state = self.state();
        let id = TagId::new(next_id(&mut state.last_tag_id))
            .map_err(|err| AttributeRepositoryError::query(err.to_string()))?;
        let tag = Tag {
            id,
            owner: owner.clone(),
            name: name.clone(),
        };
        state.tags.insert(id, tag.clone());
        Ok(tag)
    }

    async fn find_many(
        &self,
        owner: &UserId,
        ids: &[TagId],
    ) -> Result<Vec<Tag>, AttributeRepositoryError> {
        let state = self.state();
        Ok(ids
            .iter()
            .filter_map(|id| state.tags.get(id))
            .filter(|tag| &tag.owner == owner)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl IngredientRepository for InMemoryStore {
    async fn list(
        &self,
        owner: &UserId,
        assigned_only: bool,
    ) -> Result<Vec<Ingredient>, AttributeRepositoryError> {
        let state = self.state();
        let assigned = assigned_only.then(|| state.assigned_ingredients(owner));
        let mut ingredients: Vec<Ingredient> = state
            .ingredients
            .values()
            .filter(|ingredient| &ingredient.owner == owner)
            .filter(|ingredient| {
                assigned
                    .as_ref()
                    .is_none_or(|ids| ids.contains(&ingredient.id))
            })
            .cloned()
            .collect();
        sort_by_name_descending(&mut ingredients, |ingredient| {
            (&ingredient.name, ingredient.id)
        });
        Ok(ingredients)
    }

    async fn create(
        &self,
        owner: &UserId,
        name: &AttributeName,
    ) -> Result<Ingredient, AttributeRepositoryError> {
        let mut state = self.state();
        let id = IngredientId::new(next_id(&mut state.last_ingredient_id))
            .map_err(|err| AttributeRepositoryError::query(err.to_string()))?;
        let ingredient = Ingredient {
            id,
            owner: owner.clone(),
            name: name.clone(),
        };
        state.ingredients.insert(id, ingredient.clone());
        Ok(ingredient)
    }

    async fn find_many(
        &self,
        owner: &UserId,
        ids: &[IngredientId],
    ) -> Result<Vec<Ingredient>, AttributeRepositoryError> {
        let state = self.state();
        Ok(ids
            .iter()
            .filter_map(|id| state.ingredients.get(id))
            .filter(|ingredient| &ingredient.owner == owner)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RecipeRepository for InMemoryStore {
    async fn list(
        &self,
        owner: &UserId,
        filter: &RecipeFilter,
    ) -> Result<Vec<Recipe>, RecipeRepositoryError> {
        let state = self.state();
        Ok(state
            .recipes
            .iter()
            .filter(|(_, stored)| &stored.owner == owner)
            .map(|(id, stored)| state.resolve(*id, stored))
            .filter(|recipe| filter.matches(recipe))
            .collect())
    }

    async fn find(
        &self,
        owner: &UserId,
        id: RecipeId,
    ) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let state = self.state();
        Ok(state
            .owned_recipe(owner, id)
            .map(|stored| state.resolve(id, stored)))
    }

    async fn create(
        &self,
        owner: &UserId,
        draft: &RecipeDraft,
    ) -> Result<Recipe, RecipeRepositoryError> {
        let mut state = self.state();
        let id = RecipeId::new(next_id(&mut state.last_recipe_id))
            .map_err(|err| RecipeRepositoryError::query(err.to_string()))?;
        let stored = StoredRecipe {
            owner: owner.clone(),
            draft: draft.clone(),
            image: None,
        };
        let recipe = state.resolve(id, &stored);
        state.recipes.insert(id, stored);
        Ok(recipe)
    }

    async fn update(
        &self,
        owner: &UserId,
        id: RecipeId,
        draft: &RecipeDraft,
    ) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let mut state = self.state();
        let Some(stored) = state
            .recipes
            .get_mut(&id)
            .filter(|stored| &stored.owner == owner)
        else {
            return Ok(None);
        };
        stored.draft = draft.clone();
        let snapshot = stored.clone();
        Ok(Some(state.resolve(id, &snapshot)))
    }

    async fn set_image(
        &self,
        owner: &UserId,
        id: RecipeId,
        image: &str,
    ) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let mut state = self.state();
        let Some(stored) = state
            .recipes
            .get_mut(&id)
            .filter(|stored| &stored.owner == owner)
        else {
            return Ok(None);
        };
        stored.image = Some(image.to_owned());
        let snapshot = stored.clone();
        Ok(Some(state.resolve(id, &snapshot)))
    }

    async fn delete(&self, owner: &UserId, id: RecipeId) -> Result<bool, RecipeRepositoryError> {
        let mut state = self.state();
        if state.owned_recipe(owner, id).is_none() {
            return Ok(false);
        }
        Ok(state.recipes.remove(&id).is_some())
    }
}

/// Image store keeping uploads in memory, keyed by media-relative path.
#[derive(Debug, Default)]
pub struct InMemoryRecipeImageStore {
    files: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryRecipeImageStore {
    /// Contents stored at `path`, if any.
    pub fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
    }
}

#[async_trait]
impl RecipeImageStore for InMemoryRecipeImageStore {
    async fn store(&self, path: &str, bytes: &[u8]) -> Result<(), ImageStoreError> {
        if path.split('/').any(|segment| segment == ".." || segment.is_empty()) {
            return Err(ImageStoreError::invalid_path(path));
        }
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.to_owned(), bytes.to_vec());
        Ok(())
    }

    async fn remove(&self, path: &str) -> Result<(), ImageStoreError> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests;
