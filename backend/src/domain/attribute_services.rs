//! Tag and ingredient services.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    AttributeRepositoryError, IngredientRepository, IngredientService, TagRepository, TagService,
};
use crate::domain::{AttributeName, Error, Ingredient, Tag, UserId};

pub(crate) fn map_attribute_error(error: AttributeRepositoryError) -> Error {
    match error {
        AttributeRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("attribute repository unavailable: {message}"))
        }
        AttributeRepositoryError::Query { message } => {
            Error::internal(format!("attribute repository error: {message}"))
        }
    }
}

/// Service implementing [`TagService`].
#[derive(Clone)]
pub struct TagsService<R> {
    tags: Arc<R>,
}

impl<R> TagsService<R> {
    /// Create a service backed by `tags`.
    pub fn new(tags: Arc<R>) -> Self {
        Self { tags }
    }
}

#[async_trait]
impl<R: TagRepository> TagService for TagsService<R> {
    async fn list_tags(&self, owner: &UserId, assigned_only: bool) -> Result<Vec<Tag>, Error> {
        self.tags
            .list(owner, assigned_only)
            .await
            .map_err(map_attribute_error)
    }

    async fn create_tag(&self, owner: &UserId, name: AttributeName) -> Result<Tag, Error> {
        let tag = self
            .tags
            .create(owner, &name)
            .await
            .map_err(map_attribute_error)?;
        info!(tag_id = %tag.id, user_id = %owner, "tag created");
        Ok(tag)
    }
}

/// Service implementing [`IngredientService`].
#[derive(Clone)]
pub struct IngredientsService<R> {
    ingredients: Arc<R>,
}

impl<R> IngredientsService<R> {
    /// Create a service backed by `ingredients`.
    pub fn new(ingredients: Arc<R>) -> Self {
        Self { ingredients }
    }
}

#[async_trait]
impl<R: IngredientRepository> IngredientService for IngredientsService<R> {
    async fn list_ingredients(
        &self,
        owner: &UserId,
        assigned_only: bool,
    ) -> Result<Vec<Ingredient>, Error> {
        self.ingredients
            .list(owner, assigned_only)
            .await
            .map_err(map_attribute_error)
    }

    async fn create_ingredient(
        &self,
        owner: &UserId,
        name: AttributeName,
    ) -> Result<Ingredient, Error> {
        let ingredient = self
            .ingredients
            .create(owner, &name)
            .await
            .map_err(map_attribute_error)?;
        info!(ingredient_id = %ingredient.id, user_id = %owner, "ingredient created");
        Ok(ingredient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockIngredientRepository, MockTagRepository};
    use crate::domain::{ErrorCode, IngredientId, TagId};
    use rstest::rstest;

    fn tag(owner: &UserId, id: i64, name: &str) -> Tag {
        Tag {
            id: TagId::new(id).expect("id"),
            owner: owner.clone(),
            name: AttributeName::new(name).expect("name"),
        }
    }

    #[tokio::test]
    async fn list_tags_forwards_owner_and_flag() {
        let owner = UserId::random();
        let expected = vec![tag(&owner, 2, "Vegan"), tag(&owner, 1, "Dessert")];
        let returned = expected.clone();
        let expected_owner = owner.clone();
        let mut repo = MockTagRepository::new();
        repo.expect_list()
            .withf(move |user, assigned_only| user == &expected_owner && *assigned_only)
            .times(1)
            .return_once(move |_, _| Ok(returned));
        let service = TagsService::new(Arc::new(repo));

        let tags = service.list_tags(&owner, true).await.expect("tags listed");

        assert_eq!(tags, expected);
    }

    #[tokio::test]
    async fn create_tag_returns_stored_tag() {
        let owner = UserId::random();
        let stored = tag(&owner, 7, "Breakfast");
        let returned = stored.clone();
        let mut repo = MockTagRepository::new();
        repo.expect_create()
            .withf(|_, name| name.as_ref() == "Breakfast")
            .return_once(move |_, _| Ok(returned));
        let service = TagsService::new(Arc::new(repo));

        let created = service
            .create_tag(&owner, AttributeName::new("Breakfast").expect("name"))
            .await
            .expect("tag created");

        assert_eq!(created, stored);
    }

    #[rstest]
    #[case(AttributeRepositoryError::connection("down"), ErrorCode::ServiceUnavailable)]
    #[case(AttributeRepositoryError::query("bad sql"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn ingredient_failures_are_mapped(
        #[case] failure: AttributeRepositoryError,
        #[case] expected: ErrorCode,
    ) {
        let mut repo = MockIngredientRepository::new();
        repo.expect_list().return_once(move |_, _| Err(failure));
        let service = IngredientsService::new(Arc::new(repo));

        let error = service
            .list_ingredients(&UserId::random(), false)
            .await
            .expect_err("failure propagates");

        assert_eq!(error.code(), expected);
    }

    #[tokio::test]
    async fn create_ingredient_returns_stored_ingredient() {
        let owner = UserId::random();
        let stored = Ingredient {
            id: IngredientId::new(3).expect("id"),
            owner: owner.clone(),
            name: AttributeName::new("Kale").expect("name"),
        };
        let returned = stored.clone();
        let mut repo = MockIngredientRepository::new();
        repo.expect_create().return_once(move |_, _| Ok(returned));
        let service = IngredientsService::new(Arc::new(repo));

        let created = service
            .create_ingredient(&owner, AttributeName::new("Kale").expect("name"))
            .await
            .expect("ingredient created");

        assert_eq!(created, stored);
    }
}
