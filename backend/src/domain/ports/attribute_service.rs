//! Driving ports for tag and ingredient use-cases.

use async_trait::async_trait;

use crate::domain::{AttributeName, Error, Ingredient, Tag, UserId};

/// Tag use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagService: Send + Sync {
    /// The owner's tags, name descending.
    async fn list_tags(&self, owner: &UserId, assigned_only: bool) -> Result<Vec<Tag>, Error>;

    /// Create a tag for the owner.
    async fn create_tag(&self, owner: &UserId, name: AttributeName) -> Result<Tag, Error>;
}

/// Ingredient use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IngredientService: Send + Sync {
    /// The owner's ingredients, name descending.
    async fn list_ingredients(
        &self,
        owner: &UserId,
        assigned_only: bool,
    ) -> Result<Vec<Ingredient>, Error>;

    /// Create an ingredient for the owner.
    async fn create_ingredient(
        &self,
        owner: &UserId,
        name: AttributeName,
    ) -> Result<Ingredient, Error>;
}
