//! PostgreSQL-backed `RecipeRepository` implementation using Diesel ORM.
//!
//! Recipe rows and their link rows are written in one transaction. Reads load
//! the recipe rows first and then resolve tags and ingredients for the whole
//! batch with two joins, so listing costs three queries regardless of size.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};
use tracing::warn;

use crate::domain::ports::{RecipeRepository, RecipeRepositoryError};
use crate::domain::{
    CookingTime, Ingredient, Price, Recipe, RecipeDraft, RecipeFilter, RecipeId, RecipeLink,
    RecipeTitle, Tag, UserId,
};

use super::diesel_attribute_repositories::{DieselIngredientRepository, DieselTagRepository};
use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{
    IngredientRow, NewRecipeRow, RecipeIngredientRow, RecipeRow, RecipeTagRow, RecipeUpdate,
    TagRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{ingredients, recipe_ingredients, recipe_tags, recipes, tags};

/// Diesel-backed implementation of the `RecipeRepository` port.
#[derive(Clone)]
pub struct DieselRecipeRepository {
    pool: DbPool,
}

impl DieselRecipeRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RecipeRepositoryError {
    map_basic_pool_error(error, RecipeRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> RecipeRepositoryError {
    map_basic_diesel_error(
        error,
        RecipeRepositoryError::query,
        RecipeRepositoryError::connection,
    )
}

fn corrupt_row(id: i64, reason: impl std::fmt::Display) -> RecipeRepositoryError {
    warn!(recipe_id = id, %reason, "stored recipe row failed validation");
    RecipeRepositoryError::query(format!("recipe row {id} is invalid: {reason}"))
}

/// Column values for the writable recipe fields.
struct DraftColumns<'a> {
    title: &'a str,
    time_minutes: i32,
    price_cents: i32,
    link: &'a str,
}

impl<'a> DraftColumns<'a> {
    fn from_draft(draft: &'a RecipeDraft) -> Result<Self, RecipeRepositoryError> {
        let time_minutes = i32::try_from(draft.time_minutes.minutes())
            .map_err(|_| RecipeRepositoryError::query("time_minutes exceeds column range"))?;
        let price_cents = i32::try_from(draft.price.cents())
            .map_err(|_| RecipeRepositoryError::query("price exceeds column range"))?;
        Ok(Self {
            title: draft.title.as_ref(),
            time_minutes,
            price_cents,
            link: draft.link.as_ref(),
        })
    }
}

type TagLinks = HashMap<i64, Vec<TagRow>>;
type IngredientLinks = HashMap<i64, Vec<IngredientRow>>;

async fn load_links(
    conn: &mut AsyncPgConnection,
    recipe_ids: &[i64],
) -> Result<(TagLinks, IngredientLinks), diesel::result::Error> {
    let tag_rows: Vec<(i64, TagRow)> = recipe_tags::table
        .inner_join(tags::table)
        .filter(recipe_tags::recipe_id.eq_any(recipe_ids.to_vec()))
        .select((recipe_tags::recipe_id, TagRow::as_select()))
        .order_by(tags::id.asc())
        .load(conn)
        .await?;
    let ingredient_rows: Vec<(i64, IngredientRow)> = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq_any(recipe_ids.to_vec()))
        .select((recipe_ingredients::recipe_id, IngredientRow::as_select()))
        .order_by(ingredients::id.asc())
        .load(conn)
        .await?;

    let mut tag_links = TagLinks::new();
    for (recipe_id, row) in tag_rows {
        tag_links.entry(recipe_id).or_default().push(row);
    }
    let mut ingredient_links = IngredientLinks::new();
    for (recipe_id, row) in ingredient_rows {
        ingredient_links.entry(recipe_id).or_default().push(row);
    }
    Ok((tag_links, ingredient_links))
}

async fn replace_links(
    conn: &mut AsyncPgConnection,
    recipe_id: i64,
    draft: &RecipeDraft,
) -> Result<(), diesel::result::Error> {
    diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(recipe_id)))
        .execute(conn)
        .await?;
    diesel::delete(recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe_id)))
        .execute(conn)
        .await?;

    let tag_rows: Vec<RecipeTagRow> = draft
        .tags
        .iter()
        .map(|tag| RecipeTagRow {
            recipe_id,
            tag_id: tag.get(),
        })
        .collect();
    if !tag_rows.is_empty() {
        diesel::insert_into(recipe_tags::table)
            .values(&tag_rows)
            .on_conflict_do_nothing()
            .execute(conn)
            .await?;
    }

    let ingredient_rows: Vec<RecipeIngredientRow> = draft
        .ingredients
        .iter()
        .map(|ingredient| RecipeIngredientRow {
            recipe_id,
            ingredient_id: ingredient.get(),
        })
        .collect();
    if !ingredient_rows.is_empty() {
        diesel::insert_into(recipe_ingredients::table)
            .values(&ingredient_rows)
            .on_conflict_do_nothing()
            .execute(conn)
            .await?;
    }
    Ok(())
}

fn row_to_recipe(
    row: RecipeRow,
    tag_rows: Vec<TagRow>,
    ingredient_rows: Vec<IngredientRow>,
) -> Result<Recipe, RecipeRepositoryError> {
    let id = RecipeId::new(row.id).map_err(|err| corrupt_row(row.id, err))?;
    let title = RecipeTitle::new(&row.title).map_err(|err| corrupt_row(row.id, err))?;
    let time_minutes =
        CookingTime::new(i64::from(row.time_minutes)).map_err(|err| corrupt_row(row.id, err))?;
    let price = u32::try_from(row.price_cents)
        .map_err(|err| corrupt_row(row.id, err))
        .and_then(|cents| Price::from_cents(cents).map_err(|err| corrupt_row(row.id, err)))?;
    let link = RecipeLink::new(&row.link).map_err(|err| corrupt_row(row.id, err))?;
    let tags = tag_rows
        .into_iter()
        .map(DieselTagRepository::to_domain)
        .collect::<Result<Vec<Tag>, _>>()
        .map_err(|err| corrupt_row(row.id, err))?;
    let ingredients = ingredient_rows
        .into_iter()
        .map(DieselIngredientRepository::to_domain)
        .collect::<Result<Vec<Ingredient>, _>>()
        .map_err(|err| corrupt_row(row.id, err))?;

    Ok(Recipe {
        id,
        owner: UserId::from_uuid(row.user_id),
        title,
        time_minutes,
        price,
        link,
        tags,
        ingredients,
        image: row.image,
    })
}

/// Resolve attributes for a batch of recipe rows, keeping row order.
async fn resolve_rows(
    conn: &mut AsyncPgConnection,
    rows: Vec<RecipeRow>,
) -> Result<Vec<Recipe>, RecipeRepositoryError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
    let (mut tag_links, mut ingredient_links) =
        load_links(conn, &ids).await.map_err(map_diesel_error)?;

    rows.into_iter()
        .map(|row| {
            let tags = tag_links.remove(&row.id).unwrap_or_default();
            let ingredients = ingredient_links.remove(&row.id).unwrap_or_default();
            row_to_recipe(row, tags, ingredients)
        })
        .collect()
}

async fn resolve_row(
    conn: &mut AsyncPgConnection,
    row: Option<RecipeRow>,
) -> Result<Option<Recipe>, RecipeRepositoryError> {
    let Some(row) = row else {
        return Ok(None);
    };
    Ok(resolve_rows(conn, vec![row]).await?.into_iter().next())
}

#[async_trait]
impl RecipeRepository for DieselRecipeRepository {
    async fn list(
        &self,
        owner: &UserId,
        filter: &RecipeFilter,
    ) -> Result<Vec<Recipe>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = recipes::table
            .filter(recipes::user_id.eq(*owner.as_uuid()))
            .select(RecipeRow::as_select())
            .order_by(recipes::id.asc())
            .into_boxed();
        if !filter.tags.is_empty() {
            let tag_ids: Vec<i64> = filter.tags.iter().map(|id| id.get()).collect();
            query = query.filter(
                recipes::id.eq_any(
                    recipe_tags::table
                        .filter(recipe_tags::tag_id.eq_any(tag_ids))
                        .select(recipe_tags::recipe_id),
                ),
            );
        }
        if !filter.ingredients.is_empty() {
            let ingredient_ids: Vec<i64> = filter.ingredients.iter().map(|id| id.get()).collect();
            query = query.filter(
                recipes::id.eq_any(
                    recipe_ingredients::table
                        .filter(recipe_ingredients::ingredient_id.eq_any(ingredient_ids))
                        .select(recipe_ingredients::recipe_id),
                ),
            );
        }
        let rows: Vec<RecipeRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;

        resolve_rows(&mut conn, rows).await
    }

    async fn find(
        &self,
        owner: &UserId,
        id: RecipeId,
    ) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<RecipeRow> = recipes::table
            .filter(recipes::id.eq(id.get()))
            .filter(recipes::user_id.eq(*owner.as_uuid()))
            .select(RecipeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        resolve_row(&mut conn, row).await
    }

    async fn create(
        &self,
        owner: &UserId,
        draft: &RecipeDraft,
    ) -> Result<Recipe, RecipeRepositoryError> {
        let columns = DraftColumns::from_draft(draft)?;
        let new_row = NewRecipeRow {
            user_id: *owner.as_uuid(),
            title: columns.title,
            time_minutes: columns.time_minutes,
            price_cents: columns.price_cents,
            link: columns.link,
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: RecipeRow = conn
            .transaction(|conn| {
                async move {
                    let row: RecipeRow = diesel::insert_into(recipes::table)
                        .values(&new_row)
                        .returning(RecipeRow::as_returning())
                        .get_result(conn)
                        .await?;
                    replace_links(conn, row.id, draft).await?;
                    Ok(row)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        let id = row.id;
        resolve_row(&mut conn, Some(row))
            .await?
            .ok_or_else(|| RecipeRepositoryError::query(format!("recipe {id} vanished")))
    }

    async fn update(
        &self,
        owner: &UserId,
        id: RecipeId,
        draft: &RecipeDraft,
    ) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let columns = DraftColumns::from_draft(draft)?;
        let changes = RecipeUpdate {
            title: columns.title,
            time_minutes: columns.time_minutes,
            price_cents: columns.price_cents,
            link: columns.link,
        };
        let owner_uuid = *owner.as_uuid();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<RecipeRow> = conn
            .transaction(|conn| {
                async move {
                    let row: Option<RecipeRow> = diesel::update(
                        recipes::table
                            .filter(recipes::id.eq(id.get()))
                            .filter(recipes::user_id.eq(owner_uuid)),
                    )
                    .set(&changes)
                    .returning(RecipeRow::as_returning())
                    .get_result(conn)
                    .await
                    .optional()?;
                    if let Some(updated) = &row {
                        replace_links(conn, updated.id, draft).await?;
                    }
                    Ok(row)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        resolve_row(&mut conn, row).await
    }

    async fn set_image(
        &self,
        owner: &UserId,
        id: RecipeId,
        image: &str,
    ) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<RecipeRow> = diesel::update(
            recipes::table
                .filter(recipes::id.eq(id.get()))
                .filter(recipes::user_id.eq(*owner.as_uuid())),
        )
        .set(recipes::image.eq(Some(image)))
        .returning(RecipeRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        resolve_row(&mut conn, row).await
    }

    async fn delete(&self, owner: &UserId, id: RecipeId) -> Result<bool, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(
            recipes::table
                .filter(recipes::id.eq(id.get()))
                .filter(recipes::user_id.eq(*owner.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use uuid::Uuid;

    fn recipe_row(time_minutes: i32, price_cents: i32) -> RecipeRow {
        RecipeRow {
            id: 8,
            user_id: Uuid::new_v4(),
            title: "Steak and mushroom sauce".to_owned(),
            time_minutes,
            price_cents,
            link: String::new(),
            image: Some("uploads/recipe/a.jpg".to_owned()),
        }
    }

    #[rstest]
    fn rows_resolve_with_attributes() {
        let row = recipe_row(60, 2_000);
        let owner = row.user_id;
        let tags = vec![TagRow {
            id: 2,
            user_id: owner,
            name: "Dinner".to_owned(),
        }];

        let recipe = row_to_recipe(row, tags, Vec::new()).expect("valid row");

        assert_eq!(recipe.price.to_string(), "20.00");
        assert_eq!(recipe.tags.len(), 1);
        assert_eq!(recipe.image.as_deref(), Some("uploads/recipe/a.jpg"));
    }

    #[rstest]
    #[case(0, 100)]
    #[case(10, -1)]
    #[case(10, 100_000)]
    fn out_of_range_rows_are_query_errors(#[case] time_minutes: i32, #[case] price_cents: i32) {
        let error = row_to_recipe(recipe_row(time_minutes, price_cents), Vec::new(), Vec::new())
            .expect_err("invalid row");

        assert!(matches!(error, RecipeRepositoryError::Query { .. }));
    }
}
