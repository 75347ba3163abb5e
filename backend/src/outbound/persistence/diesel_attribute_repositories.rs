//! PostgreSQL-backed tag and ingredient repositories.
//!
//! Both tables share a shape (`id`, `user_id`, `name`) and a link table to
//! recipes, so one macro generates both adapters.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{AttributeRepositoryError, IngredientRepository, TagRepository};
use crate::domain::{AttributeName, Ingredient, IngredientId, Tag, TagId, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{IngredientRow, NewIngredientRow, NewTagRow, TagRow};
use super::pool::{DbPool, PoolError};
use super::schema::{ingredients, recipe_ingredients, recipe_tags, tags};

fn map_pool_error(error: PoolError) -> AttributeRepositoryError {
    map_basic_pool_error(error, AttributeRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> AttributeRepositoryError {
    map_basic_diesel_error(
        error,
        AttributeRepositoryError::query,
        AttributeRepositoryError::connection,
    )
}

fn corrupt_row(table: &str, id: i64, reason: String) -> AttributeRepositoryError {
    warn!(table, id, %reason, "stored attribute row failed validation");
    AttributeRepositoryError::query(format!("{table} row {id} is invalid: {reason}"))
}

macro_rules! diesel_attribute_repository {
    (
        $(#[$meta:meta])*
        $repo:ident implements $port:ident for $entity:ident ($id:ident) {
            table: $table:ident,
            links: $links:ident.$link_column:ident,
            row: $row:ident,
            new_row: $new_row:ident $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $repo {
            pool: DbPool,
        }

        impl $repo {
            /// Create a new repository with the given connection pool.
            pub fn new(pool: DbPool) -> Self {
                Self { pool }
            }

            pub(super) fn to_domain(row: $row) -> Result<$entity, AttributeRepositoryError> {
                let table = stringify!($table);
                let id = $id::new(row.id)
                    .map_err(|err| corrupt_row(table, row.id, err.to_string()))?;
                let name = AttributeName::new(&row.name)
                    .map_err(|err| corrupt_row(table, row.id, err.to_string()))?;
                Ok($entity {
                    id,
                    owner: UserId::from_uuid(row.user_id),
                    name,
                })
            }
        }

        #[async_trait]
        impl $port for $repo {
            async fn list(
                &self,
                owner: &UserId,
                assigned_only: bool,
            ) -> Result<Vec<$entity>, AttributeRepositoryError> {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;

                let mut query = $table::table
                    .filter($table::user_id.eq(*owner.as_uuid()))
                    .select($row::as_select())
                    .order_by(($table::name.desc(), $table::id.desc()))
                    .into_boxed();
                if assigned_only {
                    query = query
                        .filter($table::id.eq_any($links::table.select($links::$link_column)));
                }
                let rows: Vec<$row> = query.load(&mut conn).await.map_err(map_diesel_error)?;

                rows.into_iter().map(Self::to_domain).collect()
            }

            async fn create(
                &self,
                owner: &UserId,
                name: &AttributeName,
            ) -> Result<$entity, AttributeRepositoryError> {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let new_row = $new_row {
                    user_id: *owner.as_uuid(),
                    name: name.as_ref(),
                };

                let row: $row = diesel::insert_into($table::table)
                    .values(&new_row)
                    .returning($row::as_returning())
                    .get_result(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;

                Self::to_domain(row)
            }

            async fn find_many(
                &self,
                owner: &UserId,
                ids: &[$id],
            ) -> Result<Vec<$entity>, AttributeRepositoryError> {
                if ids.is_empty() {
                    return Ok(Vec::new());
                }
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let raw_ids: Vec<i64> = ids.iter().map(|id| id.get()).collect();

                let rows: Vec<$row> = $table::table
                    .filter($table::user_id.eq(*owner.as_uuid()))
                    .filter($table::id.eq_any(raw_ids))
                    .select($row::as_select())
                    .order_by($table::id.asc())
                    .load(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;

                rows.into_iter().map(Self::to_domain).collect()
            }
        }
    };
}

diesel_attribute_repository! {
    /// Diesel-backed implementation of the `TagRepository` port.
    DieselTagRepository implements TagRepository for Tag (TagId) {
        table: tags,
        links: recipe_tags.tag_id,
        row: TagRow,
        new_row: NewTagRow,
    }
}

diesel_attribute_repository! {
    /// Diesel-backed implementation of the `IngredientRepository` port.
    DieselIngredientRepository implements IngredientRepository for Ingredient (IngredientId) {
        table: ingredients,
        links: recipe_ingredients.ingredient_id,
        row: IngredientRow,
        new_row: NewIngredientRow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use uuid::Uuid;

    #[rstest]
    fn tag_rows_convert_to_tags() {
        let owner = Uuid::new_v4();
        let tag = DieselTagRepository::to_domain(TagRow {
            id: 4,
            user_id: owner,
            name: "Vegan".to_owned(),
        })
        .expect("valid row");

        assert_eq!(tag.id.get(), 4);
        assert_eq!(tag.owner, UserId::from_uuid(owner));
        assert_eq!(tag.name.as_ref(), "Vegan");
    }

    #[rstest]
    #[case(0, "Kale")]
    #[case(3, "   ")]
    fn invalid_ingredient_rows_are_query_errors(#[case] id: i64, #[case] name: &str) {
        let error = DieselIngredientRepository::to_domain(IngredientRow {
            id,
            user_id: Uuid::new_v4(),
            name: name.to_owned(),
        })
        .expect_err("invalid row");

        assert!(matches!(error, AttributeRepositoryError::Query { .. }));
    }
}
