//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{
    auth_tokens, ingredients, recipe_ingredients, recipe_tags, recipes, tags, users,
};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

/// Insertable struct for creating user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub name: &'a str,
    pub password_hash: &'a str,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

/// Changeset struct for updating user records.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserUpdate<'a> {
    pub email: &'a str,
    pub name: &'a str,
    pub password_hash: &'a str,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

/// Insertable struct for the auth token upsert.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = auth_tokens)]
pub(crate) struct NewAuthTokenRow<'a> {
    pub user_id: Uuid,
    pub token_digest: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Row struct shared by tags and ingredients.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tags)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TagRow {
    pub id: i64,
    pub user_id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tags)]
pub(crate) struct NewTagRow<'a> {
    pub user_id: Uuid,
    pub name: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = ingredients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct IngredientRow {
    pub id: i64,
    pub user_id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = ingredients)]
pub(crate) struct NewIngredientRow<'a> {
    pub user_id: Uuid,
    pub name: &'a str,
}

/// Row struct for reading from the recipes table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RecipeRow {
    pub id: i64,
    pub user_id: Uuid,
    pub title: String,
    pub time_minutes: i32,
    pub price_cents: i32,
    pub link: String,
    pub image: Option<String>,
}

/// Insertable struct for creating recipe records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recipes)]
pub(crate) struct NewRecipeRow<'a> {
    pub user_id: Uuid,
    pub title: &'a str,
    pub time_minutes: i32,
    pub price_cents: i32,
    pub link: &'a str,
}

/// Changeset for the writable recipe columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = recipes)]
pub(crate) struct RecipeUpdate<'a> {
    pub title: &'a str,
    pub time_minutes: i32,
    pub price_cents: i32,
    pub link: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = recipe_tags)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RecipeTagRow {
    pub recipe_id: i64,
    pub tag_id: i64,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = recipe_ingredients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RecipeIngredientRow {
    pub recipe_id: i64,
    pub ingredient_id: i64,
}
