//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Lower-cased login email, unique via `users_email_key`.
        email -> Varchar,
        /// Optional display name; empty when unset.
        name -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Text,
        is_active -> Bool,
        is_staff -> Bool,
        is_superuser -> Bool,
        last_login -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// API tokens stored as SHA-256 digests, one row per login.
    auth_tokens (token_digest) {
        /// Hex-encoded SHA-256 of the token key.
        token_digest -> Bpchar,
        user_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Per-user recipe tags.
    tags (id) {
        id -> Int8,
        user_id -> Uuid,
        name -> Varchar,
    }
}

diesel::table! {
    /// Per-user recipe ingredients.
    ingredients (id) {
        id -> Int8,
        user_id -> Uuid,
        name -> Varchar,
    }
}

diesel::table! {
    /// Recipes owned by a user.
    recipes (id) {
        id -> Int8,
        user_id -> Uuid,
        title -> Varchar,
        time_minutes -> Int4,
        /// Price in cents, 0 to 99999.
        price_cents -> Int4,
        link -> Varchar,
        /// Media-relative image path.
        image -> Nullable<Varchar>,
    }
}

diesel::table! {
    /// Recipe to tag links.
    recipe_tags (recipe_id, tag_id) {
        recipe_id -> Int8,
        tag_id -> Int8,
    }
}

diesel::table! {
    /// Recipe to ingredient links.
    recipe_ingredients (recipe_id, ingredient_id) {
        recipe_id -> Int8,
        ingredient_id -> Int8,
    }
}

diesel::joinable!(auth_tokens -> users (user_id));
diesel::joinable!(tags -> users (user_id));
diesel::joinable!(ingredients -> users (user_id));
diesel::joinable!(recipes -> users (user_id));
diesel::joinable!(recipe_tags -> recipes (recipe_id));
diesel::joinable!(recipe_tags -> tags (tag_id));
diesel::joinable!(recipe_ingredients -> recipes (recipe_id));
diesel::joinable!(recipe_ingredients -> ingredients (ingredient_id));

diesel::allow_tables_to_appear_in_same_query!(
    auth_tokens,
    ingredients,
    recipe_ingredients,
    recipe_tags,
    recipes,
    tags,
    users,
);
