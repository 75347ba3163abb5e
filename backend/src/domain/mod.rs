//! Domain primitives, aggregates and services.
//!
//! Purpose: define the strongly typed entities shared by the HTTP and
//! persistence layers, and the services implementing the driving ports.
//! Types validate on construction so adapters never see malformed values.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and its stable identifier.
//! - User, Email, UserName, Password: accounts and their credentials.
//! - AuthToken, LoginCredentials: token authentication.
//! - Tag, Ingredient, AttributeName: per-user recipe attributes.
//! - Recipe and its value types, plus `recipe_image_path`.
//! - Services: `UserAccountsService`, `TagsService`, `IngredientsService`,
//!   `RecipesService`.

pub mod attribute_services;
pub mod attributes;
pub mod auth;
pub mod error;
pub mod ids;
pub mod password;
pub mod ports;
pub mod recipe;
pub mod recipe_image;
pub mod recipes_service;
pub mod trace_id;
pub mod user;
pub mod user_accounts_service;

pub use self::attribute_services::{IngredientsService, TagsService};
pub use self::attributes::{
    ATTRIBUTE_NAME_MAX, AttributeName, AttributeNameError, Ingredient, Tag,
    sort_by_name_descending,
};
pub use self::auth::{AuthToken, LoginCredentials, LoginValidationError, TokenDigest};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::ids::{IngredientId, InvalidIdError, RecipeId, TagId};
pub use self::password::{PASSWORD_MIN, Password, PasswordError, PasswordHash};
pub use self::recipe::{
    CookingTime, PRICE_MAX_CENTS, Price, RECIPE_LINK_MAX, RECIPE_TITLE_MAX, Recipe,
    RecipeChanges, RecipeDraft, RecipeFilter, RecipeLink, RecipeTitle, RecipeValidationError,
};
pub use self::recipe_image::{
    ImageNameError, RECIPE_IMAGE_DIR, recipe_image_path, recipe_image_path_with,
};
pub use self::recipes_service::RecipesService;
pub use self::trace_id::TraceId;
pub use self::user::{
    EMAIL_MAX, Email, USER_NAME_MAX, User, UserFlags, UserId, UserName, UserRole,
    UserValidationError,
};
pub use self::user_accounts_service::UserAccountsService;
