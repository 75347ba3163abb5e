//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST endpoint, the request and response
//! bodies, and the domain error wrappers from
//! [`crate::inbound::http::schemas`]. The document backs Swagger UI in debug
//! builds and is exported by `cargo run --bin openapi-dump`.

use crate::inbound::http::attributes::{AttributeRequest, AttributeResponse};
use crate::inbound::http::recipes::{
    RecipeDetailResponse, RecipeImageResponse, RecipeRequest, RecipeResponse,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::{TokenRequest, TokenResponse, UserRequest, UserResponse};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name of the token security scheme.
pub const TOKEN_AUTH_SCHEME: &str = "TokenAuth";

/// Enrich the generated document with the token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            TOKEN_AUTH_SCHEME,
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "Authorization",
                "`Token <key>` as issued by POST /api/user/token/.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Recipe API",
        description = "Accounts, tags, ingredients and recipes with token authentication."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("TokenAuth" = [])),
    paths(
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::create_token,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::replace_current_user,
        crate::inbound::http::users::update_current_user,
        crate::inbound::http::tags::list_tags,
        crate::inbound::http::tags::create_tag,
        crate::inbound::http::ingredients::list_ingredients,
        crate::inbound::http::ingredients::create_ingredient,
        crate::inbound::http::recipes::list_recipes,
        crate::inbound::http::recipes::create_recipe,
        crate::inbound::http::recipes::get_recipe,
        crate::inbound::http::recipes::replace_recipe,
        crate::inbound::http::recipes::update_recipe,
        crate::inbound::http::recipes::delete_recipe,
        crate::inbound::http::recipes::upload_recipe_image,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        UserRequest,
        UserResponse,
        TokenRequest,
        TokenResponse,
        AttributeRequest,
        AttributeResponse,
        RecipeRequest,
        RecipeResponse,
        RecipeDetailResponse,
        RecipeImageResponse,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "user", description = "Accounts and authentication tokens"),
        (name = "recipe", description = "Recipes, tags and ingredients"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
