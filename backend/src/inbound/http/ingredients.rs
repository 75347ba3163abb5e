//! Ingredient API handlers.
//!
//! ```text
//! GET  /api/recipe/ingredients/?assigned_only=1
//! POST /api/recipe/ingredients/ {"name":"Kale"}
//! ```

use actix_web::{HttpResponse, get, post, web};

use crate::inbound::http::ApiResult;
use crate::inbound::http::attributes::{AssignedOnlyQuery, AttributeRequest, AttributeResponse};
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// List the caller's ingredients, name descending.
#[utoipa::path(
    get,
    path = "/api/recipe/ingredients/",
    params(AssignedOnlyQuery),
    responses(
        (status = 200, description = "Ingredients", body = [AttributeResponse]),
        (status = 400, description = "Invalid query", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["recipe"],
    operation_id = "listIngredients"
)]
#[get("/recipe/ingredients/")]
pub async fn list_ingredients(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    query: web::Query<AssignedOnlyQuery>,
) -> ApiResult<web::Json<Vec<AttributeResponse>>> {
    let assigned_only = query.flag()?;
    let ingredients = state
        .ingredients
        .list_ingredients(user.id(), assigned_only)
        .await?;
    Ok(web::Json(
        ingredients
            .into_iter()
            .map(AttributeResponse::from)
            .collect(),
    ))
}

/// Create an ingredient owned by the caller.
#[utoipa::path(
    post,
    path = "/api/recipe/ingredients/",
    request_body = AttributeRequest,
    responses(
        (status = 201, description = "Ingredient created", body = AttributeResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["recipe"],
    operation_id = "createIngredient"
)]
#[post("/recipe/ingredients/")]
pub async fn create_ingredient(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<AttributeRequest>,
) -> ApiResult<HttpResponse> {
    let name = payload.into_inner().into_name()?;
    let ingredient = state.ingredients.create_ingredient(user.id(), name).await?;
    Ok(HttpResponse::Created().json(AttributeResponse::from(ingredient)))
}
