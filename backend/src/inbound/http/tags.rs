//! Tag API handlers.
//!
//! ```text
//! GET  /api/recipe/tags/?assigned_only=1
//! POST /api/recipe/tags/ {"name":"Vegan"}
//! ```

use actix_web::{HttpResponse, get, post, web};

use crate::inbound::http::ApiResult;
use crate::inbound::http::attributes::{AssignedOnlyQuery, AttributeRequest, AttributeResponse};
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// List the caller's tags, name descending.
#[utoipa::path(
    get,
    path = "/api/recipe/tags/",
    params(AssignedOnlyQuery),
    responses(
        (status = 200, description = "Tags", body = [AttributeResponse]),
        (status = 400, description = "Invalid query", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["recipe"],
    operation_id = "listTags"
)]
#[get("/recipe/tags/")]
pub async fn list_tags(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    query: web::Query<AssignedOnlyQuery>,
) -> ApiResult<web::Json<Vec<AttributeResponse>>> {
    let assigned_only = query.flag()?;
    let tags = state.tags.list_tags(user.id(), assigned_only).await?;
    Ok(web::Json(
        tags.into_iter().map(AttributeResponse::from).collect(),
    ))
}

/// Create a tag owned by the caller.
#[utoipa::path(
    post,
    path = "/api/recipe/tags/",
    request_body = AttributeRequest,
    responses(
        (status = 201, description = "Tag created", body = AttributeResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["recipe"],
    operation_id = "createTag"
)]
#[post("/recipe/tags/")]
pub async fn create_tag(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<AttributeRequest>,
) -> ApiResult<HttpResponse> {
    let name = payload.into_inner().into_name()?;
    let tag = state.tags.create_tag(user.id(), name).await?;
    Ok(HttpResponse::Created().json(AttributeResponse::from(tag)))
}
