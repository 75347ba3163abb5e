//! Route table for the REST API.
//!
//! ```text
//! /api/user/...            accounts and tokens
//! /api/recipe/tags/        tags
//! /api/recipe/ingredients/ ingredients
//! /api/recipe/recipes/...  recipes and image uploads
//! /health/{ready,live}     probes
//! ```
//!
//! Body and query extraction failures are reported with the same error
//! envelope as domain validation failures.

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::{HttpRequest, web};

use crate::domain::Error;
use crate::inbound::http::health::{live, ready};
use crate::inbound::http::ingredients::{create_ingredient, list_ingredients};
use crate::inbound::http::recipes::{
    create_recipe, delete_recipe, get_recipe, list_recipes, replace_recipe, update_recipe,
    upload_recipe_image,
};
use crate::inbound::http::tags::{create_tag, list_tags};
use crate::inbound::http::users::{
    create_token, create_user, current_user, replace_current_user, update_current_user,
};

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = match &err {
        JsonPayloadError::ContentType => "expected an application/json body".to_owned(),
        other => format!("invalid JSON body: {other}"),
    };
    Error::invalid_request(message).into()
}

fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request(format!("invalid query string: {err}")).into()
}

/// Mount the `/api` scope and the health probes.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    let api = web::scope("/api")
        .app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .service(create_user)
        .service(create_token)
        .service(current_user)
        .service(replace_current_user)
        .service(update_current_user)
        .service(list_tags)
        .service(create_tag)
        .service(list_ingredients)
        .service(create_ingredient)
        .service(list_recipes)
        .service(create_recipe)
        .service(get_recipe)
        .service(replace_recipe)
        .service(update_recipe)
        .service(delete_recipe)
        .service(upload_recipe_image);

    cfg.service(api).service(ready).service(live);
}
