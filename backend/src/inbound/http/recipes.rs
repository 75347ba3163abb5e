//! Recipe API handlers.
//!
//! ```text
//! GET    /api/recipe/recipes/?tags=1,2&ingredients=3
//! POST   /api/recipe/recipes/
//! GET    /api/recipe/recipes/{id}/
//! PUT    /api/recipe/recipes/{id}/
//! PATCH  /api/recipe/recipes/{id}/
//! DELETE /api/recipe/recipes/{id}/
//! POST   /api/recipe/recipes/{id}/upload-image/
//! ```
//!
//! List and write responses carry tag and ingredient ids; the detail view
//! nests `{id, name}` objects instead. Prices travel as two-decimal strings
//! but clients may send either a string or a JSON number.

use actix_web::http::header::{self, ContentDisposition};
use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::ImageUpload;
use crate::domain::{
    CookingTime, Error, IngredientId, Price, Recipe, RecipeChanges, RecipeDraft, RecipeFilter,
    RecipeId, RecipeLink, RecipeTitle, TagId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::attributes::AttributeResponse;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_field_error, missing_field_error, parse_id_list, require,
};

const TITLE: FieldName = FieldName::new("title");
const TIME_MINUTES: FieldName = FieldName::new("time_minutes");
const PRICE: FieldName = FieldName::new("price");
const LINK: FieldName = FieldName::new("link");
const TAGS: FieldName = FieldName::new("tags");
const INGREDIENTS: FieldName = FieldName::new("ingredients");
const IMAGE: FieldName = FieldName::new("image");
const FILENAME: FieldName = FieldName::new("filename");

/// Price as sent by clients: `"5.50"` or `5.5`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PriceInput {
    /// Decimal string such as `"5.50"`.
    Text(String),
    /// JSON number such as `5.5`.
    Number(serde_json::Number),
}

impl PriceInput {
    fn parse(self) -> Result<Price, Error> {
        let raw = match self {
            Self::Text(text) => text,
            Self::Number(number) => number.to_string(),
        };
        raw.parse::<Price>()
            .map_err(|err| invalid_field_error(PRICE, err))
    }
}

/// Body for creating, replacing or patching a recipe.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct RecipeRequest {
    /// Recipe title.
    #[schema(example = "Chocolate cheesecake")]
    pub title: Option<String>,
    /// Preparation time in minutes.
    #[schema(example = 30)]
    pub time_minutes: Option<i64>,
    /// Price with at most two decimals.
    #[schema(value_type = Option<String>, example = "5.00")]
    pub price: Option<PriceInput>,
    /// Optional external URL.
    #[schema(example = "https://example.com/cheesecake")]
    pub link: Option<String>,
    /// Ids of the caller's tags.
    #[schema(example = json!([1, 2]))]
    pub tags: Option<Vec<i64>>,
    /// Ids of the caller's ingredients.
    #[schema(example = json!([3]))]
    pub ingredients: Option<Vec<i64>>,
}

fn parse_title(raw: String) -> Result<RecipeTitle, Error> {
    RecipeTitle::new(raw).map_err(|err| invalid_field_error(TITLE, err))
}

fn parse_time(raw: i64) -> Result<CookingTime, Error> {
    CookingTime::new(raw).map_err(|err| invalid_field_error(TIME_MINUTES, err))
}

fn parse_link(raw: String) -> Result<RecipeLink, Error> {
    RecipeLink::new(raw).map_err(|err| invalid_field_error(LINK, err))
}

fn parse_ids<T>(
    raw: Vec<i64>,
    field: FieldName,
    make: impl Fn(i64) -> Result<T, crate::domain::InvalidIdError>,
) -> Result<Vec<T>, Error> {
    raw.into_iter()
        .map(|id| make(id).map_err(|err| invalid_field_error(field, err)))
        .collect()
}

impl RecipeRequest {
    /// Every writable field; omitted optional fields reset to empty.
    pub(crate) fn into_draft(self) -> Result<RecipeDraft, Error> {
        let Self {
            title,
            time_minutes,
            price,
            link,
            tags,
            ingredients,
        } = self;
        Ok(RecipeDraft {
            title: parse_title(require(title, TITLE)?)?,
            time_minutes: parse_time(require(time_minutes, TIME_MINUTES)?)?,
            price: require(price, PRICE)?.parse()?,
            link: link.map(parse_link).transpose()?.unwrap_or_default(),
            tags: parse_ids(tags.unwrap_or_default(), TAGS, TagId::new)?,
            ingredients: parse_ids(
                ingredients.unwrap_or_default(),
                INGREDIENTS,
                IngredientId::new,
            )?,
        })
    }

    /// Only the provided fields.
    pub(crate) fn into_changes(self) -> Result<RecipeChanges, Error> {
        let Self {
            title,
            time_minutes,
            price,
            link,
            tags,
            ingredients,
        } = self;
        Ok(RecipeChanges {
            title: title.map(parse_title).transpose()?,
            time_minutes: time_minutes.map(parse_time).transpose()?,
            price: price.map(PriceInput::parse).transpose()?,
            link: link.map(parse_link).transpose()?,
            tags: tags
                .map(|ids| parse_ids(ids, TAGS, TagId::new))
                .transpose()?,
            ingredients: ingredients
                .map(|ids| parse_ids(ids, INGREDIENTS, IngredientId::new))
                .transpose()?,
        })
    }
}

/// List and write representation of a recipe.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecipeResponse {
    /// Identifier.
    #[schema(example = 1)]
    pub id: i64,
    /// Recipe title.
    #[schema(example = "Chocolate cheesecake")]
    pub title: String,
    /// Preparation time in minutes.
    #[schema(example = 30)]
    pub time_minutes: u32,
    /// Price as a two-decimal string.
    #[schema(example = "5.00")]
    pub price: String,
    /// External URL, empty when unset.
    #[schema(example = "")]
    pub link: String,
    /// Attached tag ids.
    pub tags: Vec<i64>,
    /// Attached ingredient ids.
    pub ingredients: Vec<i64>,
    /// Public URL of the uploaded image.
    #[schema(example = "/media/uploads/recipe/6f1c.jpg")]
    pub image: Option<String>,
}

impl RecipeResponse {
    fn from_recipe(recipe: Recipe, state: &HttpState) -> Self {
        Self {
            id: recipe.id.get(),
            title: recipe.title.as_ref().to_owned(),
            time_minutes: recipe.time_minutes.minutes(),
            price: recipe.price.to_string(),
            link: recipe.link.as_ref().to_owned(),
            tags: recipe.tags.iter().map(|tag| tag.id.get()).collect(),
            ingredients: recipe.ingredients.iter().map(|item| item.id.get()).collect(),
            image: recipe.image.as_deref().map(|path| state.media_url_for(path)),
        }
    }
}

/// Detail representation with nested tags and ingredients.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecipeDetailResponse {
    /// Identifier.
    #[schema(example = 1)]
    pub id: i64,
    /// Recipe title.
    #[schema(example = "Chocolate cheesecake")]
    pub title: String,
    /// Preparation time in minutes.
    #[schema(example = 30)]
    pub time_minutes: u32,
    /// Price as a two-decimal string.
    #[schema(example = "5.00")]
    pub price: String,
    /// External URL, empty when unset.
    #[schema(example = "")]
    pub link: String,
    /// Attached tags.
    pub tags: Vec<AttributeResponse>,
    /// Attached ingredients.
    pub ingredients: Vec<AttributeResponse>,
    /// Public URL of the uploaded image.
    #[schema(example = "/media/uploads/recipe/6f1c.jpg")]
    pub image: Option<String>,
}

impl RecipeDetailResponse {
    fn from_recipe(recipe: Recipe, state: &HttpState) -> Self {
        Self {
            id: recipe.id.get(),
            title: recipe.title.as_ref().to_owned(),
            time_minutes: recipe.time_minutes.minutes(),
            price: recipe.price.to_string(),
            link: recipe.link.as_ref().to_owned(),
            image: recipe.image.as_deref().map(|path| state.media_url_for(path)),
            tags: recipe.tags.into_iter().map(AttributeResponse::from).collect(),
            ingredients: recipe
                .ingredients
                .into_iter()
                .map(AttributeResponse::from)
                .collect(),
        }
    }
}

/// Result of an image upload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecipeImageResponse {
    /// Recipe identifier.
    #[schema(example = 1)]
    pub id: i64,
    /// Public URL of the stored image.
    #[schema(example = "/media/uploads/recipe/6f1c.jpg")]
    pub image: Option<String>,
}

/// Comma-separated id filters for the recipe list.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecipeListQuery {
    /// Tag ids; recipes carrying any of them match.
    #[param(example = "1,2")]
    pub tags: Option<String>,
    /// Ingredient ids; recipes carrying any of them match.
    #[param(example = "3")]
    pub ingredients: Option<String>,
}

impl RecipeListQuery {
    pub(crate) fn to_filter(&self) -> Result<RecipeFilter, Error> {
        let tags = parse_id_list(self.tags.as_deref(), TAGS)?;
        let ingredients = parse_id_list(self.ingredients.as_deref(), INGREDIENTS)?;
        Ok(RecipeFilter {
            tags: parse_ids(tags, TAGS, TagId::new)?,
            ingredients: parse_ids(ingredients, INGREDIENTS, IngredientId::new)?,
        })
    }
}

fn recipe_id(raw: i64) -> Result<RecipeId, Error> {
    // Non-positive ids can never exist.
    RecipeId::new(raw).map_err(|_| Error::not_found(format!("recipe {raw} not found")))
}

/// List the caller's recipes, id ascending.
#[utoipa::path(
    get,
    path = "/api/recipe/recipes/",
    params(RecipeListQuery),
    responses(
        (status = 200, description = "Recipes", body = [RecipeResponse]),
        (status = 400, description = "Invalid filter", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["recipe"],
    operation_id = "listRecipes"
)]
#[get("/recipe/recipes/")]
pub async fn list_recipes(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    query: web::Query<RecipeListQuery>,
) -> ApiResult<web::Json<Vec<RecipeResponse>>> {
    let filter = query.to_filter()?;
    let recipes = state.recipes.list_recipes(user.id(), filter).await?;
    Ok(web::Json(
        recipes
            .into_iter()
            .map(|recipe| RecipeResponse::from_recipe(recipe, &state))
            .collect(),
    ))
}

/// Create a recipe owned by the caller.
#[utoipa::path(
    post,
    path = "/api/recipe/recipes/",
    request_body = RecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["recipe"],
    operation_id = "createRecipe"
)]
#[post("/recipe/recipes/")]
pub async fn create_recipe(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<HttpResponse> {
    let draft = payload.into_inner().into_draft()?;
    let recipe = state.recipes.create_recipe(user.id(), draft).await?;
    Ok(HttpResponse::Created().json(RecipeResponse::from_recipe(recipe, &state)))
}

/// Fetch one recipe with nested tags and ingredients.
#[utoipa::path(
    get,
    path = "/api/recipe/recipes/{id}/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Recipe", body = RecipeDetailResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["recipe"],
    operation_id = "getRecipe"
)]
#[get("/recipe/recipes/{id}/")]
pub async fn get_recipe(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<web::Json<RecipeDetailResponse>> {
    let id = recipe_id(path.into_inner())?;
    let recipe = state.recipes.get_recipe(user.id(), id).await?;
    Ok(web::Json(RecipeDetailResponse::from_recipe(recipe, &state)))
}

/// Replace every writable field. Omitted tags and ingredients are cleared.
#[utoipa::path(
    put,
    path = "/api/recipe/recipes/{id}/",
    params(("id" = i64, Path, description = "Recipe id")),
    request_body = RecipeRequest,
    responses(
        (status = 200, description = "Recipe replaced", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["recipe"],
    operation_id = "replaceRecipe"
)]
#[put("/recipe/recipes/{id}/")]
pub async fn replace_recipe(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<web::Json<RecipeResponse>> {
    let id = recipe_id(path.into_inner())?;
    let draft = payload.into_inner().into_draft()?;
    let recipe = state.recipes.replace_recipe(user.id(), id, draft).await?;
    Ok(web::Json(RecipeResponse::from_recipe(recipe, &state)))
}

/// Update the provided fields only.
#[utoipa::path(
    patch,
    path = "/api/recipe/recipes/{id}/",
    params(("id" = i64, Path, description = "Recipe id")),
    request_body = RecipeRequest,
    responses(
        (status = 200, description = "Recipe updated", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["recipe"],
    operation_id = "updateRecipe"
)]
#[patch("/recipe/recipes/{id}/")]
pub async fn update_recipe(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<web::Json<RecipeResponse>> {
    let id = recipe_id(path.into_inner())?;
    let changes = payload.into_inner().into_changes()?;
    let recipe = state.recipes.update_recipe(user.id(), id, changes).await?;
    Ok(web::Json(RecipeResponse::from_recipe(recipe, &state)))
}

/// Delete a recipe and its image.
#[utoipa::path(
    delete,
    path = "/api/recipe/recipes/{id}/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["recipe"],
    operation_id = "deleteRecipe"
)]
#[delete("/recipe/recipes/{id}/")]
pub async fn delete_recipe(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = recipe_id(path.into_inner())?;
    state.recipes.delete_recipe(user.id(), id).await?;
    Ok(HttpResponse::NoContent().finish())
}

fn upload_filename(req: &HttpRequest) -> Result<String, Error> {
    let Some(raw) = req.headers().get(header::CONTENT_DISPOSITION) else {
        return Err(missing_field_error(FILENAME));
    };
    let disposition = ContentDisposition::from_raw(raw)
        .map_err(|err| invalid_field_error(FILENAME, format!("invalid Content-Disposition: {err}")))?;
    disposition
        .get_filename()
        .map(str::to_owned)
        .ok_or_else(|| missing_field_error(FILENAME))
}

fn ensure_image_content_type(req: &HttpRequest) -> Result<(), Error> {
    let is_image = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.trim().to_ascii_lowercase().starts_with("image/"));
    if is_image {
        Ok(())
    } else {
        Err(invalid_field_error(IMAGE, "upload must have an image/* content type"))
    }
}

/// Upload the raw image body and attach it to the recipe.
///
/// The original filename comes from `Content-Disposition`; only its
/// extension is kept.
#[utoipa::path(
    post,
    path = "/api/recipe/recipes/{id}/upload-image/",
    params(
        ("id" = i64, Path, description = "Recipe id"),
        ("Content-Disposition" = String, Header, description = "attachment; filename=\"photo.jpg\"")
    ),
    request_body(content = Vec<u8>, content_type = "image/*"),
    responses(
        (status = 200, description = "Image stored", body = RecipeImageResponse),
        (status = 400, description = "Missing or invalid image", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["recipe"],
    operation_id = "uploadRecipeImage"
)]
#[post("/recipe/recipes/{id}/upload-image/")]
pub async fn upload_recipe_image(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    req: HttpRequest,
    body: web::Bytes,
) -> ApiResult<web::Json<RecipeImageResponse>> {
    let id = recipe_id(path.into_inner())?;
    ensure_image_content_type(&req)?;
    let filename = upload_filename(&req)?;
    let upload = ImageUpload {
        filename,
        bytes: body.to_vec(),
    };
    let recipe = state.recipes.upload_image(user.id(), id, upload).await?;
    Ok(web::Json(RecipeImageResponse {
        id: recipe.id.get(),
        image: recipe.image.as_deref().map(|path| state.media_url_for(path)),
    }))
}

#[cfg(test)]
#[path = "recipes_tests.rs"]
mod tests;
