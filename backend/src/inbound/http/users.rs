//! Users API handlers.
//!
//! ```text
//! POST  /api/user/create/  {"email":"cook@example.com","password":"testpass123","name":"Cook"}
//! POST  /api/user/token/   {"email":"cook@example.com","password":"testpass123"}
//! GET   /api/user/me/
//! PUT   /api/user/me/      {"email":"...","password":"...","name":"..."}
//! PATCH /api/user/me/      any subset of the PUT body
//! ```

use actix_web::{HttpResponse, get, patch, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{NewAccount, ProfileChanges};
use crate::domain::{
    Email, Error, LoginCredentials, LoginValidationError, PASSWORD_MIN, Password, User, UserName,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_field_error, require};

const EMAIL: FieldName = FieldName::new("email");
const PASSWORD: FieldName = FieldName::new("password");
const NAME: FieldName = FieldName::new("name");

/// Registration and profile update body.
///
/// Every field is optional at the wire level so missing values produce a
/// field-level validation error instead of a generic JSON error.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UserRequest {
    /// Login email; stored lower-cased.
    #[schema(example = "cook@example.com")]
    pub email: Option<String>,
    /// Plain-text password, at least five characters.
    #[schema(example = "testpass123", min_length = 5)]
    pub password: Option<String>,
    /// Display name; empty when omitted on sign-up.
    #[schema(example = "Cook")]
    pub name: Option<String>,
}

/// Token request body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct TokenRequest {
    /// Account email.
    #[schema(example = "cook@example.com")]
    pub email: Option<String>,
    /// Account password.
    #[schema(example = "testpass123")]
    pub password: Option<String>,
}

/// Public view of an account.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    /// Normalised email address.
    #[schema(example = "cook@example.com")]
    pub email: String,
    /// Display name.
    #[schema(example = "Cook")]
    pub name: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            email: user.email().to_string(),
            name: user.name().as_ref().to_owned(),
        }
    }
}

/// Freshly issued API token.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// Key to send as `Authorization: Token <key>`.
    #[schema(example = "9944b09199c62bcf9418ad846dd0e4bbdfc6ee4b")]
    pub token: String,
}

fn parse_email(raw: String) -> Result<Email, Error> {
    Email::new(raw).map_err(|err| invalid_field_error(EMAIL, err))
}

fn parse_password(raw: String) -> Result<Password, Error> {
    Password::with_min_length(raw, PASSWORD_MIN)
        .map_err(|err| invalid_field_error(PASSWORD, err))
}

fn parse_name(raw: Option<String>) -> Result<Option<UserName>, Error> {
    raw.map(|name| UserName::new(name).map_err(|err| invalid_field_error(NAME, err)))
        .transpose()
}

fn parse_registration(payload: UserRequest) -> Result<NewAccount, Error> {
    let UserRequest {
        email,
        password,
        name,
    } = payload;
    Ok(NewAccount {
        email: parse_email(require(email, EMAIL)?)?,
        password: parse_password(require(password, PASSWORD)?)?,
        name: parse_name(name)?.unwrap_or_default(),
    })
}

fn parse_profile_changes(payload: UserRequest, full: bool) -> Result<ProfileChanges, Error> {
    let UserRequest {
        email,
        password,
        name,
    } = payload;
    if full {
        require(email.as_ref(), EMAIL)?;
        require(password.as_ref(), PASSWORD)?;
    }
    Ok(ProfileChanges {
        email: email.map(parse_email).transpose()?,
        password: password.map(parse_password).transpose()?,
        name: parse_name(name)?,
    })
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyEmail => invalid_field_error(EMAIL, err),
        LoginValidationError::EmptyPassword => invalid_field_error(PASSWORD, err),
    }
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/user/create/",
    request_body = UserRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid request or email taken", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["user"],
    operation_id = "createUser",
    security([])
)]
#[post("/user/create/")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<UserRequest>,
) -> ApiResult<HttpResponse> {
    let account = parse_registration(payload.into_inner())?;
    let user = state.accounts.register(account).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// Exchange credentials for an API token.
///
/// Earlier tokens for the same user stay valid.
#[utoipa::path(
    post,
    path = "/api/user/token/",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Invalid credentials", body = ErrorSchema)
    ),
    tags = ["user"],
    operation_id = "createToken",
    security([])
)]
#[post("/user/token/")]
pub async fn create_token(
    state: web::Data<HttpState>,
    payload: web::Json<TokenRequest>,
) -> ApiResult<web::Json<TokenResponse>> {
    let TokenRequest { email, password } = payload.into_inner();
    let email = require(email, EMAIL)?;
    let password = require(password, PASSWORD)?;
    let credentials =
        LoginCredentials::try_from_parts(&email, &password).map_err(map_login_validation_error)?;
    let token = state.accounts.issue_token(&credentials).await?;
    Ok(web::Json(TokenResponse {
        token: token.expose().to_owned(),
    }))
}

/// The authenticated user's profile.
#[utoipa::path(
    get,
    path = "/api/user/me/",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["user"],
    operation_id = "currentUser"
)]
#[get("/user/me/")]
pub async fn current_user(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<web::Json<UserResponse>> {
    let user = state.accounts.profile(user.id()).await?;
    Ok(web::Json(UserResponse::from(user)))
}

async fn apply_profile_update(
    state: &HttpState,
    user: &AuthenticatedUser,
    payload: UserRequest,
    full: bool,
) -> ApiResult<web::Json<UserResponse>> {
    let changes = parse_profile_changes(payload, full)?;
    let updated = state.accounts.update_profile(user.id(), changes).await?;
    Ok(web::Json(UserResponse::from(updated)))
}

/// Replace the profile. `email` and `password` are required.
#[utoipa::path(
    put,
    path = "/api/user/me/",
    request_body = UserRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["user"],
    operation_id = "replaceCurrentUser"
)]
#[put("/user/me/")]
pub async fn replace_current_user(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<UserRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    apply_profile_update(&state, &user, payload.into_inner(), true).await
}

/// Update the provided profile fields. A new password is re-hashed.
#[utoipa::path(
    patch,
    path = "/api/user/me/",
    request_body = UserRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["user"],
    operation_id = "updateCurrentUser"
)]
#[patch("/user/me/")]
pub async fn update_current_user(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<UserRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    apply_profile_update(&state, &user, payload.into_inner(), false).await
}

#[cfg(test)]
mod tests;
