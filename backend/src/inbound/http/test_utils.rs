//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header;
use actix_web::test;
use serde_json::{Value, json};

use crate::domain::ports::{
    MockIngredientService, MockRecipeService, MockTagService, MockTokenAuthenticator,
    MockUserAccounts,
};
use crate::domain::{
    Email, Password, PasswordHash, User, UserFlags, UserId, UserName, UserRole,
};

use super::state::HttpStatePorts;

/// Ports backed by mocks with no expectations; tests replace the ones they
/// exercise.
pub fn mock_ports() -> HttpStatePorts {
    HttpStatePorts {
        accounts: Arc::new(MockUserAccounts::new()),
        authenticator: Arc::new(MockTokenAuthenticator::new()),
        tags: Arc::new(MockTagService::new()),
        ingredients: Arc::new(MockIngredientService::new()),
        recipes: Arc::new(MockRecipeService::new()),
    }
}

/// An active member account.
pub fn sample_user(email: &str) -> User {
    User::new(
        UserId::random(),
        Email::new(email).expect("valid email"),
        UserName::new("Sample Cook").expect("valid name"),
        PasswordHash::generate(&Password::new("testpass123").expect("password")).expect("hash"),
        UserFlags::for_role(UserRole::Member),
    )
}

/// Register `email` with a fixed password and return a fresh token.
pub async fn register_and_login<S>(app: &S, email: &str) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let created = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/user/create/")
            .set_json(json!({"email": email, "password": "testpass123"}))
            .to_request(),
    )
    .await;
    assert!(created.status().is_success(), "registration failed");

    let body: Value = test::call_and_read_body_json(
        app,
        test::TestRequest::post()
            .uri("/api/user/token/")
            .set_json(json!({"email": email, "password": "testpass123"}))
            .to_request(),
    )
    .await;
    body.get("token")
        .and_then(Value::as_str)
        .expect("token in response")
        .to_owned()
}

/// `Authorization` header tuple for `token`.
pub fn auth_header(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Token {token}"))
}
