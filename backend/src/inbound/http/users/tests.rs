//! Tests for users API handlers.

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::MockUserAccounts;
use crate::inbound::http::test_utils::{auth_header, mock_ports, register_and_login};
use crate::test_support::InMemoryBackend;
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use rstest::rstest;
use serde_json::{Value, json};
use std::sync::Arc;

fn details_of(body: &Value) -> (Option<&str>, Option<&str>) {
    let details = body.get("details");
    (
        details.and_then(|d| d.get("field")).and_then(Value::as_str),
        details.and_then(|d| d.get("code")).and_then(Value::as_str),
    )
}

#[actix_web::test]
async fn registration_returns_public_fields_only() {
    let backend = InMemoryBackend::new();
    let app = actix_test::init_service(backend.app()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/user/create/")
            .set_json(json!({
                "email": "Cook@EXAMPLE.com",
                "password": "testpass123",
                "name": "Test Cook",
            }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body, json!({"email": "cook@example.com", "name": "Test Cook"}));
}

#[rstest]
#[case(json!({"password": "testpass123"}), "email", "missing_field")]
#[case(json!({"email": "cook@example.com"}), "password", "missing_field")]
#[case(json!({"email": "", "password": "testpass123"}), "email", "invalid_value")]
#[case(json!({"email": "not-an-email", "password": "testpass123"}), "email", "invalid_value")]
#[case(json!({"email": "cook@example.com", "password": "pw"}), "password", "invalid_value")]
#[actix_web::test]
async fn registration_rejects_invalid_payloads(
    #[case] payload: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let backend = InMemoryBackend::new();
    let app = actix_test::init_service(backend.app()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/user/create/")
            .set_json(payload)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(details_of(&body), (Some(field), Some(code)));
}

#[actix_web::test]
async fn duplicate_email_is_a_bad_request() {
    let backend = InMemoryBackend::new();
    let app = actix_test::init_service(backend.app()).await;
    register_and_login(&app, "cook@example.com").await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/user/create/")
            .set_json(json!({"email": "COOK@example.com", "password": "another123"}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[case(json!({"email": "cook@example.com", "password": "wrongpass"}))]
#[case(json!({"email": "nobody@example.com", "password": "testpass123"}))]
#[actix_web::test]
async fn bad_credentials_do_not_issue_tokens(#[case] payload: Value) {
    let backend = InMemoryBackend::new();
    let app = actix_test::init_service(backend.app()).await;
    register_and_login(&app, "cook@example.com").await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/user/token/")
            .set_json(payload)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert!(body.get("token").is_none());
    assert_eq!(details_of(&body).0, Some("non_field_errors"));
}

#[actix_web::test]
async fn blank_password_in_token_request_names_the_field() {
    let mut accounts = MockUserAccounts::new();
    accounts.expect_issue_token().never();
    let mut ports = mock_ports();
    ports.accounts = Arc::new(accounts);
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(HttpState::from(ports)))
            .service(web::scope("/api").service(create_token)),
    )
    .await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/user/token/")
            .set_json(json!({"email": "cook@example.com", "password": ""}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        body.get("code").and_then(Value::as_str),
        Some("invalid_request")
    );
    assert_eq!(details_of(&body).0, Some("password"));
}

#[actix_web::test]
async fn profile_requires_authentication() {
    let backend = InMemoryBackend::new();
    let app = actix_test::init_service(backend.app()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/user/me/")
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body.get("code").and_then(Value::as_str), Some("unauthorized"));
}

#[actix_web::test]
async fn profile_returns_the_token_owner() {
    let backend = InMemoryBackend::new();
    let app = actix_test::init_service(backend.app()).await;
    let token = register_and_login(&app, "cook@example.com").await;

    let body: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/user/me/")
            .insert_header(auth_header(&token))
            .to_request(),
    )
    .await;

    assert_eq!(body, json!({"email": "cook@example.com", "name": ""}));
}

#[actix_web::test]
async fn patch_updates_name_and_rehashes_password() {
    let backend = InMemoryBackend::new();
    let app = actix_test::init_service(backend.app()).await;
    let token = register_and_login(&app, "cook@example.com").await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri("/api/user/me/")
            .insert_header(auth_header(&token))
            .set_json(json!({"name": "Renamed", "password": "newpassword123"}))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body.get("name").and_then(Value::as_str), Some("Renamed"));

    let login = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/user/token/")
            .set_json(json!({"email": "cook@example.com", "password": "newpassword123"}))
            .to_request(),
    )
    .await;
    assert_eq!(login.status(), StatusCode::OK);
}

#[actix_web::test]
async fn put_requires_email_and_password() {
    let backend = InMemoryBackend::new();
    let app = actix_test::init_service(backend.app()).await;
    let token = register_and_login(&app, "cook@example.com").await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/user/me/")
            .insert_header(auth_header(&token))
            .set_json(json!({"name": "Only a name"}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(details_of(&body), (Some("email"), Some("missing_field")));
}

#[actix_web::test]
async fn logging_in_again_keeps_earlier_tokens_valid() {
    let backend = InMemoryBackend::new();
    let app = actix_test::init_service(backend.app()).await;
    let first = register_and_login(&app, "cook@example.com").await;

    let body: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/user/token/")
            .set_json(json!({"email": "cook@example.com", "password": "testpass123"}))
            .to_request(),
    )
    .await;
    let second = body.get("token").and_then(Value::as_str).expect("token");

    for token in [first.as_str(), second] {
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/user/me/")
                .insert_header(auth_header(token))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[rstest]
fn login_validation_errors_name_their_field() {
    let error = map_login_validation_error(LoginValidationError::EmptyEmail);

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        error.details().and_then(|d| d.get("field")),
        Some(&json!("email"))
    );
}
