//! Tests for HTTP error mapping.

use super::*;
use crate::domain::Error;
use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("no auth"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("denied"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("clash"), StatusCode::CONFLICT)]
#[case(Error::service_unavailable("db down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
    assert_eq!(status_for(error.code()), status);
}

async fn decode_response(
    error: Error,
    expected_status: StatusCode,
    expected_trace_id: Option<&str>,
) -> Error {
    let response = ResponseError::error_response(&error);
    assert_eq!(response.status(), expected_status);

    let header = response.headers().get(TRACE_ID_HEADER);
    match expected_trace_id {
        Some(expected) => {
            let trace_id = header
                .expect("trace-id header is set by error_response")
                .to_str()
                .expect("trace-id is valid UTF-8");
            assert_eq!(trace_id, expected);
        }
        None => assert!(header.is_none(), "trace-id header should be absent"),
    }

    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("error JSON deserialises")
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted(expected_trace_id: String) {
    let error = Error::internal("connection string leaked")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({"secret": "x"}));

    let payload = decode_response(
        error,
        StatusCode::INTERNAL_SERVER_ERROR,
        Some(expected_trace_id.as_str()),
    )
    .await;

    assert_eq!(payload.code(), ErrorCode::InternalError);
    assert_eq!(payload.message(), "Internal server error");
    assert_eq!(payload.trace_id(), Some(expected_trace_id.as_str()));
    assert!(payload.details().is_none());
}

#[rstest]
#[actix_web::test]
async fn validation_errors_keep_their_details(expected_trace_id: String) {
    let error = Error::invalid_request("title must not be blank")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({"field": "title", "code": "invalid_value"}));

    let payload = decode_response(
        error,
        StatusCode::BAD_REQUEST,
        Some(expected_trace_id.as_str()),
    )
    .await;

    assert_eq!(payload.code(), ErrorCode::InvalidRequest);
    assert_eq!(payload.message(), "title must not be blank");
    assert_eq!(
        payload.details(),
        Some(&json!({"field": "title", "code": "invalid_value"}))
    );
}

#[actix_web::test]
async fn errors_without_trace_id_omit_the_header() {
    let error = Error::not_found("recipe 4 not found");

    let payload = decode_response(error, StatusCode::NOT_FOUND, None).await;

    assert_eq!(payload.code(), ErrorCode::NotFound);
    assert_eq!(payload.trace_id(), None);
}

#[rstest]
#[case(Error::unauthorized("invalid token"), Some(AUTH_SCHEME))]
#[case(Error::forbidden("denied"), None)]
#[case(Error::invalid_request("bad"), None)]
fn only_unauthorised_responses_name_the_scheme(
    #[case] error: Error,
    #[case] expected: Option<&str>,
) {
    let response = ResponseError::error_response(&error);

    let scheme = response
        .headers()
        .get(actix_web::http::header::WWW_AUTHENTICATE)
        .and_then(|value| value.to_str().ok());
    assert_eq!(scheme, expected);
}

#[rstest]
fn redaction_leaves_client_errors_untouched() {
    let error = Error::forbidden("denied").with_details(json!({"reason": "owner"}));

    assert_eq!(redact_if_internal(&error), error);
}

#[rstest]
fn actix_errors_become_redacted_internal_errors() {
    let err: Error = actix_web::error::ErrorBadRequest("boom").into();

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), "Internal server error");
    assert_eq!(err.details(), None);
}
