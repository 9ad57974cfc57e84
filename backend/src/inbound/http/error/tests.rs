//! Tests for HTTP error mapping.

use super::*;
use crate::domain::Error;
use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::validation_failed("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::create_failed(), StatusCode::BAD_REQUEST)]
#[case(Error::edit_failed(), StatusCode::BAD_REQUEST)]
#[case(Error::delete_failed(), StatusCode::BAD_REQUEST)]
#[case(Error::no_such_user(), StatusCode::NOT_FOUND)]
#[case(Error::service_unavailable("down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] err: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&err), status);
}

async fn read_error_response(
    error: Error,
    expected_status: StatusCode,
    expected_trace_id: Option<&str>,
) -> Value {
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
        None => assert!(header.is_none(), "trace-id header should not be present"),
    }

    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("failure envelope is JSON")
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted(expected_trace_id: String) {
    let error = Error::internal("connection string leaked")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({"secret": "x"}));

    let body = read_error_response(
        error,
        StatusCode::INTERNAL_SERVER_ERROR,
        Some(expected_trace_id.as_str()),
    )
    .await;
    assert_eq!(body["code"], json!(10500));
    assert_eq!(body["msg"], json!("Internal server error"));
    assert_eq!(body["traceId"], json!(expected_trace_id));
    assert!(body.get("details").is_none());
}

#[rstest]
#[actix_web::test]
async fn failure_envelope_carries_code_message_and_details(expected_trace_id: String) {
    let error = Error::validation_failed("missing required field: username")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({"field": "username", "code": "missing_field"}));

    let body = read_error_response(
        error,
        StatusCode::BAD_REQUEST,
        Some(expected_trace_id.as_str()),
    )
    .await;
    assert_eq!(body["code"], json!(10001));
    assert_eq!(body["msg"], json!("missing required field: username"));
    assert_eq!(body["details"]["field"], json!("username"));
}

#[rstest]
#[actix_web::test]
async fn error_without_trace_id_omits_trace_header() {
    let body = read_error_response(Error::no_such_user(), StatusCode::NOT_FOUND, None).await;
    assert_eq!(body["code"], json!(10004));
    assert!(body.get("traceId").is_none());
}

#[rstest]
fn redaction_keeps_trace_id() {
    let error = Error::internal("boom").with_trace_id(TRACE_ID);
    let redacted = super::redact_if_internal(&error);
    assert_eq!(redacted.message(), "Internal server error");
    assert_eq!(redacted.trace_id(), Some(TRACE_ID));
}

#[test]
fn from_actix_error_is_redacted_internal_error() {
    let actix_err = actix_web::error::ErrorBadRequest("boom");
    let err: Error = actix_err.into();

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), "Internal server error");
    assert_eq!(err.details(), None);
}
