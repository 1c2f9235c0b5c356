//! Tests for HTTP error mapping.

use super::*;
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
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("no auth"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("denied"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("taken"), StatusCode::CONFLICT)]
#[case(Error::service_unavailable("down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] err: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&err), status);
}

async fn render(error: Error) -> (StatusCode, Option<String>, Value) {
    let response = ResponseError::error_response(&error);
    let status = response.status();
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .map(|value| value.to_str().expect("ascii header").to_owned());
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    let body = serde_json::from_slice(&bytes).expect("error JSON");
    (status, header, body)
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted(expected_trace_id: String) {
    let error = Error::internal("connection string leaked")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({"secret": "x"}));

    let (status, header, body) = render(error).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(header.as_deref(), Some(expected_trace_id.as_str()));
    assert_eq!(
        body,
        json!({
            "error": "Internal server error",
            "code": "internal_error",
            "trace_id": TRACE_ID,
        })
    );
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_message_and_details(expected_trace_id: String) {
    let error = Error::conflict("Doctor is not available at the requested time")
        .with_trace_id(expected_trace_id)
        .with_details(json!({"field": "scheduled_at"}));

    let (status, _, body) = render(error).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Doctor is not available at the requested time");
    assert_eq!(body["code"], "conflict");
    assert_eq!(body["details"], json!({"field": "scheduled_at"}));
}

#[rstest]
#[actix_web::test]
async fn error_without_trace_id_omits_trace_header() {
    let (status, header, body) = render(Error::invalid_request("bad")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(header.is_none());
    assert!(body.get("trace_id").is_none());
}

#[rstest]
fn actix_errors_become_redacted_internal_errors() {
    let actix_err = actix_web::error::ErrorBadGateway("upstream detail");
    let err = Error::from(actix_err);
    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), "Internal server error");
}

#[rstest]
#[actix_web::test]
async fn unavailable_keeps_message_but_drops_details() {
    let error = Error::service_unavailable("appointment store unavailable: timed out")
        .with_details(json!({"pool": "exhausted"}));

    let (status, _, body) = render(error).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "appointment store unavailable: timed out");
    assert!(body.get("details").is_none());
}
