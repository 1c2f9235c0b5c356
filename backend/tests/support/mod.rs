//! Request helpers shared by the HTTP integration suites.
#![allow(dead_code, reason = "each suite uses a different subset of the helpers")]

pub mod cluster_skip;
pub mod embedded_postgres;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::http::header;
use actix_web::test::{self, TestRequest};
use serde_json::{Value, json};

/// Password every account registered by these helpers uses.
pub const PASSWORD: &str = "secret123";
/// Seeded doctor credentials.
pub const SEEDED_DOCTOR_EMAIL: &str = "john.smith@example.com";
pub const SEEDED_DOCTOR_PASSWORD: &str = "doctor123";
pub const SEEDED_ADMIN_PASSWORD: &str = "admin123";

/// Attach `Authorization: Bearer {token}`.
pub fn bearer(request: TestRequest, token: &str) -> TestRequest {
    request.insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
}

/// Send a request and decode the body as JSON (`Null` when empty).
pub async fn send<S, B>(app: &S, request: TestRequest) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let response = test::call_service(app, request.to_request()).await;
    let status = response.status();
    let bytes = test::read_body(response).await;
    if bytes.is_empty() {
        return (status, Value::Null);
    }
    let body = serde_json::from_slice(&bytes).expect("response body is JSON");
    (status, body)
}

/// Register a patient and return `(token, user_id)`.
pub async fn register_patient<S, B>(app: &S, name: &str, email: &str) -> (String, i64)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = send(
        app,
        TestRequest::post().uri("/api/v1/auth/register").set_json(json!({
            "name": name,
            "email": email,
            "password": PASSWORD,
            "role": "patient",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register {email}: {body}");
    let token = body["token"].as_str().expect("token").to_owned();
    let id = body["user"]["id"].as_i64().expect("user id");
    (token, id)
}

/// Log in and return the bearer token.
pub async fn login<S, B>(app: &S, email: &str, password: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = send(
        app,
        TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({"email": email, "password": password})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login {email}: {body}");
    body["token"].as_str().expect("token").to_owned()
}

/// Directory id of the public doctor called `name`.
pub async fn doctor_id_named<S, B>(app: &S, name: &str) -> i64
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = send(app, TestRequest::get().uri("/api/v1/doctors?limit=100")).await;
    assert_eq!(status, StatusCode::OK, "directory: {body}");
    body["data"]
        .as_array()
        .expect("data array")
        .iter()
        .find(|doctor| doctor["name"] == name)
        .and_then(|doctor| doctor["id"].as_i64())
        .unwrap_or_else(|| panic!("doctor {name} is listed"))
}

/// Book `scheduled_at` with the given doctor.
pub async fn book<S, B>(
    app: &S,
    token: &str,
    doctor_id: i64,
    scheduled_at: &str,
) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    send(
        app,
        bearer(TestRequest::post().uri("/api/v1/patients/appointments"), token).set_json(json!({
            "doctor_id": doctor_id,
            "scheduled_at": scheduled_at,
            "reason": "Annual checkup",
        })),
    )
    .await
}
