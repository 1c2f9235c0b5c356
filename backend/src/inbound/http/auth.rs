//! Registration and login handlers.
//!
//! ```text
//! POST /api/v1/auth/register {"name":"Jane","email":"jane@example.com","password":"...","role":"patient"}
//! POST /api/v1/auth/login {"email":"jane@example.com","password":"..."}
//! ```

use actix_web::{HttpResponse, post, web};

use crate::domain::{Credentials, ErrorBody, Registration};

use super::ApiResult;
use super::dto::{AuthResponse, LoginRequest, RegisterRequest};
use super::state::HttpState;

/// Create a patient or doctor account and return a token for it.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid request or email already registered", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = Registration::try_from(payload.into_inner())?;
    let session = state.auth.register(registration).await?;
    Ok(HttpResponse::Created().json(AuthResponse::from(session)))
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = AuthResponse),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Invalid email or password", body = ErrorBody),
        (status = 403, description = "Account is deactivated", body = ErrorBody)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<AuthResponse>> {
    let credentials = Credentials::try_from(payload.into_inner())?;
    let session = state.auth.login(credentials).await?;
    Ok(web::Json(session.into()))
}
