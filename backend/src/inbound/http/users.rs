//! Profile self-service for any authenticated caller.
//!
//! ```text
//! GET /api/v1/users/profile
//! PUT /api/v1/users/profile {"name":"New Name"}
//! ```

use actix_web::{get, put, web};

use crate::domain::ErrorBody;
use crate::domain::ports::ProfileUpdate;

use super::ApiResult;
use super::bearer::BearerAuth;
use super::dto::{ProfileResponse, ProfileUpdatedResponse, UpdateProfileRequest};
use super::state::HttpState;

/// Load the caller's account and, for doctors, their profile.
#[utoipa::path(
    get,
    path = "/api/v1/users/profile",
    responses(
        (status = 200, description = "Caller profile", body = ProfileResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "getProfile",
    security(("bearer" = []))
)]
#[get("/profile")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    auth: BearerAuth,
) -> ApiResult<web::Json<ProfileResponse>> {
    let profile = state.users.profile(auth.user_id()).await?;
    Ok(web::Json(profile.into()))
}

/// Change the caller's name, email or password.
#[utoipa::path(
    put,
    path = "/api/v1/users/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ProfileUpdatedResponse),
        (status = 400, description = "Invalid field or email already in use", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "updateProfile",
    security(("bearer" = []))
)]
#[put("/profile")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    auth: BearerAuth,
    payload: web::Json<UpdateProfileRequest>,
) -> ApiResult<web::Json<ProfileUpdatedResponse>> {
    let update = ProfileUpdate::try_from(payload.into_inner())?;
    let user = state.users.update_profile(auth.user_id(), update).await?;
    Ok(web::Json(ProfileUpdatedResponse {
        message: "Profile updated successfully".to_owned(),
        user: user.into(),
    }))
}
