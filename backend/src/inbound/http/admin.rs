//! Administrative listing and account moderation.
//!
//! ```text
//! GET /api/v1/admin/users?role=doctor&active=true&page=1&limit=20
//! PUT /api/v1/admin/users/{id}/status {"active":false}
//! GET /api/v1/admin/appointments?status=pending&doctor_id=4
//! ```

use actix_web::{get, put, web};

use crate::domain::{ErrorBody, Role, UserId};

use super::ApiResult;
use super::bearer::BearerAuth;
use super::dto::{AppointmentResponse, MessageResponse, PageResponse, UserResponse, UserStatusRequest};
use super::query::{AdminAppointmentQuery, AdminUserQuery};
use super::state::HttpState;
use super::validation::path_id;

const ADMIN_ROLES: &[Role] = &[Role::Admin];

/// Page through accounts, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    params(AdminUserQuery),
    responses(
        (status = 200, description = "Users", body = PageResponse<UserResponse>),
        (status = 400, description = "Invalid filter or paging value", body = ErrorBody),
        (status = 403, description = "Not an admin", body = ErrorBody)
    ),
    tags = ["admin"],
    operation_id = "adminListUsers",
    security(("bearer" = []))
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    auth: BearerAuth,
    query: web::Query<AdminUserQuery>,
) -> ApiResult<web::Json<PageResponse<UserResponse>>> {
    auth.require_any(ADMIN_ROLES)?;
    let (filter, page) = query.into_inner().parse()?;
    let users = state.users.list_users(filter, page).await?;
    Ok(web::Json(PageResponse::from_page(users)))
}

/// Activate or deactivate an account.
#[utoipa::path(
    put,
    path = "/api/v1/admin/users/{id}/status",
    params(("id" = i64, Path, description = "User id")),
    request_body = UserStatusRequest,
    responses(
        (status = 200, description = "User status updated", body = MessageResponse),
        (status = 400, description = "Invalid id or body", body = ErrorBody),
        (status = 403, description = "Not an admin", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody)
    ),
    tags = ["admin"],
    operation_id = "adminSetUserStatus",
    security(("bearer" = []))
)]
#[put("/users/{id}/status")]
pub async fn set_user_status(
    state: web::Data<HttpState>,
    auth: BearerAuth,
    path: web::Path<String>,
    payload: web::Json<UserStatusRequest>,
) -> ApiResult<web::Json<MessageResponse>> {
    auth.require_any(ADMIN_ROLES)?;
    let user_id: UserId = path_id(&path)?;
    let active = payload.active;
    state.users.set_user_active(user_id, active).await?;
    Ok(web::Json(MessageResponse::new("User status updated successfully")))
}

/// Page through every appointment, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/admin/appointments",
    params(AdminAppointmentQuery),
    responses(
        (status = 200, description = "Appointments", body = PageResponse<AppointmentResponse>),
        (status = 400, description = "Invalid filter or paging value", body = ErrorBody),
        (status = 403, description = "Not an admin", body = ErrorBody)
    ),
    tags = ["admin"],
    operation_id = "adminListAppointments",
    security(("bearer" = []))
)]
#[get("/appointments")]
pub async fn list_appointments(
    state: web::Data<HttpState>,
    auth: BearerAuth,
    query: web::Query<AdminAppointmentQuery>,
) -> ApiResult<web::Json<PageResponse<AppointmentResponse>>> {
    auth.require_any(ADMIN_ROLES)?;
    let (filter, page) = query.into_inner().parse()?;
    let appointments = state.appointments.list_all(filter, page).await?;
    Ok(web::Json(PageResponse::from_page(appointments)))
}
