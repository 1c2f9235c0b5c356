//! Doctor directory and doctor self-service handlers.
//!
//! ```text
//! GET /api/v1/doctors?specialization=cardiology&name=smith&page=1&limit=10
//! GET /api/v1/doctors/{id}
//! GET /api/v1/doctors/{id}/availability?date=2025-03-10
//! GET /api/v1/doctors/dashboard
//! POST /api/v1/doctors/schedules {"date":"2025-03-10","start_time":"09:00","end_time":"17:00"}
//! GET /api/v1/doctors/appointments?status=pending
//! PUT /api/v1/doctors/appointments/{id}/status {"status":"confirmed"}
//! ```
//!
//! The directory and availability routes are public; the rest require the
//! doctor or admin role and a doctor profile.

use actix_web::{HttpResponse, get, post, put, web};

use crate::domain::{AppointmentId, DoctorId, ErrorBody, Role, ScheduleDraft};

use super::ApiResult;
use super::bearer::BearerAuth;
use super::dto::{
    AppointmentEnvelope, AppointmentResponse, AvailabilityResponse, DashboardResponse,
    DoctorDetail, DoctorSummary, PageResponse, ScheduleCreatedResponse, ScheduleRequest,
    StatusUpdateRequest,
};
use super::query::{AppointmentListQuery, AvailabilityQuery, DoctorListQuery};
use super::state::HttpState;
use super::validation::path_id;

const DOCTOR_ROLES: &[Role] = &[Role::Doctor, Role::Admin];

/// Shared by the public and patient directory routes.
pub(crate) async fn directory_page(
    state: &HttpState,
    query: DoctorListQuery,
) -> ApiResult<PageResponse<DoctorSummary>> {
    let (filter, page) = query.parse()?;
    let doctors = state.doctors.list_doctors(filter, page).await?;
    Ok(PageResponse::from_page(doctors))
}

/// Shared by the public and patient availability routes.
pub(crate) async fn availability_for(
    state: &HttpState,
    raw_id: &str,
    query: AvailabilityQuery,
) -> ApiResult<AvailabilityResponse> {
    let doctor_id: DoctorId = path_id(raw_id)?;
    let date = query.parse()?;
    let slots = state.doctors.availability(doctor_id, date).await?;
    Ok(slots.into())
}

/// Page through available doctors.
#[utoipa::path(
    get,
    path = "/api/v1/doctors",
    params(DoctorListQuery),
    responses(
        (status = 200, description = "Doctors", body = PageResponse<DoctorSummary>),
        (status = 400, description = "Invalid filter or paging value", body = ErrorBody)
    ),
    tags = ["doctors"],
    operation_id = "listDoctors",
    security([])
)]
#[get("")]
pub async fn list_doctors(
    state: web::Data<HttpState>,
    query: web::Query<DoctorListQuery>,
) -> ApiResult<web::Json<PageResponse<DoctorSummary>>> {
    directory_page(&state, query.into_inner()).await.map(web::Json)
}

/// Public doctor profile.
#[utoipa::path(
    get,
    path = "/api/v1/doctors/{id}",
    params(("id" = i64, Path, description = "Doctor id")),
    responses(
        (status = 200, description = "Doctor", body = DoctorDetail),
        (status = 400, description = "Invalid id", body = ErrorBody),
        (status = 404, description = "Doctor not found", body = ErrorBody)
    ),
    tags = ["doctors"],
    operation_id = "getDoctor",
    security([])
)]
#[get("/{id}")]
pub async fn get_doctor(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<DoctorDetail>> {
    let doctor_id: DoctorId = path_id(&path)?;
    let profile = state.doctors.get_doctor(doctor_id).await?;
    Ok(web::Json(profile.into()))
}

/// Free 30-minute slots between 09:00 and 17:00 UTC.
#[utoipa::path(
    get,
    path = "/api/v1/doctors/{id}/availability",
    params(("id" = i64, Path, description = "Doctor id"), AvailabilityQuery),
    responses(
        (status = 200, description = "Available slots", body = AvailabilityResponse),
        (status = 400, description = "Invalid date format. Use YYYY-MM-DD", body = ErrorBody),
        (status = 404, description = "Doctor not found", body = ErrorBody)
    ),
    tags = ["doctors"],
    operation_id = "getDoctorAvailability",
    security([])
)]
#[get("/{id}/availability")]
pub async fn availability(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<AvailabilityQuery>,
) -> ApiResult<web::Json<AvailabilityResponse>> {
    availability_for(&state, &path, query.into_inner())
        .await
        .map(web::Json)
}

/// Today's and upcoming appointments for the calling doctor.
#[utoipa::path(
    get,
    path = "/api/v1/doctors/dashboard",
    responses(
        (status = 200, description = "Dashboard", body = DashboardResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 403, description = "Not a doctor", body = ErrorBody)
    ),
    tags = ["doctors"],
    operation_id = "getDoctorDashboard",
    security(("bearer" = []))
)]
#[get("/dashboard")]
pub async fn dashboard(
    state: web::Data<HttpState>,
    auth: BearerAuth,
) -> ApiResult<web::Json<DashboardResponse>> {
    auth.require_any(DOCTOR_ROLES)?;
    let dashboard = state.doctors.dashboard(auth.user_id()).await?;
    Ok(web::Json(dashboard.into()))
}

/// Record a working window for the calling doctor.
#[utoipa::path(
    post,
    path = "/api/v1/doctors/schedules",
    request_body = ScheduleRequest,
    responses(
        (status = 201, description = "Schedule created", body = ScheduleCreatedResponse),
        (status = 400, description = "Invalid date or time", body = ErrorBody),
        (status = 403, description = "Only doctors can create schedules", body = ErrorBody)
    ),
    tags = ["doctors"],
    operation_id = "createSchedule",
    security(("bearer" = []))
)]
#[post("/schedules")]
pub async fn create_schedule(
    state: web::Data<HttpState>,
    auth: BearerAuth,
    payload: web::Json<ScheduleRequest>,
) -> ApiResult<HttpResponse> {
    auth.require_any(DOCTOR_ROLES)?;
    let draft = ScheduleDraft::try_from(payload.into_inner())?;
    let schedule = state.doctors.create_schedule(auth.user_id(), draft).await?;
    Ok(HttpResponse::Created().json(ScheduleCreatedResponse {
        message: "Schedule created successfully".to_owned(),
        schedule: schedule.into(),
    }))
}

/// The calling doctor's appointments, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/doctors/appointments",
    params(AppointmentListQuery),
    responses(
        (status = 200, description = "Appointments", body = [AppointmentResponse]),
        (status = 400, description = "Invalid filter", body = ErrorBody),
        (status = 403, description = "Not a doctor", body = ErrorBody)
    ),
    tags = ["doctors"],
    operation_id = "listDoctorAppointments",
    security(("bearer" = []))
)]
#[get("/appointments")]
pub async fn list_appointments(
    state: web::Data<HttpState>,
    auth: BearerAuth,
    query: web::Query<AppointmentListQuery>,
) -> ApiResult<web::Json<Vec<AppointmentResponse>>> {
    auth.require_any(DOCTOR_ROLES)?;
    let filter = query.into_inner().parse()?;
    let appointments = state
        .appointments
        .list_for_doctor(auth.user_id(), filter)
        .await?;
    Ok(web::Json(appointments.into_iter().map(Into::into).collect()))
}

/// Confirm, complete or cancel one of the calling doctor's appointments.
#[utoipa::path(
    put,
    path = "/api/v1/doctors/appointments/{id}/status",
    params(("id" = i64, Path, description = "Appointment id")),
    request_body = StatusUpdateRequest,
    responses(
        (status = 200, description = "Status updated", body = AppointmentEnvelope),
        (status = 400, description = "Invalid status or transition", body = ErrorBody),
        (status = 403, description = "Not a doctor", body = ErrorBody),
        (status = 404, description = "Appointment not found", body = ErrorBody),
        (status = 409, description = "Appointment changed concurrently", body = ErrorBody)
    ),
    tags = ["doctors"],
    operation_id = "updateAppointmentStatus",
    security(("bearer" = []))
)]
#[put("/appointments/{id}/status")]
pub async fn update_appointment_status(
    state: web::Data<HttpState>,
    auth: BearerAuth,
    path: web::Path<String>,
    payload: web::Json<StatusUpdateRequest>,
) -> ApiResult<web::Json<AppointmentEnvelope>> {
    auth.require_any(DOCTOR_ROLES)?;
    let appointment_id: AppointmentId = path_id(&path)?;
    let status = payload.status()?;
    let appointment = state
        .appointments
        .update_status_as_doctor(auth.user_id(), appointment_id, status)
        .await?;
    Ok(web::Json(AppointmentEnvelope::new(
        "Appointment status updated successfully",
        appointment,
    )))
}

#[cfg(test)]
#[path = "doctors_tests.rs"]
mod tests;
