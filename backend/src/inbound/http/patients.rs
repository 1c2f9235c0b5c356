//! Patient booking handlers.
//!
//! ```text
//! GET /api/v1/patients/doctors?specialization=dermatology
//! GET /api/v1/patients/doctors/{id}/availability?date=2025-03-10
//! POST /api/v1/patients/appointments {"doctor_id":1,"scheduled_at":"2025-03-10T09:30:00Z"}
//! GET /api/v1/patients/appointments?status=confirmed
//! PUT /api/v1/patients/appointments/{id}/cancel {"reason":"Feeling better"}
//! ```
//!
//! Every route requires the patient role.

use actix_web::{HttpResponse, get, post, put, web};

use crate::domain::{AppointmentId, BookingRequest, ErrorBody, Role};

use super::ApiResult;
use super::bearer::BearerAuth;
use super::doctors::{availability_for, directory_page};
use super::dto::{
    AppointmentEnvelope, AppointmentResponse, AvailabilityResponse, BookAppointmentRequest,
    CancelRequest, DoctorSummary, PageResponse,
};
use super::query::{AppointmentListQuery, AvailabilityQuery, DoctorListQuery};
use super::state::HttpState;
use super::validation::path_id;

const PATIENT_ROLES: &[Role] = &[Role::Patient];

/// Doctor directory for patients.
#[utoipa::path(
    get,
    path = "/api/v1/patients/doctors",
    params(DoctorListQuery),
    responses(
        (status = 200, description = "Doctors", body = PageResponse<DoctorSummary>),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 403, description = "Not a patient", body = ErrorBody)
    ),
    tags = ["patients"],
    operation_id = "patientListDoctors",
    security(("bearer" = []))
)]
#[get("/doctors")]
pub async fn list_doctors(
    state: web::Data<HttpState>,
    auth: BearerAuth,
    query: web::Query<DoctorListQuery>,
) -> ApiResult<web::Json<PageResponse<DoctorSummary>>> {
    auth.require_any(PATIENT_ROLES)?;
    directory_page(&state, query.into_inner()).await.map(web::Json)
}

#[utoipa::path(
    get,
    path = "/api/v1/patients/doctors/{id}/availability",
    params(("id" = i64, Path, description = "Doctor id"), AvailabilityQuery),
    responses(
        (status = 200, description = "Available slots", body = AvailabilityResponse),
        (status = 400, description = "Invalid date format. Use YYYY-MM-DD", body = ErrorBody),
        (status = 404, description = "Doctor not found", body = ErrorBody)
    ),
    tags = ["patients"],
    operation_id = "patientDoctorAvailability",
    security(("bearer" = []))
)]
#[get("/doctors/{id}/availability")]
pub async fn availability(
    state: web::Data<HttpState>,
    auth: BearerAuth,
    path: web::Path<String>,
    query: web::Query<AvailabilityQuery>,
) -> ApiResult<web::Json<AvailabilityResponse>> {
    auth.require_any(PATIENT_ROLES)?;
    availability_for(&state, &path, query.into_inner())
        .await
        .map(web::Json)
}

/// Book a pending appointment in a free slot.
#[utoipa::path(
    post,
    path = "/api/v1/patients/appointments",
    request_body = BookAppointmentRequest,
    responses(
        (status = 201, description = "Appointment booked", body = AppointmentEnvelope),
        (status = 400, description = "Invalid doctor id or timestamp", body = ErrorBody),
        (status = 404, description = "Doctor not found", body = ErrorBody),
        (status = 409, description = "Doctor is not available at the requested time", body = ErrorBody)
    ),
    tags = ["patients"],
    operation_id = "bookAppointment",
    security(("bearer" = []))
)]
#[post("/appointments")]
pub async fn book_appointment(
    state: web::Data<HttpState>,
    auth: BearerAuth,
    payload: web::Json<BookAppointmentRequest>,
) -> ApiResult<HttpResponse> {
    auth.require_any(PATIENT_ROLES)?;
    let request = BookingRequest::try_from(payload.into_inner())?;
    let appointment = state.appointments.book(auth.user_id(), request).await?;
    Ok(HttpResponse::Created().json(AppointmentEnvelope::new(
        "Appointment booked successfully",
        appointment,
    )))
}

/// The calling patient's appointments, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/patients/appointments",
    params(AppointmentListQuery),
    responses(
        (status = 200, description = "Appointments", body = [AppointmentResponse]),
        (status = 400, description = "Invalid filter", body = ErrorBody),
        (status = 403, description = "Not a patient", body = ErrorBody)
    ),
    tags = ["patients"],
    operation_id = "listPatientAppointments",
    security(("bearer" = []))
)]
#[get("/appointments")]
pub async fn list_appointments(
    state: web::Data<HttpState>,
    auth: BearerAuth,
    query: web::Query<AppointmentListQuery>,
) -> ApiResult<web::Json<Vec<AppointmentResponse>>> {
    auth.require_any(PATIENT_ROLES)?;
    let filter = query.into_inner().parse()?;
    let appointments = state
        .appointments
        .list_for_patient(auth.user_id(), filter)
        .await?;
    Ok(web::Json(appointments.into_iter().map(Into::into).collect()))
}

/// Cancel a pending or confirmed appointment; the body is optional.
#[utoipa::path(
    put,
    path = "/api/v1/patients/appointments/{id}/cancel",
    params(("id" = i64, Path, description = "Appointment id")),
    request_body(content = CancelRequest, description = "Optional cancellation reason"),
    responses(
        (status = 200, description = "Appointment cancelled", body = AppointmentEnvelope),
        (status = 400, description = "Appointment cannot be cancelled", body = ErrorBody),
        (status = 404, description = "Appointment not found", body = ErrorBody),
        (status = 409, description = "Appointment changed concurrently", body = ErrorBody)
    ),
    tags = ["patients"],
    operation_id = "cancelAppointment",
    security(("bearer" = []))
)]
#[put("/appointments/{id}/cancel")]
pub async fn cancel_appointment(
    state: web::Data<HttpState>,
    auth: BearerAuth,
    path: web::Path<String>,
    payload: Option<web::Json<CancelRequest>>,
) -> ApiResult<web::Json<AppointmentEnvelope>> {
    auth.require_any(PATIENT_ROLES)?;
    let appointment_id: AppointmentId = path_id(&path)?;
    let reason = payload.and_then(|body| body.into_inner().reason);
    let appointment = state
        .appointments
        .cancel_as_patient(auth.user_id(), appointment_id, reason)
        .await?;
    Ok(web::Json(AppointmentEnvelope::new(
        "Appointment cancelled successfully",
        appointment,
    )))
}
