//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every `/api/v1` handler, the request and response
//! DTOs, and the bearer security scheme. The document backs Swagger UI in
//! debug builds and is printed by `cargo run --bin openapi-dump`.

use crate::domain::{AppointmentStatus, ErrorBody, ErrorCode, Role, Specialization};
use crate::inbound::http::dto::{
    AppointmentEnvelope, AppointmentResponse, AuthResponse, AvailabilityResponse,
    BookAppointmentRequest, CancelRequest, DashboardResponse, DoctorDetail, DoctorRecord,
    DoctorSummary, LoginRequest, MessageResponse, PageResponse, ProfileResponse,
    ProfileUpdatedResponse, RegisterRequest, ScheduleCreatedResponse, ScheduleRequest,
    ScheduleResponse, StatusUpdateRequest, UpdateProfileRequest, UserResponse, UserStatusRequest,
    UserSummary,
};
use crate::inbound::http::{admin, auth, doctors, health, patients, users};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Security scheme name referenced by `security(("bearer" = []))`.
pub const BEARER_SCHEME: &str = "bearer";

/// Adds the JWT bearer scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token returned by POST /api/v1/auth/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Doctor booking API",
        description = "Accounts, doctor directory, availability and appointment booking."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        auth::register,
        auth::login,
        users::get_profile,
        users::update_profile,
        doctors::list_doctors,
        doctors::get_doctor,
        doctors::availability,
        doctors::dashboard,
        doctors::create_schedule,
        doctors::list_appointments,
        doctors::update_appointment_status,
        patients::list_doctors,
        patients::availability,
        patients::book_appointment,
        patients::list_appointments,
        patients::cancel_appointment,
        admin::list_users,
        admin::set_user_status,
        admin::list_appointments,
        health::ready,
        health::live,
    ),
    components(schemas(
        ErrorBody,
        ErrorCode,
        Role,
        Specialization,
        AppointmentStatus,
        RegisterRequest,
        LoginRequest,
        AuthResponse,
        UserSummary,
        UserResponse,
        DoctorRecord,
        ProfileResponse,
        UpdateProfileRequest,
        ProfileUpdatedResponse,
        DoctorSummary,
        DoctorDetail,
        AvailabilityResponse,
        ScheduleRequest,
        ScheduleResponse,
        ScheduleCreatedResponse,
        BookAppointmentRequest,
        AppointmentResponse,
        AppointmentEnvelope,
        StatusUpdateRequest,
        CancelRequest,
        UserStatusRequest,
        MessageResponse,
        DashboardResponse,
        PageResponse<DoctorSummary>,
        PageResponse<UserResponse>,
        PageResponse<AppointmentResponse>,
    )),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "users", description = "Caller profile"),
        (name = "doctors", description = "Doctor directory and doctor self-service"),
        (name = "patients", description = "Booking and cancelling appointments"),
        (name = "admin", description = "Account moderation and global listings"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
