//! Request and response bodies for the REST API.
//!
//! Request types keep raw strings so validation errors can name the field
//! that failed. Response types are flat snake_case views of domain values;
//! password hashes never appear in any of them.

use chrono::{DateTime, NaiveDate, Utc};
use pagination::Page;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{Dashboard, Profile, ProfileUpdate};
use crate::domain::{
    Appointment, AppointmentStatus, AuthSession, Availability, BookingRequest, Credentials, Doctor,
    DoctorDraft, DoctorId, DoctorProfile, EmailAddress, Error, PersonName, PlainPassword,
    Registration, Role, Schedule, ScheduleDraft, Specialization, User,
};

use super::validation::{
    FieldName, invalid_field, parse_date, parse_rfc3339_timestamp, parse_status,
    parse_time, require,
};

const NAME: FieldName = FieldName::new("name");
const EMAIL: FieldName = FieldName::new("email");
const PASSWORD: FieldName = FieldName::new("password");
const ROLE: FieldName = FieldName::new("role");
const SPECIALIZATION: FieldName = FieldName::new("specialization");
const DOCTOR_ID: FieldName = FieldName::new("doctor_id");
const SCHEDULED_AT: FieldName = FieldName::new("scheduled_at");

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|raw| !raw.trim().is_empty())
}

/// Sign-up body. Doctor fields are read only when `role` is `doctor`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "jane@example.com")]
    pub email: String,
    #[schema(min_length = 8)]
    pub password: String,
    /// `patient` or `doctor`.
    #[schema(example = "patient")]
    pub role: String,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub qualification: Option<String>,
    /// Years of practice.
    #[serde(default)]
    pub experience: Option<i32>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub consultation_fee: Option<f64>,
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = Error;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        let role: Role = value
            .role
            .parse()
            .map_err(|err| invalid_field(ROLE, err))?;
        let doctor = if role == Role::Doctor {
            let specialization: Specialization =
                require(non_blank(value.specialization), SPECIALIZATION)?
                    .parse()
                    .map_err(|err| invalid_field(SPECIALIZATION, err))?;
            let draft = DoctorDraft::new(
                specialization,
                value.qualification.unwrap_or_default(),
                value.experience.unwrap_or_default(),
                value.bio.unwrap_or_default(),
                value.consultation_fee.unwrap_or_default(),
            )
            .map_err(|err| invalid_field(FieldName::new("doctor"), err))?;
            Some(draft)
        } else {
            None
        };
        Ok(Self {
            name: PersonName::new(value.name).map_err(|err| invalid_field(NAME, err))?,
            email: EmailAddress::new(&value.email).map_err(|err| invalid_field(EMAIL, err))?,
            password: PlainPassword::new(value.password)
                .map_err(|err| invalid_field(PASSWORD, err))?,
            role,
            doctor,
        })
    }
}

/// Login body.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "jane@example.com")]
    pub email: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for Credentials {
    type Error = Error;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        if value.password.is_empty() {
            return Err(super::validation::missing_field_error(PASSWORD));
        }
        Ok(Self {
            email: EmailAddress::new(&value.email).map_err(|err| invalid_field(EMAIL, err))?,
            password: PlainPassword::unchecked(value.password),
        })
    }
}

/// Minimal account view returned with a token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.get(),
            name: user.name.to_string(),
            email: user.email.to_string(),
            role: user.role,
        }
    }
}

/// `{token, user}` returned by register and login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserSummary,
}

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            user: UserSummary::from(&session.user),
            token: session.token,
        }
    }
}

/// Full account view.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.get(),
            name: user.name.into(),
            email: user.email.into(),
            role: user.role,
            active: user.active,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Stored doctor profile as seen by its owner or an admin.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DoctorRecord {
    pub id: i64,
    pub user_id: i64,
    pub specialization: Specialization,
    pub qualification: String,
    pub experience: i32,
    pub bio: String,
    pub consultation_fee: f64,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Doctor> for DoctorRecord {
    fn from(doctor: Doctor) -> Self {
        Self {
            id: doctor.id.get(),
            user_id: doctor.user_id.get(),
            specialization: doctor.specialization,
            qualification: doctor.qualification,
            experience: doctor.experience_years,
            bio: doctor.bio,
            consultation_fee: doctor.consultation_fee,
            available: doctor.available,
            created_at: doctor.created_at,
            updated_at: doctor.updated_at,
        }
    }
}

/// `{user, doctor?}` returned by `GET /users/profile`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub user: UserResponse,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor: Option<DoctorRecord>,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            user: profile.user.into(),
            doctor: profile.doctor.map(DoctorRecord::from),
        }
    }
}

/// Profile edits; absent or blank fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl TryFrom<UpdateProfileRequest> for ProfileUpdate {
    type Error = Error;

    fn try_from(value: UpdateProfileRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: non_blank(value.name)
                .map(PersonName::new)
                .transpose()
                .map_err(|err| invalid_field(NAME, err))?,
            email: non_blank(value.email)
                .map(EmailAddress::new)
                .transpose()
                .map_err(|err| invalid_field(EMAIL, err))?,
            password: value
                .password
                .filter(|raw| !raw.is_empty())
                .map(PlainPassword::new)
                .transpose()
                .map_err(|err| invalid_field(PASSWORD, err))?,
        })
    }
}

/// `{message, user}` returned after a profile edit.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileUpdatedResponse {
    pub message: String,
    pub user: UserResponse,
}

/// Public doctor directory entry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DoctorSummary {
    pub id: i64,
    #[schema(example = "Dr. John Smith")]
    pub name: String,
    pub specialization: Specialization,
    pub qualification: String,
    pub experience: i32,
    pub bio: String,
    pub consultation_fee: f64,
}

impl From<DoctorProfile> for DoctorSummary {
    fn from(profile: DoctorProfile) -> Self {
        let DoctorProfile { doctor, name, .. } = profile;
        Self {
            id: doctor.id.get(),
            name: name.into(),
            specialization: doctor.specialization,
            qualification: doctor.qualification,
            experience: doctor.experience_years,
            bio: doctor.bio,
            consultation_fee: doctor.consultation_fee,
        }
    }
}

/// Public doctor profile including the contact email.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DoctorDetail {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub specialization: Specialization,
    pub qualification: String,
    pub experience: i32,
    pub bio: String,
    pub consultation_fee: f64,
}

impl From<DoctorProfile> for DoctorDetail {
    fn from(profile: DoctorProfile) -> Self {
        let DoctorProfile {
            doctor,
            name,
            email,
        } = profile;
        Self {
            id: doctor.id.get(),
            name: name.into(),
            email: email.into(),
            specialization: doctor.specialization,
            qualification: doctor.qualification,
            experience: doctor.experience_years,
            bio: doctor.bio,
            consultation_fee: doctor.consultation_fee,
        }
    }
}

/// Free slots for one doctor on one day.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AvailabilityResponse {
    pub doctor_id: i64,
    #[schema(value_type = String, example = "2025-03-10")]
    pub date: NaiveDate,
    /// Slot start times as `HH:MM`.
    #[schema(example = json!(["09:00", "09:30"]))]
    pub available_slots: Vec<String>,
}

impl From<Availability> for AvailabilityResponse {
    fn from(availability: Availability) -> Self {
        Self {
            doctor_id: availability.doctor_id.get(),
            date: availability.date,
            available_slots: availability
                .available_slots
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

/// Body for `POST /doctors/schedules`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ScheduleRequest {
    #[schema(example = "2025-03-10")]
    pub date: String,
    #[schema(example = "09:00")]
    pub start_time: String,
    #[schema(example = "17:00")]
    pub end_time: String,
}

impl TryFrom<ScheduleRequest> for ScheduleDraft {
    type Error = Error;

    fn try_from(value: ScheduleRequest) -> Result<Self, Self::Error> {
        let date = parse_date(&value.date, FieldName::new("date"))?;
        let start = parse_time(&value.start_time, FieldName::new("start_time"))?;
        let end = parse_time(&value.end_time, FieldName::new("end_time"))?;
        Self::new(date, start, end).map_err(|err| invalid_field(FieldName::new("end_time"), err))
    }
}

/// Stored schedule window.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScheduleResponse {
    pub id: i64,
    pub doctor_id: i64,
    #[schema(value_type = String, example = "2025-03-10")]
    pub date: NaiveDate,
    #[schema(example = "09:00")]
    pub start_time: String,
    #[schema(example = "17:00")]
    pub end_time: String,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Schedule> for ScheduleResponse {
    fn from(schedule: Schedule) -> Self {
        Self {
            id: schedule.id.get(),
            doctor_id: schedule.doctor_id.get(),
            date: schedule.date,
            start_time: schedule.start_time.to_string(),
            end_time: schedule.end_time.to_string(),
            is_available: schedule.is_available,
            created_at: schedule.created_at,
            updated_at: schedule.updated_at,
        }
    }
}

/// `{message, schedule}` returned after creating a schedule.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScheduleCreatedResponse {
    pub message: String,
    pub schedule: ScheduleResponse,
}

/// Body for `POST /patients/appointments`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BookAppointmentRequest {
    pub doctor_id: i64,
    /// RFC 3339 start of the slot.
    #[schema(example = "2025-03-10T09:30:00Z")]
    pub scheduled_at: String,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl TryFrom<BookAppointmentRequest> for BookingRequest {
    type Error = Error;

    fn try_from(value: BookAppointmentRequest) -> Result<Self, Self::Error> {
        let doctor_id = DoctorId::new(value.doctor_id).map_err(|err| invalid_field(DOCTOR_ID, err))?;
        Ok(Self {
            doctor_id,
            scheduled_at: parse_rfc3339_timestamp(&value.scheduled_at, SCHEDULED_AT)?,
            reason: value.reason,
            notes: value.notes,
        })
    }
}

/// Appointment view shared by every role.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AppointmentResponse {
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    #[schema(value_type = String, example = "2025-03-10")]
    pub appointment_date: NaiveDate,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub reason: Option<String>,
    pub notes: Option<String>,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Appointment> for AppointmentResponse {
    fn from(appointment: Appointment) -> Self {
        Self {
            id: appointment.id.get(),
            patient_id: appointment.patient_id.get(),
            doctor_id: appointment.doctor_id.get(),
            appointment_date: appointment.appointment_date,
            start_time: appointment.start_time,
            end_time: appointment.end_time,
            status: appointment.status,
            reason: appointment.reason,
            notes: appointment.notes,
            cancellation_reason: appointment.cancellation_reason,
            created_at: appointment.created_at,
            updated_at: appointment.updated_at,
        }
    }
}

/// `{message, appointment}` returned by booking and lifecycle endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AppointmentEnvelope {
    pub message: String,
    pub appointment: AppointmentResponse,
}

impl AppointmentEnvelope {
    pub(crate) fn new(message: &str, appointment: Appointment) -> Self {
        Self {
            message: message.to_owned(),
            appointment: appointment.into(),
        }
    }
}

/// Body for `PUT /doctors/appointments/{id}/status`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct StatusUpdateRequest {
    /// `confirmed`, `cancelled` or `completed`.
    #[schema(example = "confirmed")]
    pub status: String,
}

impl StatusUpdateRequest {
    pub(crate) fn status(&self) -> Result<AppointmentStatus, Error> {
        parse_status(&self.status, FieldName::new("status"))
    }
}

/// Optional body for `PUT /patients/appointments/{id}/cancel`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CancelRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

/// Body for `PUT /admin/users/{id}/status`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UserStatusRequest {
    pub active: bool,
}

/// Plain `{message}` acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub(crate) fn new(message: &str) -> Self {
        Self {
            message: message.to_owned(),
        }
    }
}

/// Doctor dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardResponse {
    pub doctor: DoctorRecord,
    pub today_appointments: Vec<AppointmentResponse>,
    pub upcoming_appointments: Vec<AppointmentResponse>,
}

impl From<Dashboard> for DashboardResponse {
    fn from(dashboard: Dashboard) -> Self {
        Self {
            doctor: dashboard.doctor.into(),
            today_appointments: dashboard.today.into_iter().map(Into::into).collect(),
            upcoming_appointments: dashboard.upcoming.into_iter().map(Into::into).collect(),
        }
    }
}

/// `{data, total, page, limit}` collection envelope.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PageResponse<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

impl<T> PageResponse<T> {
    pub(crate) fn from_page<U>(page: Page<U>) -> Self
    where
        T: From<U>,
    {
        let Page {
            data,
            total,
            page,
            limit,
        } = page.map(T::from);
        Self {
            data,
            total,
            page,
            limit,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Conversion coverage for request bodies.

    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    fn register(role: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Jane Doe".into(),
            email: "Jane@Example.com".into(),
            password: "password123".into(),
            role: role.into(),
            specialization: None,
            qualification: None,
            experience: None,
            bio: None,
            consultation_fee: None,
        }
    }

    #[rstest]
    fn patient_registration_has_no_doctor_draft() {
        let registration = Registration::try_from(register("patient")).expect("valid");
        assert_eq!(registration.role, Role::Patient);
        assert!(registration.doctor.is_none());
        assert_eq!(registration.email.as_ref(), "jane@example.com");
    }

    #[rstest]
    fn doctor_registration_requires_specialization() {
        let err = Registration::try_from(register("doctor")).expect_err("missing field");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.details().expect("details")["field"], "specialization");
    }

    #[rstest]
    fn doctor_registration_builds_draft() {
        let request = RegisterRequest {
            specialization: Some("Cardiology".into()),
            qualification: Some("MD".into()),
            experience: Some(7),
            consultation_fee: Some(99.5),
            ..register("doctor")
        };
        let registration = Registration::try_from(request).expect("valid");
        let draft = registration.doctor.expect("doctor draft");
        assert_eq!(draft.specialization, Specialization::Cardiology);
        assert_eq!(draft.experience_years, 7);
    }

    #[rstest]
    #[case("nurse", "role")]
    #[case("patient", "password")]
    fn invalid_registration_names_field(#[case] role: &str, #[case] field: &str) {
        let request = RegisterRequest {
            password: if field == "password" { "short".into() } else { "password123".into() },
            ..register(role)
        };
        let err = Registration::try_from(request).expect_err("invalid");
        assert_eq!(err.details().expect("details")["field"], field);
    }

    #[rstest]
    fn blank_profile_fields_are_unchanged() {
        let update = ProfileUpdate::try_from(UpdateProfileRequest {
            name: Some("  ".into()),
            email: None,
            password: Some(String::new()),
        })
        .expect("valid");
        assert!(update.name.is_none());
        assert!(update.email.is_none());
        assert!(update.password.is_none());
    }

    #[rstest]
    fn short_new_password_is_rejected() {
        let err = ProfileUpdate::try_from(UpdateProfileRequest {
            password: Some("short".into()),
            ..UpdateProfileRequest::default()
        })
        .expect_err("too short");
        assert_eq!(err.details().expect("details")["field"], "password");
    }

    #[rstest]
    fn schedule_end_must_follow_start() {
        let err = ScheduleDraft::try_from(ScheduleRequest {
            date: "2025-03-10".into(),
            start_time: "12:00".into(),
            end_time: "09:00".into(),
        })
        .expect_err("inverted window");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[case(0, "2025-03-10T09:00:00Z", "doctor_id")]
    #[case(1, "2025-03-10 09:00", "scheduled_at")]
    fn invalid_booking_names_field(#[case] doctor_id: i64, #[case] at: &str, #[case] field: &str) {
        let err = BookingRequest::try_from(BookAppointmentRequest {
            doctor_id,
            scheduled_at: at.into(),
            reason: None,
            notes: None,
        })
        .expect_err("invalid booking");
        assert_eq!(err.details().expect("details")["field"], field);
    }

    #[rstest]
    fn page_response_keeps_metadata() {
        let page = Page::new(vec![1_i64, 2], 12, pagination::PageRequest::new(Some(2), Some(2)));
        let response: PageResponse<i64> = PageResponse::from_page(page);
        assert_eq!(response.data, vec![1, 2]);
        assert_eq!((response.total, response.page, response.limit), (12, 2, 2));
    }
}
