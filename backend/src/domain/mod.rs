//! Domain primitives, aggregates and use-cases.
//!
//! Purpose: define the strongly typed booking model (accounts, doctors,
//! schedules, appointments) and the services that enforce its rules. Inbound
//! adapters call the driving ports in [`ports`]; outbound adapters implement
//! the driven ones.
//!
//! Public surface:
//! - Error / ErrorCode: the failure type every service returns.
//! - Value types: ids, [`PersonName`], [`EmailAddress`], [`PlainPassword`],
//!   [`TimeOfDay`], [`Specialization`], [`AppointmentStatus`].
//! - Services: [`AuthServiceImpl`], [`UserServiceImpl`],
//!   [`DoctorServiceImpl`], [`AppointmentServiceImpl`].

pub mod appointment;
pub mod auth;
pub mod availability;
pub mod doctor;
pub mod error;
pub mod ids;
pub mod ports;
pub mod schedule;
pub mod seed;
pub mod trace_id;
pub mod user;

mod appointment_service;
mod auth_service;
mod doctor_service;
mod port_errors;
mod user_service;

pub use self::appointment::{
    AdminAppointmentFilter, Appointment, AppointmentFilter, AppointmentStatus, BookingRequest,
    NewAppointment, SLOT_MINUTES, UnknownStatus, slot_duration,
};
pub use self::appointment_service::AppointmentServiceImpl;
pub use self::auth::{AuthSession, AuthenticatedUser, Credentials, Registration};
pub use self::auth_service::AuthServiceImpl;
pub use self::availability::{Availability, DailyWindow};
pub use self::doctor::{
    Doctor, DoctorDraft, DoctorProfile, DoctorValidationError, Specialization,
};
pub use self::doctor_service::DoctorServiceImpl;
pub use self::error::{Error, ErrorBody, ErrorCode, ErrorValidationError};
pub use self::ids::{AppointmentId, DoctorId, IdValidationError, ScheduleId, UserId};
pub use self::schedule::{Schedule, ScheduleDraft, ScheduleValidationError, TimeOfDay};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{EmailAddress, PersonName, PlainPassword, Role, User, UserValidationError};
pub use self::user_service::UserServiceImpl;

pub(crate) use self::port_errors::token_error;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use booking_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
