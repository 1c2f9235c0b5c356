//! Domain ports.
//!
//! Driving ports (`*_service`) are the use-cases HTTP handlers call. Driven
//! ports (`*_repository`, [`TokenService`], [`PasswordHasher`]) are
//! implemented by outbound adapters.

mod macros;

mod appointment_repository;
mod appointment_service;
mod auth_service;
mod doctor_repository;
mod doctor_service;
mod password_hasher;
mod token_service;
mod user_repository;
mod user_service;

pub(crate) use macros::define_port_error;

pub use appointment_repository::{
    AppointmentOwner, AppointmentPersistenceError, AppointmentRepository, StatusChange,
};
#[cfg(test)]
pub use appointment_repository::MockAppointmentRepository;
pub use appointment_service::AppointmentService;
#[cfg(test)]
pub use appointment_service::MockAppointmentService;
pub use auth_service::AuthService;
#[cfg(test)]
pub use auth_service::MockAuthService;
pub use doctor_repository::{DoctorListFilter, DoctorPersistenceError, DoctorRepository};
#[cfg(test)]
pub use doctor_repository::MockDoctorRepository;
pub use doctor_service::{DASHBOARD_UPCOMING_LIMIT, Dashboard, DoctorService};
#[cfg(test)]
pub use doctor_service::MockDoctorService;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use token_service::{TokenError, TokenService};
#[cfg(test)]
pub use token_service::MockTokenService;
pub use user_repository::{
    CreatedAccount, NewAccount, ProfileChanges, UserListFilter, UserPersistenceError,
    UserRepository,
};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_service::{Profile, ProfileUpdate, UserService};
#[cfg(test)]
pub use user_service::MockUserService;
