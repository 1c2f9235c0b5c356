//! Builders wiring the Diesel adapters into the HTTP driving ports.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use booking_backend::domain::{
    AppointmentServiceImpl, AuthServiceImpl, DoctorServiceImpl, UserServiceImpl,
};
use booking_backend::inbound::http::state::{HttpState, HttpStatePorts};
use booking_backend::outbound::persistence::{
    DbPool, DieselAppointmentRepository, DieselDoctorRepository, DieselUserRepository,
};
use booking_backend::outbound::security::{Argon2PasswordHasher, JwtTokenService};

use super::config::TokenSettings;

/// One repository of each kind sharing a pool.
struct Repositories {
    users: Arc<DieselUserRepository>,
    doctors: Arc<DieselDoctorRepository>,
    appointments: Arc<DieselAppointmentRepository>,
}

impl Repositories {
    fn new(pool: &DbPool) -> Self {
        Self {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            doctors: Arc::new(DieselDoctorRepository::new(pool.clone())),
            appointments: Arc::new(DieselAppointmentRepository::new(pool.clone())),
        }
    }
}

/// Build the shared handler state over PostgreSQL.
pub(crate) fn build_http_state(pool: &DbPool, token_settings: &TokenSettings) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let repos = Repositories::new(pool);
    let hasher = Arc::new(Argon2PasswordHasher::default());
    let tokens = Arc::new(JwtTokenService::new(
        token_settings.secret.as_bytes(),
        token_settings.ttl,
        clock.clone(),
    ));

    let ports = HttpStatePorts {
        auth: Arc::new(AuthServiceImpl::new(
            repos.users.clone(),
            hasher.clone(),
            tokens.clone(),
            clock.clone(),
        )),
        users: Arc::new(UserServiceImpl::new(
            repos.users.clone(),
            repos.doctors.clone(),
            hasher,
        )),
        doctors: Arc::new(DoctorServiceImpl::new(
            repos.doctors.clone(),
            repos.appointments.clone(),
            clock,
        )),
        appointments: Arc::new(AppointmentServiceImpl::new(
            repos.doctors,
            repos.appointments,
        )),
        tokens,
    };
    web::Data::new(HttpState::new(ports))
}

/// Users repository and hasher used by the `seed` subcommand.
pub(crate) fn seed_adapters(pool: &DbPool) -> (Arc<DieselUserRepository>, Arc<Argon2PasswordHasher>) {
    (
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(Argon2PasswordHasher::default()),
    )
}
