//! Full HTTP stack over the in-memory store.
//!
//! Integration suites build a [`TestBackend`], seed it, then drive
//! [`TestBackend::app`] through `actix_web::test` exactly as the server would
//! serve it: real services, real JWTs and Argon2 hashes (with cheap cost
//! parameters), and the `Trace` middleware.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use argon2::Params;
use chrono::TimeDelta;
use mockable::Clock;

use crate::Trace;
use crate::domain::seed::{SeedError, SeedOutcome, Seeder};
use crate::domain::{
    AppointmentServiceImpl, AuthServiceImpl, DoctorServiceImpl, UserServiceImpl,
};
use crate::inbound::http::api_scope;
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::security::{Argon2PasswordHasher, JwtTokenService};

use super::FixedClock;
use super::memory::InMemoryStore;

/// Secret the test token service signs with.
pub const TEST_JWT_SECRET: &[u8] = b"integration-test-secret";

/// Monday 2025-03-10, one hour before the clinic opens.
pub const DEFAULT_NOW: &str = "2025-03-10T08:00:00Z";

/// Argon2id with the smallest parameters the crate accepts.
///
/// # Panics
///
/// Panics if the argon2 crate rejects the parameters.
pub fn fast_hasher() -> Argon2PasswordHasher {
    match Params::new(8, 1, 1, None) {
        Ok(params) => Argon2PasswordHasher::with_params(params),
        Err(err) => panic!("argon2 test params: {err}"),
    }
}

/// In-memory adapters wired to the production services.
pub struct TestBackend {
    pub store: Arc<InMemoryStore>,
    pub clock: Arc<FixedClock>,
    pub tokens: Arc<JwtTokenService>,
    hasher: Arc<Argon2PasswordHasher>,
    state: web::Data<HttpState>,
}

impl Default for TestBackend {
    fn default() -> Self {
        Self::at(DEFAULT_NOW)
    }
}

impl TestBackend {
    /// Build a backend whose clock is frozen at `now`.
    pub fn at(now: &str) -> Self {
        let clock = Arc::new(FixedClock::at(now));
        let shared_clock: Arc<dyn Clock> = clock.clone();
        let store = Arc::new(InMemoryStore::new(shared_clock.clone()));
        let hasher = Arc::new(fast_hasher());
        let tokens = Arc::new(JwtTokenService::new(
            TEST_JWT_SECRET,
            TimeDelta::hours(24),
            shared_clock.clone(),
        ));

        let ports = HttpStatePorts {
            auth: Arc::new(AuthServiceImpl::new(
                store.clone(),
                hasher.clone(),
                tokens.clone(),
                shared_clock.clone(),
            )),
            users: Arc::new(UserServiceImpl::new(
                store.clone(),
                store.clone(),
                hasher.clone(),
            )),
            doctors: Arc::new(DoctorServiceImpl::new(
                store.clone(),
                store.clone(),
                shared_clock,
            )),
            appointments: Arc::new(AppointmentServiceImpl::new(store.clone(), store.clone())),
            tokens: tokens.clone(),
        };

        Self {
            store,
            clock,
            tokens,
            hasher,
            state: web::Data::new(HttpState::new(ports)),
        }
    }

    /// Create the admin and sample doctors.
    ///
    /// # Errors
    ///
    /// Propagates [`SeedError`] from the seeder.
    pub async fn seed(&self) -> Result<SeedOutcome, SeedError> {
        Seeder::new(self.store.clone(), self.hasher.clone())
            .run()
            .await
    }

    /// Shared handler state.
    pub fn state(&self) -> web::Data<HttpState> {
        self.state.clone()
    }

    /// The application as served, minus Swagger and metrics.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        let health = web::Data::new(HealthState::new());
        health.mark_ready();
        App::new()
            .app_data(self.state())
            .app_data(health)
            .wrap(Trace)
            .service(api_scope())
            .service(ready)
            .service(live)
    }
}
