//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data` so they only depend
//! on domain ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AppointmentService, AuthService, DoctorService, TokenService, UserService,
};

/// Parameter object bundling the port implementations used by handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub auth: Arc<dyn AuthService>,
    pub users: Arc<dyn UserService>,
    pub doctors: Arc<dyn DoctorService>,
    pub appointments: Arc<dyn AppointmentService>,
    pub tokens: Arc<dyn TokenService>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub auth: Arc<dyn AuthService>,
    pub users: Arc<dyn UserService>,
    pub doctors: Arc<dyn DoctorService>,
    pub appointments: Arc<dyn AppointmentService>,
    /// Verifies bearer tokens for [`super::bearer::BearerAuth`].
    pub tokens: Arc<dyn TokenService>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            auth,
            users,
            doctors,
            appointments,
            tokens,
        } = ports;
        Self {
            auth,
            users,
            doctors,
            appointments,
            tokens,
        }
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    pub fn new(ports: HttpStatePorts) -> Self {
        ports.into()
    }
}
