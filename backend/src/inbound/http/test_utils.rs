//! Test helpers for inbound HTTP handlers.
//!
//! Handlers are exercised through the real `/api/v1` scope with mocked
//! driving ports. Bearer tokens are the role names: `Bearer patient` is user
//! 1, `Bearer doctor` is user 2 and `Bearer admin` is user 3.

use std::sync::Arc;

use actix_web::dev::ServiceResponse;
use actix_web::http::header;
use actix_web::{App, test, web};

use crate::domain::ports::{
    MockAppointmentService, MockAuthService, MockDoctorService, MockTokenService,
    MockUserService, TokenError,
};
use crate::domain::{AuthenticatedUser, Role, UserId};

use super::api_scope;
use super::state::{HttpState, HttpStatePorts};

pub(crate) const PATIENT_ID: i64 = 1;
pub(crate) const DOCTOR_USER_ID: i64 = 2;
pub(crate) const ADMIN_ID: i64 = 3;

/// Mocked driving ports; set expectations before calling [`MockPorts::call`].
#[derive(Default)]
pub(crate) struct MockPorts {
    pub auth: MockAuthService,
    pub users: MockUserService,
    pub doctors: MockDoctorService,
    pub appointments: MockAppointmentService,
}

fn role_tokens() -> MockTokenService {
    let mut tokens = MockTokenService::new();
    tokens.expect_verify().returning(|token| {
        let (id, role) = match token {
            "patient" => (PATIENT_ID, Role::Patient),
            "doctor" => (DOCTOR_USER_ID, Role::Doctor),
            "admin" => (ADMIN_ID, Role::Admin),
            _ => return Err(TokenError::invalid("unknown test token")),
        };
        Ok(AuthenticatedUser {
            user_id: UserId::new(id).expect("fixture id"),
            email: format!("{token}@example.com"),
            role,
        })
    });
    tokens
}

impl MockPorts {
    fn into_state(self) -> HttpState {
        HttpState::new(HttpStatePorts {
            auth: Arc::new(self.auth),
            users: Arc::new(self.users),
            doctors: Arc::new(self.doctors),
            appointments: Arc::new(self.appointments),
            tokens: Arc::new(role_tokens()),
        })
    }

    /// Run one request through the API scope.
    pub(crate) async fn call(self, request: test::TestRequest) -> ServiceResponse {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(self.into_state()))
                .service(api_scope()),
        )
        .await;
        test::call_service(&app, request.to_request()).await
    }
}

/// Attach `Authorization: Bearer <role>`.
pub(crate) fn as_role(request: test::TestRequest, role: Role) -> test::TestRequest {
    request.insert_header((header::AUTHORIZATION, format!("Bearer {role}")))
}

pub(crate) fn user_id(raw: i64) -> UserId {
    UserId::new(raw).expect("fixture id")
}
