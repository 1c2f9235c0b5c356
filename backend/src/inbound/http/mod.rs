//! HTTP inbound adapter exposing the `/api/v1` REST endpoints.
//!
//! Handlers depend only on the driving ports held in [`state::HttpState`];
//! [`api_scope`] mounts every route so the server and tests share one table.

pub mod admin;
pub mod auth;
pub mod bearer;
pub mod doctors;
pub mod dto;
pub mod error;
pub mod health;
pub mod patients;
pub mod query;
pub mod state;
#[cfg(test)]
pub(crate) mod test_utils;
pub mod users;
pub mod validation;

use actix_web::{Scope, web};

use crate::domain::Error;

pub use error::ApiResult;

/// Base path shared by every versioned endpoint.
pub const API_PREFIX: &str = "/api/v1";

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("Invalid request body: {err}")).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("Invalid query string: {err}")).into()
    })
}

/// Every `/api/v1` route.
///
/// Literal doctor routes are registered before `/doctors/{id}` so that
/// `/doctors/dashboard` never reaches the id parser.
pub fn api_scope() -> Scope {
    web::scope(API_PREFIX)
        .app_data(json_config())
        .app_data(query_config())
        .service(
            web::scope("/auth")
                .service(auth::register)
                .service(auth::login),
        )
        .service(
            web::scope("/users")
                .service(users::get_profile)
                .service(users::update_profile),
        )
        .service(
            web::scope("/doctors")
                .service(doctors::dashboard)
                .service(doctors::create_schedule)
                .service(doctors::list_appointments)
                .service(doctors::update_appointment_status)
                .service(doctors::list_doctors)
                .service(doctors::availability)
                .service(doctors::get_doctor),
        )
        .service(
            web::scope("/patients")
                .service(patients::list_doctors)
                .service(patients::availability)
                .service(patients::book_appointment)
                .service(patients::list_appointments)
                .service(patients::cancel_appointment),
        )
        .service(
            web::scope("/admin")
                .service(admin::list_users)
                .service(admin::set_user_status)
                .service(admin::list_appointments),
        )
}
