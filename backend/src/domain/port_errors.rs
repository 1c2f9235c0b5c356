//! Translation of driven-port failures into domain errors.
//!
//! Connection failures surface as `503`; query failures become redacted
//! internal errors. Port-specific variants with business meaning are handled
//! by the calling service before falling back to these helpers.

use tracing::error;

use super::Error;
use super::ports::{
    AppointmentPersistenceError, DoctorPersistenceError, PasswordHashError, TokenError,
    UserPersistenceError,
};

pub(crate) fn user_error(err: UserPersistenceError) -> Error {
    match err {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user store unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            error!(%message, "user repository query failed");
            Error::internal(format!("user store error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { .. } => {
            Error::invalid_request("Email already registered")
        }
    }
}

pub(crate) fn doctor_error(err: DoctorPersistenceError) -> Error {
    match err {
        DoctorPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("doctor store unavailable: {message}"))
        }
        DoctorPersistenceError::Query { message } => {
            error!(%message, "doctor repository query failed");
            Error::internal(format!("doctor store error: {message}"))
        }
    }
}

pub(crate) fn appointment_error(err: AppointmentPersistenceError) -> Error {
    match err {
        AppointmentPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("appointment store unavailable: {message}"))
        }
        AppointmentPersistenceError::Query { message } => {
            error!(%message, "appointment repository query failed");
            Error::internal(format!("appointment store error: {message}"))
        }
        AppointmentPersistenceError::SlotTaken => slot_unavailable(),
    }
}

pub(crate) fn hash_error(err: PasswordHashError) -> Error {
    error!(error = %err, "password hashing failed");
    Error::internal(err.to_string())
}

pub(crate) fn token_error(err: TokenError) -> Error {
    match err {
        TokenError::Issue { message } => {
            error!(%message, "token signing failed");
            Error::internal(format!("failed to issue token: {message}"))
        }
        TokenError::Invalid { .. } => Error::unauthorized("Invalid or expired token"),
        TokenError::Expired => Error::unauthorized("Invalid or expired token"),
    }
}

pub(crate) fn slot_unavailable() -> Error {
    Error::conflict("Doctor is not available at the requested time")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(UserPersistenceError::connection("down"), ErrorCode::ServiceUnavailable)]
    #[case(UserPersistenceError::query("syntax"), ErrorCode::InternalError)]
    #[case(UserPersistenceError::duplicate_email("a@b.co"), ErrorCode::InvalidRequest)]
    fn user_errors_map_to_codes(#[case] err: UserPersistenceError, #[case] code: ErrorCode) {
        assert_eq!(user_error(err).code(), code);
    }

    #[rstest]
    fn slot_taken_is_a_conflict() {
        let err = appointment_error(AppointmentPersistenceError::slot_taken());
        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(err.message(), "Doctor is not available at the requested time");
    }

    #[rstest]
    #[case(TokenError::expired(), ErrorCode::Unauthorized)]
    #[case(TokenError::invalid("bad signature"), ErrorCode::Unauthorized)]
    #[case(TokenError::issue("key"), ErrorCode::InternalError)]
    fn token_errors_map_to_codes(#[case] err: TokenError, #[case] code: ErrorCode) {
        assert_eq!(token_error(err).code(), code);
    }
}
