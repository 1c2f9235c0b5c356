//! Shared Diesel error mapping for the repositories.
//!
//! Each repository passes its own port-error constructors; the helpers decide
//! whether a failure is a connectivity problem or a query problem. Unique
//! violations are surfaced separately so callers can turn a known constraint
//! into a domain-specific variant.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Partial unique index on live user emails.
pub(crate) const USERS_EMAIL_KEY: &str = "users_email_live_key";
/// Partial unique index on live `(doctor_id, start_time)` pairs.
pub(crate) const APPOINTMENT_SLOT_KEY: &str = "appointments_doctor_slot_key";

/// Map pool errors into a repository-specific connection error constructor.
pub(crate) fn map_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map common Diesel error variants into query/connection constructors.
pub(crate) fn map_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: FnOnce(&'static str) -> E,
    C: FnOnce(&'static str) -> E,
{
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(error = %error, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            query("unique constraint violated")
        }
        _ => query("database error"),
    }
}

/// Whether `error` is a unique violation of the named constraint or index.
pub(crate) fn is_unique_violation(error: &DieselError, constraint: &str) -> bool {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            info.constraint_name() == Some(constraint)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the shared mapping.

    use super::*;
    use diesel::result::DatabaseErrorInformation;
    use rstest::rstest;

    #[derive(Debug, PartialEq, Eq)]
    enum Mapped {
        Query(&'static str),
        Connection(&'static str),
    }

    struct Info {
        constraint: Option<&'static str>,
    }

    impl DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            self.constraint
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind, constraint: Option<&'static str>) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(Info { constraint }))
    }

    fn map(error: DieselError) -> Mapped {
        map_diesel_error(error, Mapped::Query, Mapped::Connection)
    }

    #[rstest]
    fn closed_connection_maps_to_connection() {
        assert_eq!(
            map(database_error(DatabaseErrorKind::ClosedConnection, None)),
            Mapped::Connection("database connection error")
        );
    }

    #[rstest]
    fn not_found_maps_to_query() {
        assert_eq!(map(DieselError::NotFound), Mapped::Query("record not found"));
    }

    #[rstest]
    #[case(Some(APPOINTMENT_SLOT_KEY), APPOINTMENT_SLOT_KEY, true)]
    #[case(Some(USERS_EMAIL_KEY), APPOINTMENT_SLOT_KEY, false)]
    #[case(None, USERS_EMAIL_KEY, false)]
    fn unique_violation_matches_constraint_name(
        #[case] reported: Option<&'static str>,
        #[case] wanted: &str,
        #[case] expected: bool,
    ) {
        let error = database_error(DatabaseErrorKind::UniqueViolation, reported);
        assert_eq!(is_unique_violation(&error, wanted), expected);
    }

    #[rstest]
    fn pool_checkout_maps_to_connection_message() {
        let mapped: String = map_pool_error(PoolError::checkout("refused"), |message| message);
        assert_eq!(mapped, "refused");
    }
}
