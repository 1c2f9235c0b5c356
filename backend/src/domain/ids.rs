//! Numeric identifiers for persisted aggregates.
//!
//! Rows use `BIGSERIAL` keys; every identifier is a strictly positive `i64`
//! newtype so a doctor id can never be passed where a user id is expected.

use serde::{Deserialize, Serialize};

/// Validation error raised when an identifier is not strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{kind} id must be a positive integer, got {value}")]
pub struct IdValidationError {
    kind: &'static str,
    value: i64,
}

impl IdValidationError {
    /// The rejected raw value.
    pub fn value(&self) -> i64 {
        self.value
    }
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident => $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "i64", into = "i64")]
        pub struct $name(i64);

        impl $name {
            /// Validate and wrap a raw key.
            pub fn new(value: i64) -> Result<Self, IdValidationError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(IdValidationError { kind: $kind, value })
                }
            }

            /// Raw key value.
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl TryFrom<i64> for $name {
            type Error = IdValidationError;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

define_id!(
    /// Primary key of a user account.
    UserId => "user"
);
define_id!(
    /// Primary key of a doctor profile.
    DoctorId => "doctor"
);
define_id!(
    /// Primary key of a schedule entry.
    ScheduleId => "schedule"
);
define_id!(
    /// Primary key of an appointment.
    AppointmentId => "appointment"
);
