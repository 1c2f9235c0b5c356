//! Appointments and their status lifecycle.
//!
//! ```text
//! pending   -> confirmed | cancelled | completed
//! confirmed -> cancelled | completed
//! cancelled, completed: terminal
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ids::{AppointmentId, DoctorId, UserId};

/// Length of every appointment slot in minutes.
pub const SLOT_MINUTES: i64 = 30;

/// Length of every appointment slot.
pub fn slot_duration() -> Duration {
    Duration::minutes(SLOT_MINUTES)
}

/// Appointment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

/// Raised when parsing an unknown status name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("status must be one of pending, confirmed, cancelled, completed (got '{value}')")]
pub struct UnknownStatus {
    value: String,
}

impl AppointmentStatus {
    /// Lowercase wire and storage name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    /// Active appointments still occupy the doctor's calendar and may change.
    pub fn is_active(self) -> bool {
        match self {
            Self::Pending | Self::Confirmed => true,
            Self::Cancelled | Self::Completed => false,
        }
    }

    /// Whether the lifecycle allows moving from `self` to `next`.
    pub fn can_transition_to(self, next: Self) -> bool {
        match (self, next) {
            (Self::Pending, Self::Confirmed | Self::Cancelled | Self::Completed) => true,
            (Self::Confirmed, Self::Cancelled | Self::Completed) => true,
            (Self::Pending, Self::Pending)
            | (Self::Confirmed, Self::Pending | Self::Confirmed)
            | (Self::Cancelled | Self::Completed, _) => false,
        }
    }

    /// Whether a doctor may set this status explicitly.
    pub fn is_doctor_target(self) -> bool {
        match self {
            Self::Confirmed | Self::Cancelled | Self::Completed => true,
            Self::Pending => false,
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            _ => Err(UnknownStatus {
                value: s.to_owned(),
            }),
        }
    }
}

/// Persisted appointment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appointment {
    pub id: AppointmentId,
    pub patient_id: UserId,
    pub doctor_id: DoctorId,
    /// UTC calendar day of `start_time`.
    pub appointment_date: NaiveDate,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub reason: Option<String>,
    pub notes: Option<String>,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A patient's request to book a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub doctor_id: DoctorId,
    pub scheduled_at: DateTime<Utc>,
    pub reason: Option<String>,
    pub notes: Option<String>,
}

/// Row values for a freshly booked appointment; status starts as pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
    pub patient_id: UserId,
    pub doctor_id: DoctorId,
    pub appointment_date: NaiveDate,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub reason: Option<String>,
    pub notes: Option<String>,
}

impl NewAppointment {
    /// Derive the stored row from a booking: the date is the UTC day of the
    /// start and the end is one slot later.
    pub fn from_booking(patient_id: UserId, request: BookingRequest) -> Self {
        let BookingRequest {
            doctor_id,
            scheduled_at,
            reason,
            notes,
        } = request;
        Self {
            patient_id,
            doctor_id,
            appointment_date: scheduled_at.date_naive(),
            start_time: scheduled_at,
            end_time: scheduled_at + slot_duration(),
            reason: non_blank(reason),
            notes: non_blank(notes),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

/// Optional filters shared by the doctor and patient appointment lists.
///
/// Date bounds are inclusive and compare against `appointment_date`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentFilter {
    pub status: Option<AppointmentStatus>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Filters for the admin-wide appointment list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminAppointmentFilter {
    pub base: AppointmentFilter,
    pub doctor_id: Option<DoctorId>,
    pub patient_id: Option<UserId>,
}

#[cfg(test)]
mod tests {
    //! Lifecycle table coverage.

    use super::*;
    use rstest::rstest;

    use AppointmentStatus::{Cancelled, Completed, Confirmed, Pending};

    #[rstest]
    #[case(Pending, Confirmed, true)]
    #[case(Pending, Cancelled, true)]
    #[case(Pending, Completed, true)]
    #[case(Pending, Pending, false)]
    #[case(Confirmed, Cancelled, true)]
    #[case(Confirmed, Completed, true)]
    #[case(Confirmed, Pending, false)]
    #[case(Confirmed, Confirmed, false)]
    #[case(Cancelled, Confirmed, false)]
    #[case(Cancelled, Cancelled, false)]
    #[case(Completed, Cancelled, false)]
    #[case(Completed, Pending, false)]
    fn transitions_follow_lifecycle(
        #[case] from: AppointmentStatus,
        #[case] to: AppointmentStatus,
        #[case] allowed: bool,
    ) {
        assert_eq!(from.can_transition_to(to), allowed);
    }

    #[rstest]
    fn parses_known_statuses() {
        assert_eq!("Confirmed".parse::<AppointmentStatus>(), Ok(Confirmed));
        assert!("archived".parse::<AppointmentStatus>().is_err());
    }

    #[rstest]
    fn booking_spans_one_slot_on_the_utc_day() {
        let scheduled_at = DateTime::parse_from_rfc3339("2025-01-10T23:45:00Z")
            .expect("timestamp")
            .with_timezone(&Utc);
        let patient_id = UserId::new(7).expect("patient id");
        let new = NewAppointment::from_booking(
            patient_id,
            BookingRequest {
                doctor_id: DoctorId::new(1).expect("doctor id"),
                scheduled_at,
                reason: Some("  ".to_owned()),
                notes: Some(" checkup ".to_owned()),
            },
        );
        assert_eq!(new.appointment_date, scheduled_at.date_naive());
        assert_eq!(new.end_time - new.start_time, Duration::minutes(30));
        assert_eq!(new.reason, None);
        assert_eq!(new.notes.as_deref(), Some("checkup"));
    }
}
