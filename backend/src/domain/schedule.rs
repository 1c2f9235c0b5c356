//! Doctor-declared availability windows for a single calendar date.
//!
//! Schedules are recorded for reference; the slot calculator in
//! [`super::availability`] uses the fixed clinic window instead.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};

use super::ids::{DoctorId, ScheduleId};

/// Validation errors for schedule input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleValidationError {
    InvalidTime { value: String },
    EndNotAfterStart { start: TimeOfDay, end: TimeOfDay },
}

impl fmt::Display for ScheduleValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTime { value } => {
                write!(f, "time must use 24-hour HH:MM format (got '{value}')")
            }
            Self::EndNotAfterStart { start, end } => {
                write!(f, "end time {end} must be after start time {start}")
            }
        }
    }
}

impl std::error::Error for ScheduleValidationError {}

/// Minute-precision time of day rendered as `HH:MM`.
///
/// # Examples
/// ```
/// use booking_backend::domain::TimeOfDay;
///
/// let time: TimeOfDay = "09:30".parse().expect("valid time");
/// assert_eq!(time.to_string(), "09:30");
/// assert!("9:30".parse::<TimeOfDay>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    /// Build from hour and minute, or `None` if out of range.
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// Truncate a chrono time to the minute.
    pub fn from_naive(time: NaiveTime) -> Self {
        Self(NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(NaiveTime::MIN))
    }

    /// Truncate a timestamp to its minute-precision UTC time of day.
    pub fn of(timestamp: DateTime<Utc>) -> Self {
        Self::from_naive(timestamp.time())
    }

    /// Underlying chrono time.
    pub fn as_naive(self) -> NaiveTime {
        self.0
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0.hour(), self.0.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = ScheduleValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ScheduleValidationError::InvalidTime {
            value: s.to_owned(),
        };
        let bytes = s.as_bytes();
        if bytes.len() != 5 || bytes.get(2) != Some(&b':') {
            return Err(invalid());
        }
        NaiveTime::parse_from_str(s, "%H:%M")
            .map(Self)
            .map_err(|_| invalid())
    }
}

/// Validated request to declare a schedule window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleDraft {
    pub date: NaiveDate,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
}

impl ScheduleDraft {
    /// Check that the window is non-empty.
    pub fn new(
        date: NaiveDate,
        start_time: TimeOfDay,
        end_time: TimeOfDay,
    ) -> Result<Self, ScheduleValidationError> {
        if end_time <= start_time {
            return Err(ScheduleValidationError::EndNotAfterStart {
                start: start_time,
                end: end_time,
            });
        }
        Ok(Self {
            date,
            start_time,
            end_time,
        })
    }
}

/// Persisted schedule entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub id: ScheduleId,
    pub doctor_id: DoctorId,
    pub date: NaiveDate,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
