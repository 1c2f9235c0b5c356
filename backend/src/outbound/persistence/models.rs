//! Internal Diesel row structs and their conversion into domain types.
//!
//! These types are implementation details of the persistence layer and never
//! leave it. Conversions fail with [`CorruptRow`] when a stored value no
//! longer satisfies a domain invariant.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;

use crate::domain::{
    Appointment, AppointmentId, AppointmentStatus, Doctor, DoctorId, EmailAddress, PersonName,
    Role, Schedule, ScheduleId, Specialization, TimeOfDay, User, UserId,
};

use super::schema::{appointments, doctors, schedules, users};

/// A stored value that the domain rejects.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("corrupt {table} row {id}: {message}")]
pub(crate) struct CorruptRow {
    table: &'static str,
    id: i64,
    message: String,
}

impl CorruptRow {
    fn new(table: &'static str, id: i64, message: impl ToString) -> Self {
        Self {
            table,
            id,
            message: message.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = CorruptRow;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let corrupt = move |message: String| CorruptRow::new("users", id, message);
        Ok(Self {
            id: UserId::new(row.id).map_err(|err| corrupt(err.to_string()))?,
            name: PersonName::new(row.name).map_err(|err| corrupt(err.to_string()))?,
            email: EmailAddress::new(&row.email).map_err(|err| corrupt(err.to_string()))?,
            role: row
                .role
                .parse::<Role>()
                .map_err(|err| corrupt(err.to_string()))?,
            password_hash: row.password_hash,
            active: row.active,
            last_login_at: row.last_login_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
}

/// Changeset for profile edits; `None` columns are left untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserProfileUpdate<'a> {
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub password_hash: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Doctors
// ---------------------------------------------------------------------------

/// Row struct for reading from the doctors table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = doctors)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DoctorRow {
    pub id: i64,
    pub user_id: i64,
    pub specialization: String,
    pub qualification: String,
    pub experience_years: i32,
    pub bio: String,
    pub consultation_fee: f64,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DoctorRow> for Doctor {
    type Error = CorruptRow;

    fn try_from(row: DoctorRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let corrupt = move |message: String| CorruptRow::new("doctors", id, message);
        Ok(Self {
            id: DoctorId::new(row.id).map_err(|err| corrupt(err.to_string()))?,
            user_id: UserId::new(row.user_id).map_err(|err| corrupt(err.to_string()))?,
            specialization: row
                .specialization
                .parse::<Specialization>()
                .map_err(|err| corrupt(err.to_string()))?,
            qualification: row.qualification,
            experience_years: row.experience_years,
            bio: row.bio,
            consultation_fee: row.consultation_fee,
            available: row.available,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Insertable struct for creating doctor profiles.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = doctors)]
pub(crate) struct NewDoctorRow<'a> {
    pub user_id: i64,
    pub specialization: &'a str,
    pub qualification: &'a str,
    pub experience_years: i32,
    pub bio: &'a str,
    pub consultation_fee: f64,
}

// ---------------------------------------------------------------------------
// Schedules
// ---------------------------------------------------------------------------

/// Row struct for reading from the schedules table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = schedules)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ScheduleRow {
    pub id: i64,
    pub doctor_id: i64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ScheduleRow> for Schedule {
    type Error = CorruptRow;

    fn try_from(row: ScheduleRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let corrupt = move |message: String| CorruptRow::new("schedules", id, message);
        Ok(Self {
            id: ScheduleId::new(row.id).map_err(|err| corrupt(err.to_string()))?,
            doctor_id: DoctorId::new(row.doctor_id).map_err(|err| corrupt(err.to_string()))?,
            date: row.date,
            start_time: TimeOfDay::from_naive(row.start_time),
            end_time: TimeOfDay::from_naive(row.end_time),
            is_available: row.is_available,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Insertable struct for recording a schedule window.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schedules)]
pub(crate) struct NewScheduleRow {
    pub doctor_id: i64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

// ---------------------------------------------------------------------------
// Appointments
// ---------------------------------------------------------------------------

/// Row struct for reading from the appointments table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = appointments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AppointmentRow {
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub appointment_date: NaiveDate,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: String,
    pub reason: Option<String>,
    pub notes: Option<String>,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = CorruptRow;

    fn try_from(row: AppointmentRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let corrupt = move |message: String| CorruptRow::new("appointments", id, message);
        Ok(Self {
            id: AppointmentId::new(row.id).map_err(|err| corrupt(err.to_string()))?,
            patient_id: UserId::new(row.patient_id).map_err(|err| corrupt(err.to_string()))?,
            doctor_id: DoctorId::new(row.doctor_id).map_err(|err| corrupt(err.to_string()))?,
            appointment_date: row.appointment_date,
            start_time: row.start_time,
            end_time: row.end_time,
            status: row
                .status
                .parse::<AppointmentStatus>()
                .map_err(|err| corrupt(err.to_string()))?,
            reason: row.reason,
            notes: row.notes,
            cancellation_reason: row.cancellation_reason,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Insertable struct for booking an appointment; status defaults to pending.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = appointments)]
pub(crate) struct NewAppointmentRow<'a> {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub appointment_date: NaiveDate,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub reason: Option<&'a str>,
    pub notes: Option<&'a str>,
}

/// Changeset for a status change; a `None` reason keeps the stored one.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = appointments)]
pub(crate) struct AppointmentStatusUpdate<'a> {
    pub status: &'a str,
    pub cancellation_reason: Option<&'a str>,
}

#[cfg(test)]
mod tests {
    //! Row conversion coverage.

    use super::*;
    use rstest::rstest;

    fn user_row(role: &str, email: &str) -> UserRow {
        let now = Utc::now();
        UserRow {
            id: 1,
            name: "Jane".to_owned(),
            email: email.to_owned(),
            password_hash: "hash".to_owned(),
            role: role.to_owned(),
            active: true,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    fn converts_valid_user_row() {
        let user = User::try_from(user_row("doctor", "jane@example.com")).expect("valid row");
        assert_eq!(user.role, Role::Doctor);
        assert_eq!(user.email.as_ref(), "jane@example.com");
    }

    #[rstest]
    #[case("superuser", "jane@example.com")]
    #[case("patient", "not-an-email")]
    fn rejects_corrupt_user_rows(#[case] role: &str, #[case] email: &str) {
        let err = User::try_from(user_row(role, email)).expect_err("corrupt row");
        assert!(err.to_string().starts_with("corrupt users row 1"));
    }

    #[rstest]
    fn rejects_unknown_appointment_status() {
        let now = Utc::now();
        let row = AppointmentRow {
            id: 3,
            patient_id: 1,
            doctor_id: 1,
            appointment_date: now.date_naive(),
            start_time: now,
            end_time: now,
            status: "archived".to_owned(),
            reason: None,
            notes: None,
            cancellation_reason: None,
            created_at: now,
            updated_at: now,
        };
        assert!(Appointment::try_from(row).is_err());
    }
}
