//! Deterministic domain values for tests.
//!
//! Ids are plain integers so call sites stay short; every helper panics on a
//! non-positive id.

use chrono::{DateTime, Utc};

use crate::domain::{
    Appointment, AppointmentId, AppointmentStatus, Doctor, DoctorId, DoctorProfile,
    EmailAddress, PersonName, Role, Schedule, ScheduleDraft, ScheduleId, Specialization, User,
    UserId, slot_duration,
};

/// Instant every fixture row was created at.
pub const CREATED_AT: &str = "2025-01-01T00:00:00Z";

/// Parse an RFC 3339 timestamp.
pub fn timestamp(rfc3339: &str) -> DateTime<Utc> {
    match DateTime::parse_from_rfc3339(rfc3339) {
        Ok(parsed) => parsed.with_timezone(&Utc),
        Err(err) => panic!("invalid fixture timestamp {rfc3339}: {err}"),
    }
}

fn positive<T>(raw: i64) -> T
where
    T: TryFrom<i64>,
    T::Error: std::fmt::Debug,
{
    match T::try_from(raw) {
        Ok(id) => id,
        Err(err) => panic!("fixture id must be positive: {err:?}"),
    }
}

/// Active account `user{id}@example.com` named `User {id}`.
pub fn user(id: i64, role: Role) -> User {
    let created_at = timestamp(CREATED_AT);
    User {
        id: positive(id),
        name: person_name(&format!("User {id}")),
        email: email(&format!("user{id}@example.com")),
        password_hash: "$argon2id$fixture".to_owned(),
        role,
        active: true,
        last_login_at: None,
        created_at,
        updated_at: created_at,
    }
}

/// Available cardiologist profile owned by `user_id`.
pub fn doctor(id: i64, user_id: UserId) -> Doctor {
    let created_at = timestamp(CREATED_AT);
    Doctor {
        id: positive::<DoctorId>(id),
        user_id,
        specialization: Specialization::Cardiology,
        qualification: "MD".to_owned(),
        experience_years: 10,
        bio: String::new(),
        consultation_fee: 150.0,
        available: true,
        created_at,
        updated_at: created_at,
    }
}

/// [`doctor`] joined with the owner's name and email as produced by [`user`].
pub fn doctor_profile(id: i64, user_id: i64) -> DoctorProfile {
    let owner = user(user_id, Role::Doctor);
    DoctorProfile {
        doctor: doctor(id, owner.id),
        name: owner.name,
        email: owner.email,
    }
}

/// Appointment starting at `start` and lasting one slot.
pub fn appointment(
    id: i64,
    patient_id: i64,
    doctor_id: i64,
    start: &str,
    status: AppointmentStatus,
) -> Appointment {
    let start_time = timestamp(start);
    let created_at = timestamp(CREATED_AT);
    Appointment {
        id: positive::<AppointmentId>(id),
        patient_id: positive(patient_id),
        doctor_id: positive(doctor_id),
        appointment_date: start_time.date_naive(),
        start_time,
        end_time: start_time + slot_duration(),
        status,
        reason: None,
        notes: None,
        cancellation_reason: None,
        created_at,
        updated_at: created_at,
    }
}

/// Stored form of a schedule draft.
pub fn schedule(id: i64, doctor_id: DoctorId, draft: &ScheduleDraft) -> Schedule {
    let created_at = timestamp(CREATED_AT);
    Schedule {
        id: positive::<ScheduleId>(id),
        doctor_id,
        date: draft.date,
        start_time: draft.start_time,
        end_time: draft.end_time,
        is_available: true,
        created_at,
        updated_at: created_at,
    }
}

fn person_name(raw: &str) -> PersonName {
    match PersonName::new(raw) {
        Ok(name) => name,
        Err(err) => panic!("invalid fixture name {raw}: {err}"),
    }
}

fn email(raw: &str) -> EmailAddress {
    match EmailAddress::new(raw) {
        Ok(email) => email,
        Err(err) => panic!("invalid fixture email {raw}: {err}"),
    }
}
