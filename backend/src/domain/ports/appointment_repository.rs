//! Port for appointment persistence.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use pagination::{Page, PageRequest};

use crate::domain::{
    AdminAppointmentFilter, Appointment, AppointmentFilter, AppointmentId, AppointmentStatus,
    DoctorId, NewAppointment, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by appointment repository adapters.
    pub enum AppointmentPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "appointment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "appointment repository query failed: {message}",
        /// The doctor already has an appointment starting at that instant.
        SlotTaken => "slot already booked",
    }
}

/// Whose appointments a list covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentOwner {
    Doctor(DoctorId),
    Patient(UserId),
}

/// A status change guarded by the status it was decided against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub id: AppointmentId,
    pub expected: AppointmentStatus,
    pub next: AppointmentStatus,
    pub cancellation_reason: Option<String>,
}

/// Port for reading and writing appointments.
///
/// Soft-deleted appointments are invisible to every method. List methods
/// order by start time, newest first, unless stated otherwise.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Whether the doctor has any appointment starting at `start`.
    async fn slot_taken(
        &self,
        doctor_id: DoctorId,
        start: DateTime<Utc>,
    ) -> Result<bool, AppointmentPersistenceError>;

    /// Insert a pending appointment.
    ///
    /// Fails with [`AppointmentPersistenceError::SlotTaken`] when a concurrent
    /// booking claimed the same doctor and start first.
    async fn insert(
        &self,
        appointment: &NewAppointment,
    ) -> Result<Appointment, AppointmentPersistenceError>;

    /// Load an appointment by id.
    async fn find_by_id(
        &self,
        id: AppointmentId,
    ) -> Result<Option<Appointment>, AppointmentPersistenceError>;

    /// Start times of the doctor's appointments on `date`, in any status.
    async fn start_times_on(
        &self,
        doctor_id: DoctorId,
        date: NaiveDate,
    ) -> Result<Vec<DateTime<Utc>>, AppointmentPersistenceError>;

    /// Appointments of one doctor or patient matching `filter`.
    async fn list_for(
        &self,
        owner: AppointmentOwner,
        filter: &AppointmentFilter,
    ) -> Result<Vec<Appointment>, AppointmentPersistenceError>;

    /// One page of all appointments matching `filter`.
    async fn list_page(
        &self,
        filter: &AdminAppointmentFilter,
        page: PageRequest,
    ) -> Result<Page<Appointment>, AppointmentPersistenceError>;

    /// Up to `limit` appointments of the doctor dated after `after`, oldest first.
    async fn upcoming_for_doctor(
        &self,
        doctor_id: DoctorId,
        after: NaiveDate,
        limit: u32,
    ) -> Result<Vec<Appointment>, AppointmentPersistenceError>;

    /// Apply a status change if the row still has the expected status.
    ///
    /// Returns `Ok(None)` when the row changed underneath the caller.
    async fn change_status(
        &self,
        change: &StatusChange,
    ) -> Result<Option<Appointment>, AppointmentPersistenceError>;
}
