//! Driving port for booking and the appointment lifecycle.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{
    AdminAppointmentFilter, Appointment, AppointmentFilter, AppointmentId, AppointmentStatus,
    BookingRequest, Error, UserId,
};

/// Use-cases behind the appointment endpoints of every role.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentService: Send + Sync {
    /// Book a pending appointment for the calling patient.
    async fn book(&self, patient_id: UserId, request: BookingRequest)
    -> Result<Appointment, Error>;

    /// Appointments of the calling doctor.
    async fn list_for_doctor(
        &self,
        user_id: UserId,
        filter: AppointmentFilter,
    ) -> Result<Vec<Appointment>, Error>;

    /// Appointments of the calling patient.
    async fn list_for_patient(
        &self,
        patient_id: UserId,
        filter: AppointmentFilter,
    ) -> Result<Vec<Appointment>, Error>;

    /// Page through every appointment.
    async fn list_all(
        &self,
        filter: AdminAppointmentFilter,
        page: PageRequest,
    ) -> Result<Page<Appointment>, Error>;

    /// Move one of the calling doctor's appointments to `status`.
    async fn update_status_as_doctor(
        &self,
        user_id: UserId,
        appointment_id: AppointmentId,
        status: AppointmentStatus,
    ) -> Result<Appointment, Error>;

    /// Cancel one of the calling patient's appointments.
    async fn cancel_as_patient(
        &self,
        patient_id: UserId,
        appointment_id: AppointmentId,
        reason: Option<String>,
    ) -> Result<Appointment, Error>;
}
