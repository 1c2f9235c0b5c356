//! Booking and the appointment lifecycle.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use tracing::{info, warn};

use super::doctor_service::{doctor_not_found, require_doctor};
use super::port_errors::{appointment_error, doctor_error, slot_unavailable};
use super::ports::{
    AppointmentOwner, AppointmentRepository, AppointmentService, DoctorRepository, StatusChange,
};
use super::{
    AdminAppointmentFilter, Appointment, AppointmentFilter, AppointmentId, AppointmentStatus,
    BookingRequest, Error, NewAppointment, UserId,
};

fn appointment_not_found() -> Error {
    Error::not_found("Appointment not found")
}

fn illegal_transition(from: AppointmentStatus, to: AppointmentStatus) -> Error {
    Error::invalid_request(format!("Cannot change appointment status from {from} to {to}"))
}

/// [`AppointmentService`] backed by the doctor and appointment repositories.
#[derive(Clone)]
pub struct AppointmentServiceImpl<D, A> {
    doctors: Arc<D>,
    appointments: Arc<A>,
}

impl<D, A> AppointmentServiceImpl<D, A> {
    /// Wire the service to its adapters.
    pub fn new(doctors: Arc<D>, appointments: Arc<A>) -> Self {
        Self {
            doctors,
            appointments,
        }
    }
}

impl<D, A> AppointmentServiceImpl<D, A>
where
    A: AppointmentRepository,
{
    /// Load an appointment visible to `owner`; anything else is a 404.
    async fn owned(
        &self,
        owner: AppointmentOwner,
        id: AppointmentId,
    ) -> Result<Appointment, Error> {
        let appointment = self
            .appointments
            .find_by_id(id)
            .await
            .map_err(appointment_error)?
            .ok_or_else(appointment_not_found)?;
        let matches = match owner {
            AppointmentOwner::Doctor(doctor_id) => appointment.doctor_id == doctor_id,
            AppointmentOwner::Patient(patient_id) => appointment.patient_id == patient_id,
        };
        if matches {
            Ok(appointment)
        } else {
            Err(appointment_not_found())
        }
    }

    async fn apply(&self, change: StatusChange) -> Result<Appointment, Error> {
        self.appointments
            .change_status(&change)
            .await
            .map_err(appointment_error)?
            .ok_or_else(|| {
                warn!(appointment_id = %change.id, "appointment changed concurrently");
                Error::conflict("Appointment was modified by another request")
            })
    }
}

#[async_trait]
impl<D, A> AppointmentService for AppointmentServiceImpl<D, A>
where
    D: DoctorRepository,
    A: AppointmentRepository,
{
    async fn book(
        &self,
        patient_id: UserId,
        request: BookingRequest,
    ) -> Result<Appointment, Error> {
        self.doctors
            .find_profile(request.doctor_id)
            .await
            .map_err(doctor_error)?
            .ok_or_else(doctor_not_found)?;

        let taken = self
            .appointments
            .slot_taken(request.doctor_id, request.scheduled_at)
            .await
            .map_err(appointment_error)?;
        if taken {
            return Err(slot_unavailable());
        }

        let appointment = self
            .appointments
            .insert(&NewAppointment::from_booking(patient_id, request))
            .await
            .map_err(appointment_error)?;
        info!(
            appointment_id = %appointment.id,
            doctor_id = %appointment.doctor_id,
            patient_id = %appointment.patient_id,
            start = %appointment.start_time,
            "appointment booked"
        );
        Ok(appointment)
    }

    async fn list_for_doctor(
        &self,
        user_id: UserId,
        filter: AppointmentFilter,
    ) -> Result<Vec<Appointment>, Error> {
        let doctor =
            require_doctor(self.doctors.as_ref(), user_id, "Doctor profile not found").await?;
        self.appointments
            .list_for(AppointmentOwner::Doctor(doctor.id), &filter)
            .await
            .map_err(appointment_error)
    }

    async fn list_for_patient(
        &self,
        patient_id: UserId,
        filter: AppointmentFilter,
    ) -> Result<Vec<Appointment>, Error> {
        self.appointments
            .list_for(AppointmentOwner::Patient(patient_id), &filter)
            .await
            .map_err(appointment_error)
    }

    async fn list_all(
        &self,
        filter: AdminAppointmentFilter,
        page: PageRequest,
    ) -> Result<Page<Appointment>, Error> {
        self.appointments
            .list_page(&filter, page)
            .await
            .map_err(appointment_error)
    }

    async fn update_status_as_doctor(
        &self,
        user_id: UserId,
        appointment_id: AppointmentId,
        status: AppointmentStatus,
    ) -> Result<Appointment, Error> {
        if !status.is_doctor_target() {
            return Err(Error::invalid_request(
                "Status must be one of confirmed, cancelled, completed",
            ));
        }
        let doctor =
            require_doctor(self.doctors.as_ref(), user_id, "Doctor profile not found").await?;
        let current = self
            .owned(AppointmentOwner::Doctor(doctor.id), appointment_id)
            .await?;
        if !current.status.can_transition_to(status) {
            return Err(illegal_transition(current.status, status));
        }

        let updated = self
            .apply(StatusChange {
                id: appointment_id,
                expected: current.status,
                next: status,
                cancellation_reason: None,
            })
            .await?;
        info!(
            appointment_id = %updated.id,
            from = %current.status,
            to = %updated.status,
            "appointment status updated by doctor"
        );
        Ok(updated)
    }

    async fn cancel_as_patient(
        &self,
        patient_id: UserId,
        appointment_id: AppointmentId,
        reason: Option<String>,
    ) -> Result<Appointment, Error> {
        let current = self
            .owned(AppointmentOwner::Patient(patient_id), appointment_id)
            .await?;
        match current.status {
            AppointmentStatus::Cancelled => {
                return Err(Error::invalid_request("Appointment is already cancelled"));
            }
            AppointmentStatus::Completed => {
                return Err(Error::invalid_request(
                    "Completed appointments cannot be cancelled",
                ));
            }
            AppointmentStatus::Pending | AppointmentStatus::Confirmed => {}
        }

        let reason = reason
            .map(|text| text.trim().to_owned())
            .filter(|text| !text.is_empty());
        let updated = self
            .apply(StatusChange {
                id: appointment_id,
                expected: current.status,
                next: AppointmentStatus::Cancelled,
                cancellation_reason: reason,
            })
            .await?;
        info!(appointment_id = %updated.id, "appointment cancelled by patient");
        Ok(updated)
    }
}

#[cfg(test)]
#[path = "appointment_service_tests.rs"]
mod tests;
