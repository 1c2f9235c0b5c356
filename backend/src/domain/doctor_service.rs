//! Doctor directory, availability and doctor self-service.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use mockable::Clock;
use pagination::{Page, PageRequest};
use tracing::info;

use super::port_errors::{appointment_error, doctor_error};
use super::ports::{
    AppointmentOwner, AppointmentRepository, DASHBOARD_UPCOMING_LIMIT, Dashboard,
    DoctorListFilter, DoctorRepository, DoctorService,
};
use super::{
    AppointmentFilter, Availability, DailyWindow, Doctor, DoctorId, DoctorProfile, Error,
    Schedule, ScheduleDraft, TimeOfDay, UserId,
};

pub(crate) fn doctor_not_found() -> Error {
    Error::not_found("Doctor not found")
}

/// Load the doctor profile owned by `user_id` or fail with `403`.
pub(crate) async fn require_doctor<D>(
    doctors: &D,
    user_id: UserId,
    denial: &'static str,
) -> Result<Doctor, Error>
where
    D: DoctorRepository + ?Sized,
{
    doctors
        .find_by_user(user_id)
        .await
        .map_err(doctor_error)?
        .ok_or_else(|| Error::forbidden(denial))
}

/// [`DoctorService`] backed by the doctor and appointment repositories.
#[derive(Clone)]
pub struct DoctorServiceImpl<D, A> {
    doctors: Arc<D>,
    appointments: Arc<A>,
    clock: Arc<dyn Clock>,
    window: DailyWindow,
}

impl<D, A> DoctorServiceImpl<D, A> {
    /// Wire the service to its adapters using clinic opening hours.
    pub fn new(doctors: Arc<D>, appointments: Arc<A>, clock: Arc<dyn Clock>) -> Self {
        Self {
            doctors,
            appointments,
            clock,
            window: DailyWindow::clinic_hours(),
        }
    }

    fn today(&self) -> NaiveDate {
        self.clock.utc().date_naive()
    }
}

#[async_trait]
impl<D, A> DoctorService for DoctorServiceImpl<D, A>
where
    D: DoctorRepository,
    A: AppointmentRepository,
{
    async fn list_doctors(
        &self,
        filter: DoctorListFilter,
        page: PageRequest,
    ) -> Result<Page<DoctorProfile>, Error> {
        self.doctors
            .list_available(&filter, page)
            .await
            .map_err(doctor_error)
    }

    async fn get_doctor(&self, doctor_id: DoctorId) -> Result<DoctorProfile, Error> {
        self.doctors
            .find_profile(doctor_id)
            .await
            .map_err(doctor_error)?
            .ok_or_else(doctor_not_found)
    }

    async fn availability(
        &self,
        doctor_id: DoctorId,
        date: Option<NaiveDate>,
    ) -> Result<Availability, Error> {
        let date = date.unwrap_or_else(|| self.today());
        self.get_doctor(doctor_id).await?;

        let booked = self
            .appointments
            .start_times_on(doctor_id, date)
            .await
            .map_err(appointment_error)?;
        let available_slots = self
            .window
            .available_slots(booked.into_iter().map(TimeOfDay::of));

        Ok(Availability {
            doctor_id,
            date,
            available_slots,
        })
    }

    async fn dashboard(&self, user_id: UserId) -> Result<Dashboard, Error> {
        let doctor =
            require_doctor(self.doctors.as_ref(), user_id, "Doctor profile not found").await?;
        let today = self.today();

        let filter = AppointmentFilter {
            status: None,
            from: Some(today),
            to: Some(today),
        };
        let mut todays = self
            .appointments
            .list_for(AppointmentOwner::Doctor(doctor.id), &filter)
            .await
            .map_err(appointment_error)?;
        todays.sort_by_key(|appointment| appointment.start_time);

        let upcoming = self
            .appointments
            .upcoming_for_doctor(doctor.id, today, DASHBOARD_UPCOMING_LIMIT)
            .await
            .map_err(appointment_error)?;

        Ok(Dashboard {
            doctor,
            today: todays,
            upcoming,
        })
    }

    async fn create_schedule(
        &self,
        user_id: UserId,
        draft: ScheduleDraft,
    ) -> Result<Schedule, Error> {
        let doctor = require_doctor(
            self.doctors.as_ref(),
            user_id,
            "Only doctors can create schedules",
        )
        .await?;
        let schedule = self
            .doctors
            .create_schedule(doctor.id, &draft)
            .await
            .map_err(doctor_error)?;
        info!(
            doctor_id = %doctor.id,
            schedule_id = %schedule.id,
            date = %schedule.date,
            "schedule created"
        );
        Ok(schedule)
    }
}

#[cfg(test)]
#[path = "doctor_service_tests.rs"]
mod tests;
