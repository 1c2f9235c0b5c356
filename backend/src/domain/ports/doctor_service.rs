//! Driving port for the doctor directory and doctor self-service.

use async_trait::async_trait;
use chrono::NaiveDate;
use pagination::{Page, PageRequest};

use crate::domain::{
    Appointment, Availability, Doctor, DoctorId, DoctorProfile, Error, Schedule, ScheduleDraft,
    UserId,
};

use super::DoctorListFilter;

/// Maximum number of upcoming appointments shown on the dashboard.
pub const DASHBOARD_UPCOMING_LIMIT: u32 = 10;

/// A doctor's view of today and the days ahead.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub doctor: Doctor,
    /// Today's appointments, earliest first.
    pub today: Vec<Appointment>,
    /// Appointments after today, earliest first.
    pub upcoming: Vec<Appointment>,
}

/// Use-cases behind `/doctors` and `/patients/doctors`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DoctorService: Send + Sync {
    /// Page through available doctors.
    async fn list_doctors(
        &self,
        filter: DoctorListFilter,
        page: PageRequest,
    ) -> Result<Page<DoctorProfile>, Error>;

    /// Load one doctor's public profile.
    async fn get_doctor(&self, doctor_id: DoctorId) -> Result<DoctorProfile, Error>;

    /// Bookable slots on `date`, defaulting to today.
    async fn availability(
        &self,
        doctor_id: DoctorId,
        date: Option<NaiveDate>,
    ) -> Result<Availability, Error>;

    /// Today's and upcoming appointments for the calling doctor.
    async fn dashboard(&self, user_id: UserId) -> Result<Dashboard, Error>;

    /// Record a schedule window for the calling doctor.
    async fn create_schedule(&self, user_id: UserId, draft: ScheduleDraft)
    -> Result<Schedule, Error>;
}
