//! Port for doctor profiles and their schedules.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Doctor, DoctorId, DoctorProfile, Schedule, ScheduleDraft, Specialization, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by doctor repository adapters.
    pub enum DoctorPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "doctor repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "doctor repository query failed: {message}",
    }
}

/// Filters for the public doctor directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoctorListFilter {
    pub specialization: Option<Specialization>,
    /// Case-insensitive substring of the doctor's name.
    pub name: Option<String>,
}

/// Port for reading doctor profiles and recording schedules.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DoctorRepository: Send + Sync {
    /// Load a profile with its owner's name and email.
    async fn find_profile(
        &self,
        id: DoctorId,
    ) -> Result<Option<DoctorProfile>, DoctorPersistenceError>;

    /// Load the profile owned by a user account.
    async fn find_by_user(&self, user_id: UserId)
    -> Result<Option<Doctor>, DoctorPersistenceError>;

    /// List available doctors ordered by id.
    async fn list_available(
        &self,
        filter: &DoctorListFilter,
        page: PageRequest,
    ) -> Result<Page<DoctorProfile>, DoctorPersistenceError>;

    /// Store a schedule window for a doctor.
    async fn create_schedule(
        &self,
        doctor_id: DoctorId,
        draft: &ScheduleDraft,
    ) -> Result<Schedule, DoctorPersistenceError>;
}
