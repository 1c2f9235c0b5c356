//! In-memory implementations of the repository ports.
//!
//! One [`InMemoryStore`] backs all three repositories so joins (doctor name,
//! email uniqueness) behave like the database. Uniqueness rules are checked
//! under the same lock as the write, which makes concurrent bookings race the
//! way they do against the partial unique index.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use pagination::{Page, PageRequest};

use crate::domain::ports::{
    AppointmentOwner, AppointmentPersistenceError, AppointmentRepository, CreatedAccount,
    DoctorListFilter, DoctorPersistenceError, DoctorRepository, NewAccount, ProfileChanges,
    StatusChange, UserListFilter, UserPersistenceError, UserRepository,
};
use crate::domain::{
    AdminAppointmentFilter, Appointment, AppointmentFilter, AppointmentId, AppointmentStatus,
    Doctor, DoctorId, DoctorProfile, EmailAddress, NewAppointment, Schedule, ScheduleDraft,
    ScheduleId, User, UserId,
};

#[derive(Default)]
struct State {
    users: Vec<User>,
    doctors: Vec<Doctor>,
    schedules: Vec<Schedule>,
    appointments: Vec<Appointment>,
}

impl State {
    fn user(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    fn profile(&self, doctor: &Doctor) -> Option<DoctorProfile> {
        self.user(doctor.user_id).map(|owner| DoctorProfile {
            doctor: doctor.clone(),
            name: owner.name.clone(),
            email: owner.email.clone(),
        })
    }

    fn email_taken(&self, email: &EmailAddress, except: Option<UserId>) -> bool {
        self.users
            .iter()
            .any(|user| &user.email == email && Some(user.id) != except)
    }
}

fn next_id(len: usize) -> i64 {
    i64::try_from(len).map_or(i64::MAX, |count| count + 1)
}

fn paginate<T: Clone>(rows: &[T], page: PageRequest) -> Page<T> {
    let data = rows
        .iter()
        .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
        .take(page.limit() as usize)
        .cloned()
        .collect();
    Page::new(data, rows.len() as u64, page)
}

fn matches_filter(appointment: &Appointment, filter: &AppointmentFilter) -> bool {
    filter.status.is_none_or(|status| appointment.status == status)
        && filter
            .from
            .is_none_or(|from| appointment.appointment_date >= from)
        && filter.to.is_none_or(|to| appointment.appointment_date <= to)
}

fn newest_first(rows: &mut [Appointment]) {
    rows.sort_by(|a, b| b.start_time.cmp(&a.start_time).then(b.id.cmp(&a.id)));
}

/// Shared in-memory database.
pub struct InMemoryStore {
    state: Mutex<State>,
    clock: Arc<dyn Clock>,
}

impl InMemoryStore {
    /// Create an empty store stamping rows with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(State::default()),
            clock,
        }
    }

    /// Mark a doctor unavailable so it drops out of the directory.
    pub fn set_doctor_available(&self, id: DoctorId, available: bool) {
        if let Some(doctor) = self.lock().doctors.iter_mut().find(|d| d.id == id) {
            doctor.available = available;
        }
    }

    /// Number of stored appointments.
    pub fn appointment_count(&self) -> usize {
        self.lock().appointments.len()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create_account(
        &self,
        account: &NewAccount,
    ) -> Result<CreatedAccount, UserPersistenceError> {
        let now = self.clock.utc();
        let mut state = self.lock();
        if state.email_taken(&account.email, None) {
            return Err(UserPersistenceError::duplicate_email(
                account.email.to_string(),
            ));
        }
        let user = User {
            id: UserId::new(next_id(state.users.len()))
                .map_err(|err| UserPersistenceError::query(err.to_string()))?,
            name: account.name.clone(),
            email: account.email.clone(),
            password_hash: account.password_hash.clone(),
            role: account.role,
            active: true,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        };
        let doctor = match &account.doctor {
            Some(draft) => Some(Doctor {
                id: DoctorId::new(next_id(state.doctors.len()))
                    .map_err(|err| UserPersistenceError::query(err.to_string()))?,
                user_id: user.id,
                specialization: draft.specialization,
                qualification: draft.qualification.clone(),
                experience_years: draft.experience_years,
                bio: draft.bio.clone(),
                consultation_fee: draft.consultation_fee,
                available: true,
                created_at: now,
                updated_at: now,
            }),
            None => None,
        };
        state.users.push(user.clone());
        if let Some(doctor) = &doctor {
            state.doctors.push(doctor.clone());
        }
        Ok(CreatedAccount { user, doctor })
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock().user(id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|user| &user.email == email)
            .cloned())
    }

    async fn update_profile(
        &self,
        id: UserId,
        changes: &ProfileChanges,
    ) -> Result<Option<User>, UserPersistenceError> {
        let now = self.clock.utc();
        let mut state = self.lock();
        if let Some(email) = &changes.email {
            if state.email_taken(email, Some(id)) {
                return Err(UserPersistenceError::duplicate_email(email.to_string()));
            }
        }
        let Some(user) = state.users.iter_mut().find(|user| user.id == id) else {
            return Ok(None);
        };
        if let Some(name) = &changes.name {
            user.name = name.clone();
        }
        if let Some(email) = &changes.email {
            user.email = email.clone();
        }
        if let Some(hash) = &changes.password_hash {
            user.password_hash = hash.clone();
        }
        user.updated_at = now;
        Ok(Some(user.clone()))
    }

    async fn record_login(
        &self,
        id: UserId,
        at: DateTime<Utc>,
    ) -> Result<(), UserPersistenceError> {
        if let Some(user) = self.lock().users.iter_mut().find(|user| user.id == id) {
            user.last_login_at = Some(at);
        }
        Ok(())
    }

    async fn list(
        &self,
        filter: UserListFilter,
        page: PageRequest,
    ) -> Result<Page<User>, UserPersistenceError> {
        let state = self.lock();
        let rows: Vec<User> = state
            .users
            .iter()
            .filter(|user| filter.role.is_none_or(|role| user.role == role))
            .filter(|user| filter.active.is_none_or(|active| user.active == active))
            .cloned()
            .collect();
        Ok(paginate(&rows, page))
    }

    async fn set_active(&self, id: UserId, active: bool) -> Result<bool, UserPersistenceError> {
        let now = self.clock.utc();
        let mut state = self.lock();
        let Some(user) = state.users.iter_mut().find(|user| user.id == id) else {
            return Ok(false);
        };
        user.active = active;
        user.updated_at = now;
        Ok(true)
    }
}

#[async_trait]
impl DoctorRepository for InMemoryStore {
    async fn find_profile(
        &self,
        id: DoctorId,
    ) -> Result<Option<DoctorProfile>, DoctorPersistenceError> {
        let state = self.lock();
        Ok(state
            .doctors
            .iter()
            .find(|doctor| doctor.id == id)
            .and_then(|doctor| state.profile(doctor)))
    }

    async fn find_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<Doctor>, DoctorPersistenceError> {
        Ok(self
            .lock()
            .doctors
            .iter()
            .find(|doctor| doctor.user_id == user_id)
            .cloned())
    }

    async fn list_available(
        &self,
        filter: &DoctorListFilter,
        page: PageRequest,
    ) -> Result<Page<DoctorProfile>, DoctorPersistenceError> {
        let state = self.lock();
        let needle = filter.name.as_deref().map(str::to_lowercase);
        let rows: Vec<DoctorProfile> = state
            .doctors
            .iter()
            .filter(|doctor| doctor.available)
            .filter(|doctor| {
                filter
                    .specialization
                    .is_none_or(|wanted| doctor.specialization == wanted)
            })
            .filter_map(|doctor| state.profile(doctor))
            .filter(|profile| {
                needle.as_deref().is_none_or(|needle| {
                    profile.name.as_ref().to_lowercase().contains(needle)
                })
            })
            .collect();
        Ok(paginate(&rows, page))
    }

    async fn create_schedule(
        &self,
        doctor_id: DoctorId,
        draft: &ScheduleDraft,
    ) -> Result<Schedule, DoctorPersistenceError> {
        let now = self.clock.utc();
        let mut state = self.lock();
        let schedule = Schedule {
            id: ScheduleId::new(next_id(state.schedules.len()))
                .map_err(|err| DoctorPersistenceError::query(err.to_string()))?,
            doctor_id,
            date: draft.date,
            start_time: draft.start_time,
            end_time: draft.end_time,
            is_available: true,
            created_at: now,
            updated_at: now,
        };
        state.schedules.push(schedule.clone());
        Ok(schedule)
    }
}

#[async_trait]
impl AppointmentRepository for InMemoryStore {
    async fn slot_taken(
        &self,
        doctor_id: DoctorId,
        start: DateTime<Utc>,
    ) -> Result<bool, AppointmentPersistenceError> {
        Ok(self
            .lock()
            .appointments
            .iter()
            .any(|a| a.doctor_id == doctor_id && a.start_time == start))
    }

    async fn insert(
        &self,
        appointment: &NewAppointment,
    ) -> Result<Appointment, AppointmentPersistenceError> {
        let now = self.clock.utc();
        let mut state = self.lock();
        if state.appointments.iter().any(|a| {
            a.doctor_id == appointment.doctor_id && a.start_time == appointment.start_time
        }) {
            return Err(AppointmentPersistenceError::slot_taken());
        }
        let stored = Appointment {
            id: AppointmentId::new(next_id(state.appointments.len()))
                .map_err(|err| AppointmentPersistenceError::query(err.to_string()))?,
            patient_id: appointment.patient_id,
            doctor_id: appointment.doctor_id,
            appointment_date: appointment.appointment_date,
            start_time: appointment.start_time,
            end_time: appointment.end_time,
            status: AppointmentStatus::Pending,
            reason: appointment.reason.clone(),
            notes: appointment.notes.clone(),
            cancellation_reason: None,
            created_at: now,
            updated_at: now,
        };
        state.appointments.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_id(
        &self,
        id: AppointmentId,
    ) -> Result<Option<Appointment>, AppointmentPersistenceError> {
        Ok(self
            .lock()
            .appointments
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    async fn start_times_on(
        &self,
        doctor_id: DoctorId,
        date: NaiveDate,
    ) -> Result<Vec<DateTime<Utc>>, AppointmentPersistenceError> {
        Ok(self
            .lock()
            .appointments
            .iter()
            .filter(|a| a.doctor_id == doctor_id && a.appointment_date == date)
            .map(|a| a.start_time)
            .collect())
    }

    async fn list_for(
        &self,
        owner: AppointmentOwner,
        filter: &AppointmentFilter,
    ) -> Result<Vec<Appointment>, AppointmentPersistenceError> {
        let mut rows: Vec<Appointment> = self
            .lock()
            .appointments
            .iter()
            .filter(|a| match owner {
                AppointmentOwner::Doctor(id) => a.doctor_id == id,
                AppointmentOwner::Patient(id) => a.patient_id == id,
            })
            .filter(|a| matches_filter(a, filter))
            .cloned()
            .collect();
        newest_first(&mut rows);
        Ok(rows)
    }

    async fn list_page(
        &self,
        filter: &AdminAppointmentFilter,
        page: PageRequest,
    ) -> Result<Page<Appointment>, AppointmentPersistenceError> {
        let mut rows: Vec<Appointment> = self
            .lock()
            .appointments
            .iter()
            .filter(|a| matches_filter(a, &filter.base))
            .filter(|a| filter.doctor_id.is_none_or(|id| a.doctor_id == id))
            .filter(|a| filter.patient_id.is_none_or(|id| a.patient_id == id))
            .cloned()
            .collect();
        newest_first(&mut rows);
        Ok(paginate(&rows, page))
    }

    async fn upcoming_for_doctor(
        &self,
        doctor_id: DoctorId,
        after: NaiveDate,
        limit: u32,
    ) -> Result<Vec<Appointment>, AppointmentPersistenceError> {
        let mut rows: Vec<Appointment> = self
            .lock()
            .appointments
            .iter()
            .filter(|a| a.doctor_id == doctor_id && a.appointment_date > after)
            .cloned()
            .collect();
        rows.sort_by_key(|a| a.start_time);
        rows.truncate(limit as usize);
        Ok(rows)
    }

    async fn change_status(
        &self,
        change: &StatusChange,
    ) -> Result<Option<Appointment>, AppointmentPersistenceError> {
        let now = self.clock.utc();
        let mut state = self.lock();
        let Some(row) = state
            .appointments
            .iter_mut()
            .find(|a| a.id == change.id && a.status == change.expected)
        else {
            return Ok(None);
        };
        row.status = change.next;
        if change.cancellation_reason.is_some() {
            row.cancellation_reason.clone_from(&change.cancellation_reason);
        }
        row.updated_at = now;
        Ok(Some(row.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BookingRequest, Role};
    use crate::test_support::{FixedClock, fixtures};

    fn store() -> InMemoryStore {
        InMemoryStore::new(Arc::new(FixedClock::at("2025-01-10T08:00:00Z")))
    }

    fn booking(patient: i64, at: &str) -> NewAppointment {
        NewAppointment::from_booking(
            UserId::new(patient).expect("patient"),
            BookingRequest {
                doctor_id: DoctorId::new(1).expect("doctor"),
                scheduled_at: fixtures::timestamp(at),
                reason: None,
                notes: None,
            },
        )
    }

    #[tokio::test]
    async fn duplicate_slot_insert_is_rejected() {
        let store = store();
        store
            .insert(&booking(7, "2025-01-10T09:00:00Z"))
            .await
            .expect("first booking");

        let err = store
            .insert(&booking(8, "2025-01-10T09:00:00Z"))
            .await
            .expect_err("second booking");

        assert_eq!(err, AppointmentPersistenceError::slot_taken());
        assert_eq!(store.appointment_count(), 1);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = store();
        let template = fixtures::user(1, Role::Patient);
        let account = NewAccount {
            name: template.name,
            email: template.email,
            password_hash: "hash".to_owned(),
            role: Role::Patient,
            doctor: None,
        };
        store.create_account(&account).await.expect("first account");

        let err = store
            .create_account(&account)
            .await
            .expect_err("duplicate");

        assert!(matches!(err, UserPersistenceError::DuplicateEmail { .. }));
    }
}
