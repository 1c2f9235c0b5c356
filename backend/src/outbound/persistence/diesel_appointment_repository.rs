//! PostgreSQL-backed `AppointmentRepository` implementation using Diesel ORM.
//!
//! Double booking is prevented twice: callers pre-check with
//! [`AppointmentRepository::slot_taken`], and the partial unique index
//! `appointments_doctor_slot_key` rejects whichever concurrent insert loses.
//! Status changes are compare-and-set on the current status.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::{Page, PageRequest};

use crate::domain::ports::{
    AppointmentOwner, AppointmentPersistenceError, AppointmentRepository, StatusChange,
};
use crate::domain::{
    AdminAppointmentFilter, Appointment, AppointmentFilter, AppointmentId, DoctorId,
    NewAppointment,
};

use super::diesel_error_mapping::{
    APPOINTMENT_SLOT_KEY, is_unique_violation, map_diesel_error, map_pool_error,
};
use super::models::{AppointmentRow, AppointmentStatusUpdate, NewAppointmentRow};
use super::pool::{DbPool, PoolError};
use super::schema::appointments;

/// Diesel-backed implementation of the `AppointmentRepository` port.
#[derive(Clone)]
pub struct DieselAppointmentRepository {
    pool: DbPool,
}

impl DieselAppointmentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> AppointmentPersistenceError {
    map_pool_error(error, |message| {
        AppointmentPersistenceError::connection(message)
    })
}

fn map_diesel(error: diesel::result::Error) -> AppointmentPersistenceError {
    map_diesel_error(
        error,
        |message| AppointmentPersistenceError::query(message),
        |message| AppointmentPersistenceError::connection(message),
    )
}

fn to_appointment(row: AppointmentRow) -> Result<Appointment, AppointmentPersistenceError> {
    Appointment::try_from(row).map_err(|err| AppointmentPersistenceError::query(err.to_string()))
}

fn to_appointments(
    rows: Vec<AppointmentRow>,
) -> Result<Vec<Appointment>, AppointmentPersistenceError> {
    rows.into_iter().map(to_appointment).collect()
}

fn live() -> appointments::BoxedQuery<'static, Pg> {
    appointments::table
        .filter(appointments::deleted_at.is_null())
        .into_boxed()
}

fn filtered(filter: &AppointmentFilter) -> appointments::BoxedQuery<'static, Pg> {
    let mut query = live();
    if let Some(status) = filter.status {
        query = query.filter(appointments::status.eq(status.as_str()));
    }
    if let Some(from) = filter.from {
        query = query.filter(appointments::appointment_date.ge(from));
    }
    if let Some(to) = filter.to {
        query = query.filter(appointments::appointment_date.le(to));
    }
    query
}

fn admin_filtered(filter: &AdminAppointmentFilter) -> appointments::BoxedQuery<'static, Pg> {
    let mut query = filtered(&filter.base);
    if let Some(doctor_id) = filter.doctor_id {
        query = query.filter(appointments::doctor_id.eq(doctor_id.get()));
    }
    if let Some(patient_id) = filter.patient_id {
        query = query.filter(appointments::patient_id.eq(patient_id.get()));
    }
    query
}

#[async_trait]
impl AppointmentRepository for DieselAppointmentRepository {
    async fn slot_taken(
        &self,
        doctor_id: DoctorId,
        start: DateTime<Utc>,
    ) -> Result<bool, AppointmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let count: i64 = live()
            .filter(appointments::doctor_id.eq(doctor_id.get()))
            .filter(appointments::start_time.eq(start))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel)?;
        Ok(count > 0)
    }

    async fn insert(
        &self,
        appointment: &NewAppointment,
    ) -> Result<Appointment, AppointmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row = diesel::insert_into(appointments::table)
            .values(&NewAppointmentRow {
                patient_id: appointment.patient_id.get(),
                doctor_id: appointment.doctor_id.get(),
                appointment_date: appointment.appointment_date,
                start_time: appointment.start_time,
                end_time: appointment.end_time,
                reason: appointment.reason.as_deref(),
                notes: appointment.notes.as_deref(),
            })
            .returning(AppointmentRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| {
                if is_unique_violation(&err, APPOINTMENT_SLOT_KEY) {
                    AppointmentPersistenceError::slot_taken()
                } else {
                    map_diesel(err)
                }
            })?;
        to_appointment(row)
    }

    async fn find_by_id(
        &self,
        id: AppointmentId,
    ) -> Result<Option<Appointment>, AppointmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        live()
            .filter(appointments::id.eq(id.get()))
            .select(AppointmentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?
            .map(to_appointment)
            .transpose()
    }

    async fn start_times_on(
        &self,
        doctor_id: DoctorId,
        date: NaiveDate,
    ) -> Result<Vec<DateTime<Utc>>, AppointmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        live()
            .filter(appointments::doctor_id.eq(doctor_id.get()))
            .filter(appointments::appointment_date.eq(date))
            .select(appointments::start_time)
            .order(appointments::start_time.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel)
    }

    async fn list_for(
        &self,
        owner: AppointmentOwner,
        filter: &AppointmentFilter,
    ) -> Result<Vec<Appointment>, AppointmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let query = match owner {
            AppointmentOwner::Doctor(id) => {
                filtered(filter).filter(appointments::doctor_id.eq(id.get()))
            }
            AppointmentOwner::Patient(id) => {
                filtered(filter).filter(appointments::patient_id.eq(id.get()))
            }
        };
        let rows = query
            .order((appointments::start_time.desc(), appointments::id.desc()))
            .select(AppointmentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;
        to_appointments(rows)
    }

    async fn list_page(
        &self,
        filter: &AdminAppointmentFilter,
        page: PageRequest,
    ) -> Result<Page<Appointment>, AppointmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let total: i64 = admin_filtered(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel)?;
        let rows = admin_filtered(filter)
            .order((appointments::start_time.desc(), appointments::id.desc()))
            .limit(i64::from(page.limit()))
            .offset(i64::try_from(page.offset()).unwrap_or(i64::MAX))
            .select(AppointmentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;
        Ok(Page::new(
            to_appointments(rows)?,
            u64::try_from(total).unwrap_or(0),
            page,
        ))
    }

    async fn upcoming_for_doctor(
        &self,
        doctor_id: DoctorId,
        after: NaiveDate,
        limit: u32,
    ) -> Result<Vec<Appointment>, AppointmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let rows = live()
            .filter(appointments::doctor_id.eq(doctor_id.get()))
            .filter(appointments::appointment_date.gt(after))
            .order((appointments::start_time.asc(), appointments::id.asc()))
            .limit(i64::from(limit))
            .select(AppointmentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;
        to_appointments(rows)
    }

    async fn change_status(
        &self,
        change: &StatusChange,
    ) -> Result<Option<Appointment>, AppointmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        diesel::update(
            appointments::table
                .filter(appointments::id.eq(change.id.get()))
                .filter(appointments::status.eq(change.expected.as_str()))
                .filter(appointments::deleted_at.is_null()),
        )
        .set(&AppointmentStatusUpdate {
            status: change.next.as_str(),
            cancellation_reason: change.cancellation_reason.as_deref(),
        })
        .returning(AppointmentRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel)?
        .map(to_appointment)
        .transpose()
    }
}
