//! PostgreSQL-backed `DoctorRepository` implementation using Diesel ORM.
//!
//! Profiles are read joined with their owning account so the directory can
//! show names and filter on them.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::{Page, PageRequest};

use crate::domain::ports::{DoctorListFilter, DoctorPersistenceError, DoctorRepository};
use crate::domain::{Doctor, DoctorId, DoctorProfile, Schedule, ScheduleDraft, User, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{DoctorRow, NewScheduleRow, ScheduleRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{doctors, schedules, users};

/// Live, available doctors joined with their accounts, narrowed by a
/// [`DoctorListFilter`]. Expands to a boxed query so callers can count or
/// page it.
macro_rules! directory_query {
    ($filter:expr) => {{
        let filter: &DoctorListFilter = $filter;
        let mut query = doctors::table
            .inner_join(users::table)
            .filter(doctors::deleted_at.is_null())
            .filter(users::deleted_at.is_null())
            .filter(doctors::available.eq(true))
            .into_boxed();
        if let Some(specialization) = filter.specialization {
            query = query.filter(doctors::specialization.eq(specialization.as_str()));
        }
        if let Some(name) = filter.name.as_deref() {
            query = query.filter(users::name.ilike(contains_pattern(name)));
        }
        query
    }};
}

/// Diesel-backed implementation of the `DoctorRepository` port.
#[derive(Clone)]
pub struct DieselDoctorRepository {
    pool: DbPool,
}

impl DieselDoctorRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> DoctorPersistenceError {
    map_pool_error(error, |message| DoctorPersistenceError::connection(message))
}

fn map_diesel(error: diesel::result::Error) -> DoctorPersistenceError {
    map_diesel_error(
        error,
        |message| DoctorPersistenceError::query(message),
        |message| DoctorPersistenceError::connection(message),
    )
}

fn corrupt(error: impl ToString) -> DoctorPersistenceError {
    DoctorPersistenceError::query(error.to_string())
}

fn to_profile((doctor, owner): (DoctorRow, UserRow)) -> Result<DoctorProfile, DoctorPersistenceError> {
    let owner = User::try_from(owner).map_err(corrupt)?;
    Ok(DoctorProfile {
        doctor: Doctor::try_from(doctor).map_err(corrupt)?,
        name: owner.name,
        email: owner.email,
    })
}

/// `ILIKE` pattern matching `needle` anywhere, with wildcards escaped.
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl DoctorRepository for DieselDoctorRepository {
    async fn find_profile(
        &self,
        id: DoctorId,
    ) -> Result<Option<DoctorProfile>, DoctorPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        doctors::table
            .inner_join(users::table)
            .filter(doctors::id.eq(id.get()))
            .filter(doctors::deleted_at.is_null())
            .filter(users::deleted_at.is_null())
            .select((DoctorRow::as_select(), UserRow::as_select()))
            .first::<(DoctorRow, UserRow)>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?
            .map(to_profile)
            .transpose()
    }

    async fn find_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<Doctor>, DoctorPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        doctors::table
            .filter(doctors::user_id.eq(user_id.get()))
            .filter(doctors::deleted_at.is_null())
            .select(DoctorRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?
            .map(|row| Doctor::try_from(row).map_err(corrupt))
            .transpose()
    }

    async fn list_available(
        &self,
        filter: &DoctorListFilter,
        page: PageRequest,
    ) -> Result<Page<DoctorProfile>, DoctorPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let total: i64 = directory_query!(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel)?;
        let rows: Vec<(DoctorRow, UserRow)> = directory_query!(filter)
            .order(doctors::id.asc())
            .limit(i64::from(page.limit()))
            .offset(i64::try_from(page.offset()).unwrap_or(i64::MAX))
            .select((DoctorRow::as_select(), UserRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        let profiles = rows
            .into_iter()
            .map(to_profile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(profiles, u64::try_from(total).unwrap_or(0), page))
    }

    async fn create_schedule(
        &self,
        doctor_id: DoctorId,
        draft: &ScheduleDraft,
    ) -> Result<Schedule, DoctorPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row: ScheduleRow = diesel::insert_into(schedules::table)
            .values(&NewScheduleRow {
                doctor_id: doctor_id.get(),
                date: draft.date,
                start_time: draft.start_time.as_naive(),
                end_time: draft.end_time.as_naive(),
            })
            .returning(ScheduleRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel)?;
        Schedule::try_from(row).map_err(corrupt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("smith", "%smith%")]
    #[case("50%_off", "%50\\%\\_off%")]
    #[case("a\\b", "%a\\\\b%")]
    fn escapes_like_wildcards(#[case] needle: &str, #[case] expected: &str) {
        assert_eq!(contains_pattern(needle), expected);
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let err = map_pool(PoolError::checkout("refused"));
        assert!(matches!(err, DoctorPersistenceError::Connection { .. }));
    }
}
