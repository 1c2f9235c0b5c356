//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Account creation writes the user and its doctor profile in one
//! transaction. Profile edits check email uniqueness and update inside one
//! transaction as well; the partial unique index catches anything that slips
//! between concurrent transactions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use pagination::{Page, PageRequest};

use crate::domain::ports::{
    CreatedAccount, NewAccount, ProfileChanges, UserListFilter, UserPersistenceError,
    UserRepository,
};
use crate::domain::{Doctor, EmailAddress, User, UserId};

use super::diesel_error_mapping::{
    USERS_EMAIL_KEY, is_unique_violation, map_diesel_error, map_pool_error,
};
use super::models::{DoctorRow, NewDoctorRow, NewUserRow, UserProfileUpdate, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{doctors, users};

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failure inside a write transaction.
#[derive(Debug)]
enum WriteError {
    Diesel(diesel::result::Error),
    EmailTaken,
}

impl From<diesel::result::Error> for WriteError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

fn map_pool(error: PoolError) -> UserPersistenceError {
    map_pool_error(error, |message| UserPersistenceError::connection(message))
}

fn map_diesel(error: diesel::result::Error) -> UserPersistenceError {
    map_diesel_error(
        error,
        |message| UserPersistenceError::query(message),
        |message| UserPersistenceError::connection(message),
    )
}

fn map_write(error: WriteError, email: &EmailAddress) -> UserPersistenceError {
    match error {
        WriteError::EmailTaken => UserPersistenceError::duplicate_email(email.to_string()),
        WriteError::Diesel(err) if is_unique_violation(&err, USERS_EMAIL_KEY) => {
            UserPersistenceError::duplicate_email(email.to_string())
        }
        WriteError::Diesel(err) => map_diesel(err),
    }
}

fn to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    User::try_from(row).map_err(|err| UserPersistenceError::query(err.to_string()))
}

fn to_doctor(row: DoctorRow) -> Result<Doctor, UserPersistenceError> {
    Doctor::try_from(row).map_err(|err| UserPersistenceError::query(err.to_string()))
}

fn live_users() -> users::BoxedQuery<'static, Pg> {
    users::table
        .filter(users::deleted_at.is_null())
        .into_boxed()
}

fn filtered_users(filter: UserListFilter) -> users::BoxedQuery<'static, Pg> {
    let mut query = live_users();
    if let Some(role) = filter.role {
        query = query.filter(users::role.eq(role.as_str()));
    }
    if let Some(active) = filter.active {
        query = query.filter(users::active.eq(active));
    }
    query
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create_account(
        &self,
        account: &NewAccount,
    ) -> Result<CreatedAccount, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let (user_row, doctor_row) = conn
            .transaction::<_, WriteError, _>(|conn| {
                async move {
                    let user_row = diesel::insert_into(users::table)
                        .values(&NewUserRow {
                            name: account.name.as_ref(),
                            email: account.email.as_ref(),
                            password_hash: &account.password_hash,
                            role: account.role.as_str(),
                        })
                        .returning(UserRow::as_returning())
                        .get_result(conn)
                        .await?;

                    let doctor_row = match &account.doctor {
                        Some(draft) => Some(
                            diesel::insert_into(doctors::table)
                                .values(&NewDoctorRow {
                                    user_id: user_row.id,
                                    specialization: draft.specialization.as_str(),
                                    qualification: &draft.qualification,
                                    experience_years: draft.experience_years,
                                    bio: &draft.bio,
                                    consultation_fee: draft.consultation_fee,
                                })
                                .returning(DoctorRow::as_returning())
                                .get_result(conn)
                                .await?,
                        ),
                        None => None,
                    };
                    Ok((user_row, doctor_row))
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_write(err, &account.email))?;

        Ok(CreatedAccount {
            user: to_user(user_row)?,
            doctor: doctor_row.map(to_doctor).transpose()?,
        })
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        live_users()
            .filter(users::id.eq(id.get()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?
            .map(to_user)
            .transpose()
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        live_users()
            .filter(users::email.eq(email.as_ref().to_owned()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?
            .map(to_user)
            .transpose()
    }

    async fn update_profile(
        &self,
        id: UserId,
        changes: &ProfileChanges,
    ) -> Result<Option<User>, UserPersistenceError> {
        if changes.is_empty() {
            return self.find_by_id(id).await;
        }
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let user_id = id.get();

        let row = conn
            .transaction::<_, WriteError, _>(|conn| {
                async move {
                    if let Some(email) = &changes.email {
                        let taken: i64 = users::table
                            .filter(users::deleted_at.is_null())
                            .filter(users::email.eq(email.as_ref()))
                            .filter(users::id.ne(user_id))
                            .count()
                            .get_result(conn)
                            .await?;
                        if taken > 0 {
                            return Err(WriteError::EmailTaken);
                        }
                    }

                    let row = diesel::update(
                        users::table
                            .filter(users::id.eq(user_id))
                            .filter(users::deleted_at.is_null()),
                    )
                    .set(&UserProfileUpdate {
                        name: changes.name.as_ref().map(AsRef::<str>::as_ref),
                        email: changes.email.as_ref().map(AsRef::<str>::as_ref),
                        password_hash: changes.password_hash.as_deref(),
                    })
                    .returning(UserRow::as_returning())
                    .get_result(conn)
                    .await
                    .optional()?;
                    Ok(row)
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| match &changes.email {
                Some(email) => map_write(err, email),
                None => match err {
                    WriteError::Diesel(err) => map_diesel(err),
                    WriteError::EmailTaken => UserPersistenceError::query("email check failed"),
                },
            })?;

        row.map(to_user).transpose()
    }

    async fn record_login(
        &self,
        id: UserId,
        at: DateTime<Utc>,
    ) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        diesel::update(users::table.filter(users::id.eq(id.get())))
            .set(users::last_login_at.eq(Some(at)))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel)
    }

    async fn list(
        &self,
        filter: UserListFilter,
        page: PageRequest,
    ) -> Result<Page<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let total: i64 = filtered_users(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel)?;
        let rows: Vec<UserRow> = filtered_users(filter)
            .order(users::id.asc())
            .limit(i64::from(page.limit()))
            .offset(i64::try_from(page.offset()).unwrap_or(i64::MAX))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        let users = rows
            .into_iter()
            .map(to_user)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(users, u64::try_from(total).unwrap_or(0), page))
    }

    async fn set_active(&self, id: UserId, active: bool) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let updated = diesel::update(
            users::table
                .filter(users::id.eq(id.get()))
                .filter(users::deleted_at.is_null()),
        )
        .set(users::active.eq(active))
        .execute(&mut conn)
        .await
        .map_err(map_diesel)?;
        Ok(updated > 0)
    }
}

#[cfg(test)]
mod tests {
    //! Error mapping coverage; queries are exercised against PostgreSQL only.

    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let err = map_pool(PoolError::checkout("connection refused"));
        assert!(matches!(err, UserPersistenceError::Connection { .. }));
        assert!(err.to_string().contains("connection refused"));
    }

    #[rstest]
    fn email_check_failure_maps_to_duplicate() {
        let email = EmailAddress::new("jane@example.com").expect("email");
        assert_eq!(
            map_write(WriteError::EmailTaken, &email),
            UserPersistenceError::duplicate_email("jane@example.com")
        );
    }

    #[rstest]
    fn other_diesel_errors_map_to_query() {
        let email = EmailAddress::new("jane@example.com").expect("email");
        let err = map_write(WriteError::Diesel(diesel::result::Error::NotFound), &email);
        assert!(matches!(err, UserPersistenceError::Query { .. }));
    }
}
