//! Port for user account persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::{Page, PageRequest};

use crate::domain::{Doctor, DoctorDraft, EmailAddress, PersonName, Role, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another live account already uses the email address.
        DuplicateEmail { email: String } => "email already registered: {email}",
    }
}

/// Account row to create, optionally with its doctor profile.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: PersonName,
    pub email: EmailAddress,
    pub password_hash: String,
    pub role: Role,
    pub doctor: Option<DoctorDraft>,
}

/// Result of creating an account.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedAccount {
    pub user: User,
    pub doctor: Option<Doctor>,
}

/// Field updates applied to a profile. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    pub name: Option<PersonName>,
    pub email: Option<EmailAddress>,
    pub password_hash: Option<String>,
}

impl ProfileChanges {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.password_hash.is_none()
    }
}

/// Filters for the admin user list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserListFilter {
    pub role: Option<Role>,
    pub active: Option<bool>,
}

/// Port for reading and writing user accounts.
///
/// Soft-deleted accounts are invisible to every method.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert the user and, when present, its doctor profile atomically.
    ///
    /// Fails with [`UserPersistenceError::DuplicateEmail`] when the email is
    /// taken.
    async fn create_account(
        &self,
        account: &NewAccount,
    ) -> Result<CreatedAccount, UserPersistenceError>;

    /// Load a user by id.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Load a user by normalised email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Apply profile changes in one transaction.
    ///
    /// Returns `Ok(None)` when the user does not exist and
    /// [`UserPersistenceError::DuplicateEmail`] when the new email belongs to
    /// another account.
    async fn update_profile(
        &self,
        id: UserId,
        changes: &ProfileChanges,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Record a successful login.
    async fn record_login(
        &self,
        id: UserId,
        at: DateTime<Utc>,
    ) -> Result<(), UserPersistenceError>;

    /// List users ordered by id.
    async fn list(
        &self,
        filter: UserListFilter,
        page: PageRequest,
    ) -> Result<Page<User>, UserPersistenceError>;

    /// Activate or deactivate an account. Returns `false` if it does not exist.
    async fn set_active(&self, id: UserId, active: bool) -> Result<bool, UserPersistenceError>;
}
