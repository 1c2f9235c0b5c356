//! Driving port for profile and account administration.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Doctor, EmailAddress, Error, PersonName, PlainPassword, User, UserId};

use super::UserListFilter;

/// A user together with their doctor profile, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub user: User,
    pub doctor: Option<Doctor>,
}

/// Self-service profile edits. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<PersonName>,
    pub email: Option<EmailAddress>,
    pub password: Option<PlainPassword>,
}

/// Use-cases behind `/users/profile` and `/admin/users`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    /// Load the caller's profile.
    async fn profile(&self, user_id: UserId) -> Result<Profile, Error>;

    /// Apply the caller's edits and return the updated account.
    async fn update_profile(&self, user_id: UserId, update: ProfileUpdate)
    -> Result<User, Error>;

    /// Page through accounts.
    async fn list_users(
        &self,
        filter: UserListFilter,
        page: PageRequest,
    ) -> Result<Page<User>, Error>;

    /// Activate or deactivate an account.
    async fn set_user_active(&self, user_id: UserId, active: bool) -> Result<(), Error>;
}
