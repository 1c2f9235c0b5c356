//! Profile self-service and account administration.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use tracing::info;

use super::port_errors::{doctor_error, hash_error, user_error};
use super::ports::{
    DoctorRepository, PasswordHasher, Profile, ProfileChanges, ProfileUpdate, UserListFilter,
    UserPersistenceError, UserRepository, UserService,
};
use super::{Error, Role, User, UserId};

/// [`UserService`] backed by the user and doctor repositories.
#[derive(Clone)]
pub struct UserServiceImpl<U, D, H> {
    users: Arc<U>,
    doctors: Arc<D>,
    hasher: Arc<H>,
}

impl<U, D, H> UserServiceImpl<U, D, H> {
    /// Wire the service to its adapters.
    pub fn new(users: Arc<U>, doctors: Arc<D>, hasher: Arc<H>) -> Self {
        Self {
            users,
            doctors,
            hasher,
        }
    }
}

fn user_not_found() -> Error {
    Error::not_found("User not found")
}

#[async_trait]
impl<U, D, H> UserService for UserServiceImpl<U, D, H>
where
    U: UserRepository,
    D: DoctorRepository,
    H: PasswordHasher,
{
    async fn profile(&self, user_id: UserId) -> Result<Profile, Error> {
        let user = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(user_error)?
            .ok_or_else(user_not_found)?;
        let doctor = if user.role == Role::Doctor {
            self.doctors
                .find_by_user(user_id)
                .await
                .map_err(doctor_error)?
        } else {
            None
        };
        Ok(Profile { user, doctor })
    }

    async fn update_profile(
        &self,
        user_id: UserId,
        update: ProfileUpdate,
    ) -> Result<User, Error> {
        let ProfileUpdate {
            name,
            email,
            password,
        } = update;
        let password_hash = match password {
            Some(password) => Some(self.hasher.hash(&password).await.map_err(hash_error)?),
            None => None,
        };
        let changes = ProfileChanges {
            name,
            email,
            password_hash,
        };

        if changes.is_empty() {
            return self
                .users
                .find_by_id(user_id)
                .await
                .map_err(user_error)?
                .ok_or_else(user_not_found);
        }

        let updated = self
            .users
            .update_profile(user_id, &changes)
            .await
            .map_err(|err| match err {
                UserPersistenceError::DuplicateEmail { .. } => {
                    Error::invalid_request("Email already in use")
                }
                other => user_error(other),
            })?
            .ok_or_else(user_not_found)?;

        info!(
            user_id = %user_id,
            name_changed = changes.name.is_some(),
            email_changed = changes.email.is_some(),
            password_changed = changes.password_hash.is_some(),
            "profile updated"
        );
        Ok(updated)
    }

    async fn list_users(
        &self,
        filter: UserListFilter,
        page: PageRequest,
    ) -> Result<Page<User>, Error> {
        self.users.list(filter, page).await.map_err(user_error)
    }

    async fn set_user_active(&self, user_id: UserId, active: bool) -> Result<(), Error> {
        let found = self
            .users
            .set_active(user_id, active)
            .await
            .map_err(user_error)?;
        if !found {
            return Err(user_not_found());
        }
        info!(user_id = %user_id, active, "account status changed");
        Ok(())
    }
}
