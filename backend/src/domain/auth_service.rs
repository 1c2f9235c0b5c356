//! Account sign-up and login.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info, warn};

use super::port_errors::{hash_error, token_error, user_error};
use super::ports::{AuthService, NewAccount, PasswordHasher, TokenService, UserRepository};
use super::{AuthSession, Credentials, Error, Registration, User};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// [`AuthService`] backed by a user repository, a password hasher and a
/// token signer.
#[derive(Clone)]
pub struct AuthServiceImpl<U, H, T> {
    users: Arc<U>,
    hasher: Arc<H>,
    tokens: Arc<T>,
    clock: Arc<dyn Clock>,
}

impl<U, H, T> AuthServiceImpl<U, H, T> {
    /// Wire the service to its adapters.
    pub fn new(users: Arc<U>, hasher: Arc<H>, tokens: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            hasher,
            tokens,
            clock,
        }
    }
}

impl<U, H, T> AuthServiceImpl<U, H, T>
where
    T: TokenService,
{
    fn session_for(&self, user: User) -> Result<AuthSession, Error> {
        let token = self.tokens.issue(&user).map_err(token_error)?;
        Ok(AuthSession { token, user })
    }
}

#[async_trait]
impl<U, H, T> AuthService for AuthServiceImpl<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenService,
{
    async fn register(&self, registration: Registration) -> Result<AuthSession, Error> {
        let Registration {
            name,
            email,
            password,
            role,
            doctor,
        } = registration;

        if !role.is_self_registrable() {
            return Err(Error::invalid_request("role must be patient or doctor"));
        }
        if self
            .users
            .find_by_email(&email)
            .await
            .map_err(user_error)?
            .is_some()
        {
            debug!(%email, "registration rejected: email taken");
            return Err(Error::invalid_request("Email already registered"));
        }

        let password_hash = self.hasher.hash(&password).await.map_err(hash_error)?;
        let account = NewAccount {
            name,
            email,
            password_hash,
            role,
            doctor,
        };
        let created = self
            .users
            .create_account(&account)
            .await
            .map_err(user_error)?;

        info!(
            user_id = %created.user.id,
            role = %created.user.role,
            doctor_id = ?created.doctor.as_ref().map(|d| d.id.get()),
            "account registered"
        );
        self.session_for(created.user)
    }

    async fn login(&self, credentials: Credentials) -> Result<AuthSession, Error> {
        let Credentials { email, password } = credentials;
        let Some(user) = self
            .users
            .find_by_email(&email)
            .await
            .map_err(user_error)?
        else {
            debug!(%email, "login rejected: unknown email");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let matches = self
            .hasher
            .verify(&password, &user.password_hash)
            .await
            .map_err(hash_error)?;
        if !matches {
            debug!(user_id = %user.id, "login rejected: wrong password");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        if !user.active {
            warn!(user_id = %user.id, "login rejected: account deactivated");
            return Err(Error::forbidden("Account is deactivated"));
        }

        let now = self.clock.utc();
        self.users
            .record_login(user.id, now)
            .await
            .map_err(user_error)?;
        let user = User {
            last_login_at: Some(now),
            ..user
        };
        self.session_for(user)
    }
}

#[cfg(test)]
#[path = "auth_service_tests.rs"]
mod tests;
