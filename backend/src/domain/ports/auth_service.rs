//! Driving port for account sign-up and login.

use async_trait::async_trait;

use crate::domain::{AuthSession, Credentials, Error, Registration};

/// Use-cases behind `POST /auth/register` and `POST /auth/login`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create an account (and doctor profile) and sign a token for it.
    async fn register(&self, registration: Registration) -> Result<AuthSession, Error>;

    /// Check credentials and sign a token.
    async fn login(&self, credentials: Credentials) -> Result<AuthSession, Error>;
}
