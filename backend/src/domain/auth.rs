//! Registration, login and the authenticated caller.

use super::doctor::DoctorDraft;
use super::error::Error;
use super::ids::UserId;
use super::user::{EmailAddress, PersonName, PlainPassword, Role, User};

/// Identity extracted from a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub email: String,
    pub role: Role,
}

impl AuthenticatedUser {
    /// Return `403 Forbidden` unless the caller holds one of `roles`.
    ///
    /// # Examples
    /// ```
    /// use booking_backend::domain::{AuthenticatedUser, Role, UserId};
    ///
    /// let caller = AuthenticatedUser {
    ///     user_id: UserId::new(1).expect("id"),
    ///     email: "p@example.com".into(),
    ///     role: Role::Patient,
    /// };
    /// assert!(caller.require_any(&[Role::Patient]).is_ok());
    /// assert!(caller.require_any(&[Role::Admin]).is_err());
    /// ```
    pub fn require_any(&self, roles: &[Role]) -> Result<(), Error> {
        if roles.contains(&self.role) {
            Ok(())
        } else {
            Err(Error::forbidden("Insufficient permissions"))
        }
    }
}

/// Validated sign-up request.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: PersonName,
    pub email: EmailAddress,
    pub password: PlainPassword,
    pub role: Role,
    /// Present exactly when `role` is [`Role::Doctor`].
    pub doctor: Option<DoctorDraft>,
}

/// Login credentials.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: EmailAddress,
    pub password: PlainPassword,
}

/// Token and account summary returned after registering or logging in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}
