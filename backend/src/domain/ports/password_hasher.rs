//! Port for one-way password hashing.

use async_trait::async_trait;

use crate::domain::PlainPassword;

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHashError {
        /// Hashing failed.
        Hash { message: String } => "password hashing failed: {message}",
        /// A stored hash could not be parsed.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
    }
}

/// Port for hashing new passwords and checking candidates against stored hashes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Produce a salted PHC string for the password.
    async fn hash(&self, password: &PlainPassword) -> Result<String, PasswordHashError>;

    /// Check a candidate against a stored PHC string.
    async fn verify(
        &self,
        password: &PlainPassword,
        stored_hash: &str,
    ) -> Result<bool, PasswordHashError>;
}
