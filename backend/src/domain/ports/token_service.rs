//! Port for issuing and verifying bearer tokens.

use crate::domain::{AuthenticatedUser, User};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token adapters.
    pub enum TokenError {
        /// The token could not be produced.
        Issue { message: String } => "failed to issue token: {message}",
        /// The token is malformed, has a bad signature or carries bad claims.
        Invalid { message: String } => "invalid token: {message}",
        /// The token's expiry has passed.
        Expired => "token expired",
    }
}

/// Port for signing tokens for users and turning tokens back into callers.
#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Sign a token carrying the user's id, email and role.
    fn issue(&self, user: &User) -> Result<String, TokenError>;

    /// Verify a token and return the caller it identifies.
    fn verify(&self, token: &str) -> Result<AuthenticatedUser, TokenError>;
}
