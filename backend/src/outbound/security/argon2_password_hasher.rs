//! Argon2id implementation of the `PasswordHasher` port.
//!
//! Hashing is CPU-bound, so both operations run on tokio's blocking pool.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    self, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::PlainPassword;
use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Argon2id hasher producing PHC strings with a random salt.
#[derive(Debug, Clone, Default)]
pub struct Argon2PasswordHasher {
    params: Params,
}

impl Argon2PasswordHasher {
    /// Use explicit cost parameters instead of the library defaults.
    pub fn with_params(params: Params) -> Self {
        Self { params }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

fn task_failed(err: tokio::task::JoinError) -> PasswordHashError {
    PasswordHashError::hash(format!("hashing task failed: {err}"))
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, password: &PlainPassword) -> Result<String, PasswordHashError> {
        let argon2 = self.argon2();
        let password = Zeroizing::new(password.expose().to_owned());
        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            argon2
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|err| PasswordHashError::hash(err.to_string()))
        })
        .await
        .map_err(task_failed)?
    }

    async fn verify(
        &self,
        password: &PlainPassword,
        stored_hash: &str,
    ) -> Result<bool, PasswordHashError> {
        let argon2 = self.argon2();
        let password = Zeroizing::new(password.expose().to_owned());
        let stored_hash = stored_hash.to_owned();
        tokio::task::spawn_blocking(move || {
            let parsed = PasswordHash::new(&stored_hash)
                .map_err(|err| PasswordHashError::malformed_hash(err.to_string()))?;
            match argon2.verify_password(password.as_bytes(), &parsed) {
                Ok(()) => Ok(true),
                Err(password_hash::Error::Password) => Ok(false),
                Err(err) => Err(PasswordHashError::hash(err.to_string())),
            }
        })
        .await
        .map_err(task_failed)?
    }
}
