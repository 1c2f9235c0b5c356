//! Bearer token extractor.
//!
//! Handlers take [`BearerAuth`] as an argument to require a verified caller;
//! role checks stay explicit in each handler through
//! [`BearerAuth::require_any`].

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use futures_util::future::{Ready, ready};
use tracing::debug;

use crate::domain::{AuthenticatedUser, Error, Role, UserId, token_error};

use super::state::HttpState;

/// Verified caller taken from `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct BearerAuth(AuthenticatedUser);

impl BearerAuth {
    /// The verified identity.
    pub fn caller(&self) -> &AuthenticatedUser {
        &self.0
    }

    /// Id of the calling user.
    pub fn user_id(&self) -> UserId {
        self.0.user_id
    }

    /// Return `403 Forbidden` unless the caller holds one of `roles`.
    pub fn require_any(&self, roles: &[Role]) -> Result<&Self, Error> {
        self.0.require_any(roles)?;
        Ok(self)
    }
}

fn token_from(req: &HttpRequest) -> Result<&str, Error> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("Authorization header is required"))?;
    let value = value
        .to_str()
        .map_err(|_| Error::unauthorized("Authorization header must be Bearer {token}"))?;
    let token = value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| Error::unauthorized("Authorization header must be Bearer {token}"))?;
    Ok(token)
}

fn authenticate(req: &HttpRequest) -> Result<BearerAuth, Error> {
    let token = token_from(req)?;
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state is not configured"))?;
    state.tokens.verify(token).map(BearerAuth).map_err(|err| {
        debug!(error = %err, "bearer token rejected");
        token_error(err)
    })
}

impl FromRequest for BearerAuth {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
