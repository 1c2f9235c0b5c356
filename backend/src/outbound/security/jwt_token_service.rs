//! HS256 JSON Web Tokens implementing the `TokenService` port.
//!
//! Expiry is checked against the injected clock rather than the system time
//! so tests can move time deliberately.

use std::fmt;
use std::sync::Arc;

use chrono::TimeDelta;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};

use crate::domain::ports::{TokenError, TokenService};
use crate::domain::{AuthenticatedUser, Role, User, UserId};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    role: String,
    iat: i64,
    exp: i64,
}

/// Signs and verifies bearer tokens with a shared secret.
#[derive(Clone)]
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for JwtTokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtTokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl JwtTokenService {
    /// Create a service signing with `secret`; tokens live for `ttl`.
    pub fn new(secret: &[u8], ttl: TimeDelta, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
            clock,
        }
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, user: &User) -> Result<String, TokenError> {
        let issued_at = self.clock.utc();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.to_string(),
            role: user.role.as_str().to_owned(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| TokenError::issue(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<AuthenticatedUser, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|err| TokenError::invalid(err.to_string()))?
            .claims;
        if claims.exp <= self.clock.utc().timestamp() {
            return Err(TokenError::expired());
        }

        let user_id = claims
            .sub
            .parse::<i64>()
            .ok()
            .and_then(|raw| UserId::new(raw).ok())
            .ok_or_else(|| TokenError::invalid("subject is not a user id"))?;
        let role = claims
            .role
            .parse::<Role>()
            .map_err(|err| TokenError::invalid(err.to_string()))?;
        Ok(AuthenticatedUser {
            user_id,
            email: claims.email,
            role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FixedClock, fixtures};
    use rstest::{fixture, rstest};

    const SECRET: &[u8] = b"test-secret";

    #[fixture]
    fn clock() -> Arc<FixedClock> {
        Arc::new(FixedClock::at("2025-01-10T08:00:00Z"))
    }

    fn service(clock: Arc<FixedClock>) -> JwtTokenService {
        JwtTokenService::new(SECRET, TimeDelta::hours(24), clock)
    }

    #[rstest]
    fn issued_token_round_trips_identity(clock: Arc<FixedClock>) {
        let tokens = service(clock);
        let user = fixtures::user(7, Role::Doctor);

        let token = tokens.issue(&user).expect("token");
        let caller = tokens.verify(&token).expect("valid token");

        assert_eq!(caller.user_id, user.id);
        assert_eq!(caller.role, Role::Doctor);
        assert_eq!(caller.email, "user7@example.com");
    }

    #[rstest]
    fn token_expires_after_ttl(clock: Arc<FixedClock>) {
        let tokens = service(Arc::clone(&clock));
        let token = tokens
            .issue(&fixtures::user(1, Role::Patient))
            .expect("token");

        clock.advance(TimeDelta::hours(23));
        assert!(tokens.verify(&token).is_ok());

        clock.advance(TimeDelta::hours(1));
        assert_eq!(tokens.verify(&token), Err(TokenError::expired()));
    }

    #[rstest]
    fn token_signed_with_other_secret_is_invalid(clock: Arc<FixedClock>) {
        let forged = JwtTokenService::new(b"other", TimeDelta::hours(1), clock.clone())
            .issue(&fixtures::user(1, Role::Admin))
            .expect("token");

        let err = service(clock).verify(&forged).expect_err("bad signature");
        assert!(matches!(err, TokenError::Invalid { .. }));
    }

    #[rstest]
    #[case("")]
    #[case("not-a-jwt")]
    #[case("a.b.c")]
    fn malformed_tokens_are_invalid(clock: Arc<FixedClock>, #[case] token: &str) {
        assert!(matches!(
            service(clock).verify(token),
            Err(TokenError::Invalid { .. })
        ));
    }
}
