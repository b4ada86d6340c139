//! Session tokens.
//!
//! Sessions are HS256 JWTs whose subject is the account uuid. They are
//! carried in an HTTP-only cookie by the JSON API.

use std::fmt;

use jiff::Timestamp;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{auth::AuthError, domain::accounts::records::AccountUuid};

/// Name of the cookie holding the session token.
pub const SESSION_COOKIE: &str = "store_auth_token";

/// Session lifetime in days.
pub const SESSION_TTL_DAYS: i64 = 7;

const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionKeys(**redacted**)")
    }
}

impl SessionKeys {
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issue a session token for an account, valid for [`SESSION_TTL_DAYS`].
    ///
    /// # Errors
    ///
    /// Returns an error when the token cannot be signed.
    pub fn issue(&self, account: AccountUuid) -> Result<String, AuthError> {
        self.issue_at(account, Timestamp::now())
    }

    fn issue_at(&self, account: AccountUuid, now: Timestamp) -> Result<String, AuthError> {
        let iat = now.as_second();

        let claims = SessionClaims {
            sub: account.into_uuid(),
            iat,
            exp: iat + SESSION_TTL_DAYS * SECONDS_PER_DAY,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(AuthError::TokenSigning)
    }

    /// Verify a session token and return the account it belongs to.
    ///
    /// # Errors
    ///
    /// Returns an error when the signature is wrong or the token has expired.
    pub fn verify(&self, token: &str) -> Result<AccountUuid, AuthError> {
        let data = decode::<SessionClaims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map_err(AuthError::InvalidToken)?;

        Ok(AccountUuid::from_uuid(data.claims.sub))
    }
}

#[cfg(test)]
mod tests {
    use jiff::{SignedDuration, Timestamp};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn issued_token_verifies_to_same_account() -> TestResult {
        let keys = SessionKeys::new("test-secret");
        let account = AccountUuid::new();

        let token = keys.issue(account)?;

        assert_eq!(keys.verify(&token)?, account);

        Ok(())
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() -> TestResult {
        let token = SessionKeys::new("one").issue(AccountUuid::new())?;

        let result = SessionKeys::new("two").verify(&token);

        assert!(
            matches!(result, Err(AuthError::InvalidToken(_))),
            "expected InvalidToken, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn expired_token_is_rejected() -> TestResult {
        let keys = SessionKeys::new("test-secret");
        let issued = Timestamp::now() - SignedDuration::from_hours(24 * 8);

        let token = keys.issue_at(AccountUuid::new(), issued)?;

        assert!(keys.verify(&token).is_err(), "week-old token should expire");

        Ok(())
    }

    #[test]
    fn garbage_token_is_rejected() {
        let keys = SessionKeys::new("test-secret");

        assert!(keys.verify("not.a.jwt").is_err());
    }

    #[test]
    fn debug_output_hides_keys() {
        let keys = SessionKeys::new("super-secret");

        assert_eq!(format!("{keys:?}"), "SessionKeys(**redacted**)");
    }
}
