//! Authentication errors.

use argon2::password_hash;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("failed to hash password")]
    PasswordHash(#[source] password_hash::Error),

    #[error("failed to sign session token")]
    TokenSigning(#[source] jsonwebtoken::errors::Error),

    #[error("session token is invalid or expired")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),
}
