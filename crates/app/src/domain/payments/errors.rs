//! Payments service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::payments::gateway::GatewayError;

#[derive(Debug, Error)]
pub enum PaymentsServiceError {
    #[error("payment gateway is not configured")]
    ProviderNotConfigured,

    #[error("order not found")]
    NotFound,

    #[error("order belongs to another account")]
    Forbidden,

    #[error("invalid notification signature")]
    InvalidSignature,

    #[error("invalid data")]
    InvalidData,

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for PaymentsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
