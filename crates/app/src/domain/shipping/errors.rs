//! Shipping service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::shipping::provider::ShippingProviderError;

#[derive(Debug, Error)]
pub enum ShippingServiceError {
    #[error("shipping provider is not configured")]
    ProviderNotConfigured,

    #[error("destination area is required")]
    DestinationRequired,

    #[error("order not found")]
    NotFound,

    #[error("order belongs to another account")]
    Forbidden,

    #[error("shipment already created for this order")]
    ShipmentExists,

    #[error("order has not been paid")]
    OrderNotPaid,

    #[error("invalid data")]
    InvalidData,

    #[error(transparent)]
    Provider(#[from] ShippingProviderError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for ShippingServiceError {
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
