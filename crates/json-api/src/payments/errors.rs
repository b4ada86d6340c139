//! Payment Errors

use salvo::http::StatusError;
use tracing::{error, warn};

use bazaar_app::domain::payments::PaymentsServiceError;

pub(crate) fn into_status_error(error: PaymentsServiceError) -> StatusError {
    match error {
        PaymentsServiceError::ProviderNotConfigured => {
            StatusError::bad_request().brief("Payment gateway is not configured")
        }
        PaymentsServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        PaymentsServiceError::Forbidden => StatusError::forbidden().brief("Access denied"),
        PaymentsServiceError::InvalidSignature => {
            warn!("rejected payment notification with an invalid signature");

            StatusError::forbidden().brief("Invalid signature")
        }
        PaymentsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid payment payload")
        }
        PaymentsServiceError::Gateway(source) => {
            error!(status = ?source.status(), "payment gateway error: {source}");

            StatusError::bad_gateway().brief("Payment gateway request failed")
        }
        PaymentsServiceError::Sql(source) => {
            error!("payment storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
