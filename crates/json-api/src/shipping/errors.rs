//! Shipping Errors

use salvo::http::StatusError;
use tracing::error;

use bazaar_app::domain::shipping::ShippingServiceError;

use crate::extensions::upstream_status_error;

pub(crate) fn into_status_error(error: ShippingServiceError) -> StatusError {
    match error {
        ShippingServiceError::ProviderNotConfigured => {
            StatusError::bad_request().brief("Shipping provider is not configured")
        }
        ShippingServiceError::DestinationRequired => {
            StatusError::bad_request().brief("Destination area is required")
        }
        ShippingServiceError::OrderNotPaid => {
            StatusError::bad_request().brief("Order has not been paid")
        }
        ShippingServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid shipping payload")
        }
        ShippingServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        ShippingServiceError::Forbidden => StatusError::forbidden().brief("Access denied"),
        ShippingServiceError::ShipmentExists => {
            StatusError::conflict().brief("Shipment already created for this order")
        }
        ShippingServiceError::Provider(source) => {
            error!("shipping provider error: {source}");

            upstream_status_error(source.status(), &source.to_string())
        }
        ShippingServiceError::Sql(source) => {
            error!("shipping storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;

    use bazaar_app::domain::shipping::ShippingProviderError;

    use super::*;

    #[test]
    fn test_provider_status_is_relayed() {
        let error = into_status_error(ShippingServiceError::Provider(
            ShippingProviderError::Status {
                status: 400,
                message: "No courier available".to_string(),
            },
        ));

        assert_eq!(error.code, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_provider_auth_failure_is_not_relayed() {
        let error = into_status_error(ShippingServiceError::Provider(
            ShippingProviderError::Status {
                status: 401,
                message: "Invalid API key".to_string(),
            },
        ));

        assert_eq!(error.code, StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_duplicate_shipment_is_conflict() {
        assert_eq!(
            into_status_error(ShippingServiceError::ShipmentExists).code,
            StatusCode::CONFLICT
        );
    }
}
