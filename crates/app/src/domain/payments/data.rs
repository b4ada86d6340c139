//! Payment Data

use crate::domain::orders::records::{OrderStatus, OrderUuid};

/// Public gateway settings for the storefront.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    pub client_key: String,
    pub is_production: bool,
}

/// Issued hosted payment page token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentToken {
    pub token: String,
    pub redirect_url: Option<String>,

    /// Transaction id the gateway accepted.
    pub gateway_order_id: String,
}

/// Outcome of a status poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentStatus {
    pub order_uuid: OrderUuid,
    pub status: OrderStatus,

    /// Raw gateway state; absent when the stored status was returned.
    pub transaction_status: Option<String>,
}

/// Signed status notification pushed by the gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentNotification {
    pub order_id: String,
    pub status_code: String,
    pub gross_amount: String,
    pub signature_key: String,
    pub transaction_status: String,
    pub fraud_status: Option<String>,
    pub transaction_id: Option<String>,
}
