//! Payment gateway seam and its wire types.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while talking to the payment gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport, timeout or body decoding failure.
    #[error("payment gateway request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway refused the request.
    #[error("payment gateway rejected the request ({status}): {}", messages.join("; "))]
    Rejected { status: u16, messages: Vec<String> },
}

impl GatewayError {
    /// Whether the gateway refused the transaction id as already used.
    #[must_use]
    pub fn is_order_id_collision(&self) -> bool {
        match self {
            Self::Http(_) => false,
            Self::Rejected { messages, .. } => messages.iter().any(|message| {
                let message = message.to_lowercase();

                message.contains("already") || message.contains("used") || message.contains("exist")
            }),
        }
    }

    /// Upstream HTTP status, when the gateway produced one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http(error) => error.status().map(|s| s.as_u16()),
            Self::Rejected { status, .. } => Some(*status),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionDetails {
    pub order_id: String,
    pub gross_amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemDetail {
    pub id: String,
    pub price: u64,
    pub quantity: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerAddress {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,

    pub country_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub billing_address: CustomerAddress,
    pub shipping_address: CustomerAddress,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreditCard {
    pub secure: bool,
}

/// Hosted payment page transaction request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapRequest {
    pub transaction_details: TransactionDetails,
    pub customer_details: CustomerDetails,
    pub item_details: Vec<ItemDetail>,
    pub credit_card: CreditCard,
}

/// Token issued for a hosted payment page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SnapToken {
    pub token: String,

    #[serde(default)]
    pub redirect_url: Option<String>,
}

/// Transaction state as reported by the gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TransactionStatus {
    #[serde(default)]
    pub transaction_status: Option<String>,

    #[serde(default)]
    pub fraud_status: Option<String>,

    #[serde(default)]
    pub transaction_id: Option<String>,
}

/// Payment gateway operations.
#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a hosted payment page transaction.
    async fn create_transaction(&self, request: &SnapRequest) -> Result<SnapToken, GatewayError>;

    /// Look up a transaction by the id it was created with.
    async fn transaction_status(&self, order_id: &str)
    -> Result<TransactionStatus, GatewayError>;
}

/// A configured gateway plus the credentials the service needs directly.
#[derive(Clone)]
pub struct PaymentProvider {
    pub gateway: Arc<dyn PaymentGateway>,

    /// Signs webhook payloads.
    pub server_key: String,

    /// Public key handed to the storefront.
    pub client_key: String,

    pub is_production: bool,
}

impl fmt::Debug for PaymentProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentProvider")
            .field("server_key", &"**redacted**")
            .field("client_key", &self.client_key)
            .field("is_production", &self.is_production)
            .finish_non_exhaustive()
    }
}
