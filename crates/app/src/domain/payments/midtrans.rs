//! Midtrans Snap and Core API client.

use std::{fmt, time::Duration};

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use reqwest::{
    Client, StatusCode,
    header::{ACCEPT, AUTHORIZATION},
};
use serde::Deserialize;

use crate::domain::payments::gateway::{
    GatewayError, PaymentGateway, SnapRequest, SnapToken, TransactionStatus,
};

pub const SNAP_SANDBOX_URL: &str = "https://app.sandbox.midtrans.com/snap/v1/transactions";
pub const SNAP_PRODUCTION_URL: &str = "https://app.midtrans.com/snap/v1/transactions";
pub const API_SANDBOX_URL: &str = "https://api.sandbox.midtrans.com/v2";
pub const API_PRODUCTION_URL: &str = "https://api.midtrans.com/v2";

const FALLBACK_ERROR_MESSAGE: &str = "failed to create payment token";

/// HTTP client for Midtrans, authenticated with the server key.
#[derive(Clone)]
pub struct MidtransClient {
    http: Client,
    snap_url: String,
    api_url: String,
    authorization: String,
}

impl fmt::Debug for MidtransClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MidtransClient")
            .field("snap_url", &self.snap_url)
            .field("api_url", &self.api_url)
            .field("authorization", &"**redacted**")
            .finish_non_exhaustive()
    }
}

impl MidtransClient {
    /// Create a client against the sandbox or production environment.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying HTTP client cannot be built.
    pub fn new(
        server_key: &str,
        is_production: bool,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let (snap_url, api_url) = if is_production {
            (SNAP_PRODUCTION_URL, API_PRODUCTION_URL)
        } else {
            (SNAP_SANDBOX_URL, API_SANDBOX_URL)
        };

        Ok(Self {
            http: Client::builder().timeout(timeout).build()?,
            snap_url: snap_url.to_string(),
            api_url: api_url.to_string(),
            authorization: basic_authorization(server_key),
        })
    }
}

/// `Basic` credentials: the server key as user name, empty password.
fn basic_authorization(server_key: &str) -> String {
    format!("Basic {}", BASE64.encode(format!("{server_key}:")))
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error_messages: Vec<String>,
}

#[async_trait]
impl PaymentGateway for MidtransClient {
    async fn create_transaction(&self, request: &SnapRequest) -> Result<SnapToken, GatewayError> {
        let response = self
            .http
            .post(&self.snap_url)
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, &self.authorization)
            .json(request)
            .send()
            .await?;

        let status = response.status();

        if status == StatusCode::CREATED {
            return Ok(response.json().await?);
        }

        let text = response.text().await.unwrap_or_default();
        let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();

        let messages = if body.error_messages.is_empty() {
            vec![FALLBACK_ERROR_MESSAGE.to_string()]
        } else {
            body.error_messages
        };

        Err(GatewayError::Rejected {
            status: status.as_u16(),
            messages,
        })
    }

    async fn transaction_status(
        &self,
        order_id: &str,
    ) -> Result<TransactionStatus, GatewayError> {
        let response = self
            .http
            .get(format!("{}/{order_id}/status", self.api_url))
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, &self.authorization)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                messages: Vec::new(),
            });
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_authorization_encodes_key_with_empty_password() {
        assert_eq!(
            basic_authorization("SB-Mid-server-abc"),
            "Basic U0ItTWlkLXNlcnZlci1hYmM6"
        );
    }

    #[test]
    fn environment_selects_endpoints() -> Result<(), GatewayError> {
        let sandbox = MidtransClient::new("key", false, Duration::from_secs(5))?;
        let production = MidtransClient::new("key", true, Duration::from_secs(5))?;

        assert_eq!(sandbox.snap_url, SNAP_SANDBOX_URL);
        assert_eq!(sandbox.api_url, API_SANDBOX_URL);
        assert_eq!(production.snap_url, SNAP_PRODUCTION_URL);
        assert_eq!(production.api_url, API_PRODUCTION_URL);

        Ok(())
    }

    #[test]
    fn debug_redacts_credentials() -> Result<(), GatewayError> {
        let client = MidtransClient::new("SB-Mid-server-abc", false, Duration::from_secs(5))?;

        assert!(!format!("{client:?}").contains("U0ItTWlk"));

        Ok(())
    }
}
