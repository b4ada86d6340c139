//! Biteship REST client.

use std::{fmt, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;

use crate::domain::shipping::provider::{
    Area, ProviderOrder, RateRequest, RatesResponse, ShipmentRequest, ShippingProvider,
    ShippingProviderError,
};

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://api.biteship.com";

const FALLBACK_ERROR_MESSAGE: &str = "shipping provider request failed";

/// HTTP client for the Biteship aggregator (Bearer auth).
#[derive(Clone)]
pub struct BiteshipClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl fmt::Debug for BiteshipClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BiteshipClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"**redacted**")
            .finish_non_exhaustive()
    }
}

impl BiteshipClient {
    /// Create a client with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ShippingProviderError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn read<T: DeserializeOwned>(response: Response) -> Result<T, ShippingProviderError> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();

            return Err(ShippingProviderError::Status {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        Ok(response.json().await?)
    }
}

#[derive(Debug, Deserialize)]
struct AreasResponse {
    #[serde(default)]
    areas: Vec<Area>,
}

#[async_trait]
impl ShippingProvider for BiteshipClient {
    async fn search_areas(&self, input: &str) -> Result<Vec<Area>, ShippingProviderError> {
        let response = self
            .http
            .get(self.url("/v1/maps/areas"))
            .bearer_auth(&self.api_key)
            .query(&[("countries", "ID"), ("input", input), ("type", "single")])
            .send()
            .await?;

        let parsed: AreasResponse = Self::read(response).await?;

        Ok(parsed.areas)
    }

    async fn rates(&self, request: &RateRequest) -> Result<RatesResponse, ShippingProviderError> {
        tracing::debug!(
            couriers = %request.couriers,
            origin_area_id = ?request.origin_area_id,
            destination_area_id = ?request.destination_area_id,
            items = request.items.len(),
            "requesting courier rates"
        );

        let response = self
            .http
            .post(self.url("/v1/rates/couriers"))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        Self::read(response).await
    }

    async fn create_order(
        &self,
        request: &ShipmentRequest,
    ) -> Result<ProviderOrder, ShippingProviderError> {
        let response = self
            .http
            .post(self.url("/v1/orders"))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        Self::read(response).await
    }

    async fn get_order(&self, id: &str) -> Result<ProviderOrder, ShippingProviderError> {
        let response = self
            .http
            .get(self.url(&format!("/v1/orders/{id}")))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        Self::read(response).await
    }
}

/// Pull a readable message out of an aggregator error body. The `error`
/// field is either a string or an object carrying `message`.
fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return FALLBACK_ERROR_MESSAGE.to_string();
    };

    match value.get("error") {
        Some(Value::String(message)) => message.clone(),
        Some(Value::Object(error)) => error
            .get("message")
            .and_then(Value::as_str)
            .map_or_else(|| Value::Object(error.clone()).to_string(), str::to_string),
        _ => FALLBACK_ERROR_MESSAGE.to_string(),
    }
}
