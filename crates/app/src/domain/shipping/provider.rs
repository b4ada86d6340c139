//! Shipping aggregator seam and its wire types.

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors raised while talking to the shipping aggregator.
#[derive(Debug, Error)]
pub enum ShippingProviderError {
    /// Transport, timeout or body decoding failure.
    #[error("shipping provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The aggregator answered with a non-success status.
    #[error("shipping provider returned {status}: {message}")]
    Status { status: u16, message: String },
}

impl ShippingProviderError {
    /// Upstream HTTP status, when the aggregator produced one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http(error) => error.status().map(|s| s.as_u16()),
            Self::Status { status, .. } => Some(*status),
        }
    }
}

/// Administrative area returned by the area search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub country_name: Option<String>,

    #[serde(default)]
    pub country_code: Option<String>,

    #[serde(default)]
    pub administrative_division_level_1_name: Option<String>,

    #[serde(default)]
    pub administrative_division_level_2_name: Option<String>,

    #[serde(default)]
    pub administrative_division_level_3_name: Option<String>,

    #[serde(default)]
    pub postal_code: Option<u32>,
}

/// One parcel line in a rate or booking request. Weight in grams,
/// dimensions in centimetres.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parcel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub value: u64,
    pub quantity: u32,
    pub weight: u32,
    pub length: u32,
    pub width: u32,
    pub height: u32,
}

/// Rate request for `/v1/rates/couriers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateRequest {
    pub couriers: String,
    pub items: Vec<Parcel>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_area_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_postal_code: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_area_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_postal_code: Option<u32>,
}

/// Raw rate entry. The aggregator either lists services flat or nests them
/// under a courier entry's `rates`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawRate {
    #[serde(default)]
    pub company: Option<String>,

    #[serde(default)]
    pub courier_company: Option<String>,

    #[serde(default, rename = "type")]
    pub kind: Option<String>,

    #[serde(default)]
    pub courier_service_code: Option<String>,

    #[serde(default)]
    pub courier_name: Option<String>,

    #[serde(default)]
    pub courier_service_name: Option<String>,

    #[serde(default)]
    pub service_name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub price: Option<u64>,

    #[serde(default)]
    pub available: Option<bool>,

    #[serde(default)]
    pub shipment_duration_range: Option<String>,

    #[serde(default)]
    pub shipment_duration_unit: Option<String>,

    #[serde(default)]
    pub rates: Option<Vec<RawRate>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RatesResponse {
    #[serde(default)]
    pub pricing: Vec<RawRate>,
}

/// Booking request for `/v1/orders`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShipmentRequest {
    pub shipper_contact_name: String,
    pub shipper_contact_phone: String,
    pub shipper_contact_email: String,
    pub shipper_organization: String,
    pub origin_contact_name: String,
    pub origin_contact_phone: String,
    pub origin_address: String,
    pub origin_postal_code: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_area_id: Option<String>,

    pub destination_contact_name: String,
    pub destination_contact_phone: String,
    pub destination_address: String,
    pub destination_postal_code: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_area_id: Option<String>,

    pub courier_company: String,
    pub courier_type: String,
    pub delivery_type: String,
    pub order_note: String,
    pub metadata: Map<String, Value>,
    pub items: Vec<Parcel>,
}

/// Courier block of a booked shipment.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProviderCourier {
    #[serde(default)]
    pub waybill_id: Option<String>,

    #[serde(default)]
    pub link: Option<String>,

    #[serde(default)]
    pub driver_name: Option<String>,

    #[serde(default)]
    pub driver_phone: Option<String>,

    #[serde(default)]
    pub history: Vec<Value>,
}

/// A booked shipment as reported by the aggregator.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProviderOrder {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub courier: ProviderCourier,
}

/// Shipping aggregator operations.
#[automock]
#[async_trait]
pub trait ShippingProvider: Send + Sync {
    /// Search administrative areas by free text.
    async fn search_areas(&self, input: &str) -> Result<Vec<Area>, ShippingProviderError>;

    /// Quote courier rates for a parcel set.
    async fn rates(&self, request: &RateRequest) -> Result<RatesResponse, ShippingProviderError>;

    /// Book a shipment. Not retried.
    async fn create_order(
        &self,
        request: &ShipmentRequest,
    ) -> Result<ProviderOrder, ShippingProviderError>;

    /// Fetch the current state of a booked shipment.
    async fn get_order(&self, id: &str) -> Result<ProviderOrder, ShippingProviderError>;
}
