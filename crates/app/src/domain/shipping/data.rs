//! Shipping Data

use serde_json::Value;

use crate::domain::orders::records::OrderUuid;

/// Parcel line as supplied by a client; missing measurements get defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParcelInput {
    pub name: Option<String>,
    pub value: Option<u64>,
    pub quantity: Option<u32>,
    pub weight: Option<u32>,
    pub length: Option<u32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Rate quotation input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateQuery {
    pub destination_area_id: Option<String>,
    pub destination_postal_code: Option<String>,
    pub items: Vec<ParcelInput>,

    /// Comma separated courier codes; defaults to the common set.
    pub couriers: Option<String>,

    /// Overrides the stored store origin when present.
    pub origin_area_id: Option<String>,
    pub origin_postal_code: Option<String>,
}

/// Current delivery state of an order.
#[derive(Debug, Clone, PartialEq)]
pub struct Tracking {
    pub order_uuid: OrderUuid,
    pub status: String,
    pub waybill_id: Option<String>,
    pub tracking_url: Option<String>,
    pub courier_company: Option<String>,
    pub courier_type: Option<String>,
    pub driver_name: Option<String>,
    pub driver_phone: Option<String>,
    pub history: Vec<Value>,
}
