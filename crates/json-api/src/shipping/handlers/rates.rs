//! Rate Quote Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use bazaar_app::domain::shipping::{
    data::{ParcelInput, RateQuery},
    rates::RateQuote,
};

use crate::{extensions::*, shipping::errors::into_status_error, state::State};

/// Parcel line; missing measurements default to 10 cm and 500 g.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct ParcelRequest {
    pub name: Option<String>,

    pub value: Option<u64>,

    pub quantity: Option<u32>,

    /// Grams
    pub weight: Option<u32>,

    /// Centimetres
    pub length: Option<u32>,

    pub width: Option<u32>,

    pub height: Option<u32>,
}

impl From<ParcelRequest> for ParcelInput {
    fn from(request: ParcelRequest) -> Self {
        ParcelInput {
            name: request.name,
            value: request.value,
            quantity: request.quantity,
            weight: request.weight,
            length: request.length,
            width: request.width,
            height: request.height,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct RatesRequest {
    pub destination_area_id: Option<String>,

    pub destination_postal_code: Option<String>,

    #[serde(default)]
    pub items: Vec<ParcelRequest>,

    /// Comma separated courier codes
    pub couriers: Option<String>,

    pub origin_area_id: Option<String>,

    pub origin_postal_code: Option<String>,
}

impl From<RatesRequest> for RateQuery {
    fn from(request: RatesRequest) -> Self {
        RateQuery {
            destination_area_id: request.destination_area_id.filter(|id| !id.is_empty()),
            destination_postal_code: request.destination_postal_code,
            items: request.items.into_iter().map(Into::into).collect(),
            couriers: request.couriers.filter(|couriers| !couriers.is_empty()),
            origin_area_id: request.origin_area_id.filter(|id| !id.is_empty()),
            origin_postal_code: request.origin_postal_code.filter(|code| !code.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct RateResponse {
    pub courier_company: String,

    pub courier_type: String,

    pub courier_name: String,

    pub service_name: String,

    pub description: String,

    pub price: u64,

    /// Delivery duration range, e.g. "2 - 3"
    pub etd: String,

    pub etd_unit: String,
}

impl From<RateQuote> for RateResponse {
    fn from(quote: RateQuote) -> Self {
        RateResponse {
            courier_company: quote.courier_company,
            courier_type: quote.courier_type,
            courier_name: quote.courier_name,
            service_name: quote.service_name,
            description: quote.description,
            price: quote.price,
            etd: quote.etd,
            etd_unit: quote.etd_unit,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RatesResponse {
    /// Cheapest first
    pub rates: Vec<RateResponse>,
}

/// Rate Quote Handler
#[endpoint(
    tags("shipping"),
    summary = "Quote Shipping Rates",
    responses(
        (status_code = StatusCode::OK, description = "Available rates"),
        (status_code = StatusCode::BAD_REQUEST, description = "Destination area is required"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Shipping provider failure"),
    ),
)]
#[tracing::instrument(name = "shipping.rates", skip_all, err)]
pub(crate) async fn handler(
    json: JsonBody<RatesRequest>,
    depot: &mut Depot,
) -> Result<Json<RatesResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let rates = state
        .app
        .shipping
        .quote_rates(json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(RatesResponse {
        rates: rates.into_iter().map(Into::into).collect(),
    }))
}
