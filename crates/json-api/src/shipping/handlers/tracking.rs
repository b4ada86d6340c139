//! Shipment Tracking Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use bazaar_app::domain::shipping::data::Tracking;

use crate::{extensions::*, shipping::errors::into_status_error, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct TrackingResponse {
    pub order_id: Uuid,

    /// Provider delivery state, or the stored state when the provider is
    /// unavailable
    pub status: String,

    pub waybill_id: Option<String>,

    pub tracking_url: Option<String>,

    pub courier_company: Option<String>,

    pub courier_type: Option<String>,

    pub driver_name: Option<String>,

    pub driver_phone: Option<String>,

    /// Provider history entries, passed through unchanged
    #[salvo(schema(value_type = Vec<Object>))]
    pub history: Vec<Value>,
}

impl From<Tracking> for TrackingResponse {
    fn from(tracking: Tracking) -> Self {
        TrackingResponse {
            order_id: tracking.order_uuid.into(),
            status: tracking.status,
            waybill_id: tracking.waybill_id,
            tracking_url: tracking.tracking_url,
            courier_company: tracking.courier_company,
            courier_type: tracking.courier_type,
            driver_name: tracking.driver_name,
            driver_phone: tracking.driver_phone,
            history: tracking.history,
        }
    }
}

/// Shipment Tracking Handler
#[endpoint(
    tags("shipping"),
    summary = "Track Shipment",
    responses(
        (status_code = StatusCode::OK, description = "Delivery state"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Not signed in"),
        (status_code = StatusCode::FORBIDDEN, description = "Order belongs to another account"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
    ),
)]
#[tracing::instrument(
    name = "shipping.track",
    skip_all,
    fields(order_uuid = %*order),
    err
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<TrackingResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let viewer = depot.account_or_401()?;

    let tracking = state
        .app
        .shipping
        .track(viewer, order.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(tracking.into()))
}
