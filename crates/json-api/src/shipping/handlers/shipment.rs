//! Create Shipment Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*, orders::get::OrderEnvelope, shipping::errors::into_status_error, state::State,
};

/// Create Shipment Handler
///
/// Books the courier pickup for a paid order and marks it shipped.
#[endpoint(
    tags("shipping"),
    summary = "Create Shipment",
    responses(
        (status_code = StatusCode::OK, description = "Shipment booked"),
        (status_code = StatusCode::BAD_REQUEST, description = "Order has not been paid"),
        (status_code = StatusCode::FORBIDDEN, description = "Seller access required"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::CONFLICT, description = "Shipment already created"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Shipping provider failure"),
    ),
)]
#[tracing::instrument(
    name = "shipping.create_shipment",
    skip_all,
    fields(order_uuid = %*order),
    err
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderEnvelope>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let seller = depot.seller_or_403()?;

    let order = state
        .app
        .shipping
        .create_shipment(seller, order.into_inner().into())
        .await
        .map_err(into_status_error)?;

    tracing::info!(waybill_id = ?order.waybill_id, "booked shipment");

    Ok(Json(order.into()))
}
