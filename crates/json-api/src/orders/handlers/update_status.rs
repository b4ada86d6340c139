//! Update Order Status Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar_app::domain::orders::records::OrderStatus;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, get::OrderEnvelope},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateStatusRequest {
    pub status: String,
}

/// Update Order Status Handler
#[endpoint(
    tags("orders"),
    summary = "Update Order Status",
    responses(
        (status_code = StatusCode::OK, description = "Status updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown status"),
        (status_code = StatusCode::FORBIDDEN, description = "Seller access required"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "orders.update_status",
    skip_all,
    fields(order_uuid = %*order),
    err
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<UpdateStatusRequest>,
    depot: &mut Depot,
) -> Result<Json<OrderEnvelope>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.seller_or_403()?;

    let status = json
        .into_inner()
        .status
        .parse::<OrderStatus>()
        .or_400("Invalid order status")?;

    let order = state
        .app
        .orders
        .update_status(order.into_inner().into(), status)
        .await
        .map_err(into_status_error)?;

    tracing::info!(status = %order.status, "updated order status");

    Ok(Json(order.into()))
}
