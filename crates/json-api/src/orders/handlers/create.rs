//! Create Order Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use bazaar_app::domain::orders::data::NewOrder;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, get::OrderEnvelope},
    state::State,
};

/// Create Order Request
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateOrderRequest {
    pub shipping_address: Option<String>,

    pub destination_area_id: Option<String>,

    pub destination_postal_code: Option<String>,

    /// Defaults to the account name
    pub destination_contact_name: Option<String>,

    /// Defaults to the account phone
    pub destination_contact_phone: Option<String>,

    pub courier_company: Option<String>,

    pub courier_type: Option<String>,

    pub courier_service_name: Option<String>,

    /// Client-side estimate; replaced by a fresh quote when one is available
    #[serde(default)]
    pub shipping_cost: u64,

    pub shipping_etd: Option<String>,
}

impl From<CreateOrderRequest> for NewOrder {
    fn from(request: CreateOrderRequest) -> Self {
        NewOrder {
            shipping_address: request.shipping_address,
            destination_area_id: request.destination_area_id,
            destination_postal_code: request.destination_postal_code,
            destination_contact_name: request.destination_contact_name,
            destination_contact_phone: request.destination_contact_phone,
            courier_company: request.courier_company,
            courier_type: request.courier_type,
            courier_service_name: request.courier_service_name,
            shipping_cost: request.shipping_cost,
            shipping_etd: request.shipping_etd,
        }
    }
}

/// Create Order Handler
///
/// Checks out the caller's cart.
#[endpoint(
    tags("orders"),
    summary = "Create Order",
    responses(
        (status_code = StatusCode::CREATED, description = "Order created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Cart is empty"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Not signed in"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "orders.create",
    skip_all,
    fields(order_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CreateOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderEnvelope>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let account = depot.account_or_401()?;

    let order = state
        .app
        .orders
        .create_order(account, json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    tracing::Span::current().record("order_uuid", tracing::field::display(order.uuid));

    res.add_header(LOCATION, format!("/api/v1/orders/{}", order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(order.into()))
}
