//! Payment Status Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar_app::domain::payments::data::PaymentStatus;

use crate::{extensions::*, payments::errors::into_status_error, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PaymentStatusResponse {
    pub order_id: Uuid,

    /// Order status after reconciliation
    pub status: String,

    /// Raw gateway state, absent when the stored status was returned
    pub transaction_status: Option<String>,
}

impl From<PaymentStatus> for PaymentStatusResponse {
    fn from(status: PaymentStatus) -> Self {
        PaymentStatusResponse {
            order_id: status.order_uuid.into(),
            status: status.status.to_string(),
            transaction_status: status.transaction_status,
        }
    }
}

/// Payment Status Handler
///
/// Polls the gateway and applies the transaction state to the order.
#[endpoint(
    tags("payments"),
    summary = "Check Payment Status",
    responses(
        (status_code = StatusCode::OK, description = "Current status"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Not signed in"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
    ),
)]
#[tracing::instrument(
    name = "payments.poll_status",
    skip_all,
    fields(order_uuid = %*order),
    err
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<PaymentStatusResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let account = depot.account_or_401()?;

    let status = state
        .app
        .payments
        .poll_status(account, order.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(status.into()))
}
