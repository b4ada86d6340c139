//! Payment Token Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar_app::domain::payments::data::PaymentToken;

use crate::{extensions::*, payments::errors::into_status_error, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct TokenRequest {
    pub order_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct TokenResponse {
    /// Hosted payment page token
    pub token: String,

    pub redirect_url: Option<String>,

    /// Transaction id the gateway accepted
    pub order_id: String,
}

impl From<PaymentToken> for TokenResponse {
    fn from(token: PaymentToken) -> Self {
        TokenResponse {
            token: token.token,
            redirect_url: token.redirect_url,
            order_id: token.gateway_order_id,
        }
    }
}

/// Payment Token Handler
#[endpoint(
    tags("payments"),
    summary = "Issue Payment Token",
    responses(
        (status_code = StatusCode::OK, description = "Token issued"),
        (status_code = StatusCode::BAD_REQUEST, description = "Payment gateway is not configured"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Not signed in"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Payment gateway failure"),
    ),
)]
#[tracing::instrument(
    name = "payments.issue_token",
    skip_all,
    fields(order_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<TokenRequest>,
    depot: &mut Depot,
) -> Result<Json<TokenResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let account = depot.account_or_401()?;

    let order = json.into_inner().order_id;

    tracing::Span::current().record("order_uuid", tracing::field::display(order));

    let token = state
        .app
        .payments
        .issue_token(account, order.into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(token.into()))
}
