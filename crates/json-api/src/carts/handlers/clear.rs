//! Clear Cart Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{carts::errors::into_status_error, extensions::*, state::State};

/// Clear Cart Handler
#[endpoint(
    tags("cart"),
    summary = "Clear Cart",
    responses(
        (status_code = StatusCode::OK, description = "Cart cleared"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Not signed in"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "carts.clear", skip_all, err)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let account = depot.account_or_401()?.uuid;

    state
        .app
        .carts
        .clear_cart(account)
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::OK)
}
