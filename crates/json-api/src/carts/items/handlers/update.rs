//! Update Cart Item Handler

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

use crate::{
    carts::{errors::into_status_error, items::create::CartItemEnvelope},
    extensions::*,
    state::State,
};

/// Update Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateCartItemRequest {
    /// Zero or less removes the line
    pub quantity: i32,
}

/// Update Cart Item Handler
#[endpoint(
    tags("cart"),
    summary = "Update Cart Item Quantity",
    responses(
        (status_code = StatusCode::OK, description = "Line updated, or null when removed"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart item not found"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Not signed in"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "carts.update_item",
    skip_all,
    fields(cart_line_uuid = %*line),
    err
)]
pub(crate) async fn handler(
    line: PathParam<Uuid>,
    json: JsonBody<UpdateCartItemRequest>,
    depot: &mut Depot,
) -> Result<Json<CartItemEnvelope>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let account = depot.account_or_401()?.uuid;

    let line = state
        .app
        .carts
        .update_quantity(account, line.into_inner().into(), json.into_inner().quantity)
        .await
        .map_err(into_status_error)?;

    Ok(Json(CartItemEnvelope {
        item: line.map(Into::into),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use bazaar_app::domain::carts::{CartsServiceError, records::CartLineUuid};

    use crate::{
        carts::get::tests::make_line,
        test_helpers::{Mocks, buyer, service_as},
    };

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        service_as(
            mocks,
            Some(buyer()),
            Router::with_path("cart/items/{line}").put(handler),
        )
    }

    #[tokio::test]
    async fn test_update_quantity_returns_line() -> TestResult {
        let line = CartLineUuid::new();

        let mut mocks = Mocks::default();

        mocks
            .carts
            .expect_update_quantity()
            .once()
            .withf(move |_, uuid, quantity| *uuid == line && *quantity == 3)
            .return_once(|account, _, _| Ok(Some(make_line(account, None, 3))));

        let mut res = TestClient::put(format!("http://example.com/cart/items/{line}"))
            .json(&json!({ "quantity": 3 }))
            .send(&make_service(mocks))
            .await;

        let body: CartItemEnvelope = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.item.map(|item| item.quantity), Some(3));

        Ok(())
    }

    #[tokio::test]
    async fn test_zero_quantity_removes_line() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .carts
            .expect_update_quantity()
            .once()
            .withf(|_, _, quantity| *quantity == 0)
            .return_once(|_, _, _| Ok(None));

        let mut res = TestClient::put(format!("http://example.com/cart/items/{}", Uuid::now_v7()))
            .json(&json!({ "quantity": 0 }))
            .send(&make_service(mocks))
            .await;

        let body: CartItemEnvelope = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(body.item.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_line_returns_404() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .carts
            .expect_update_quantity()
            .once()
            .return_once(|_, _, _| Err(CartsServiceError::NotFound));

        let res = TestClient::put(format!("http://example.com/cart/items/{}", Uuid::now_v7()))
            .json(&json!({ "quantity": 2 }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
