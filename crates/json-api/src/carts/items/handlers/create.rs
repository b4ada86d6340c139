//! Create Cart Item Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use bazaar_app::domain::carts::data::NewCartLine;

use crate::{
    carts::{errors::into_status_error, get::CartLineResponse},
    extensions::*,
    state::State,
};

/// Create Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateCartItemRequest {
    pub product_slug: String,

    pub variant_name: Option<String>,

    #[serde(default = "one")]
    pub quantity: i32,
}

const fn one() -> i32 {
    1
}

impl From<CreateCartItemRequest> for NewCartLine {
    fn from(request: CreateCartItemRequest) -> Self {
        NewCartLine {
            product_slug: request.product_slug,
            variant_name: request.variant_name.filter(|name| !name.is_empty()),
            quantity: request.quantity,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemEnvelope {
    pub item: Option<CartLineResponse>,
}

/// Create Cart Item Handler
///
/// Adding a product and variant already in the cart increases that line's
/// quantity.
#[endpoint(
    tags("cart"),
    summary = "Add Item to Cart",
    responses(
        (status_code = StatusCode::OK, description = "Cart line created or merged"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Not signed in"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "carts.add_item", skip_all, err)]
pub(crate) async fn handler(
    json: JsonBody<CreateCartItemRequest>,
    depot: &mut Depot,
) -> Result<Json<CartItemEnvelope>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let account = depot.account_or_401()?.uuid;

    let line = state
        .app
        .carts
        .add_line(account, json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(CartItemEnvelope {
        item: Some(line.into()),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use bazaar_app::domain::carts::CartsServiceError;

    use crate::{
        carts::get::tests::make_line,
        test_helpers::{Mocks, buyer, service_as},
    };

    use super::*;

    #[tokio::test]
    async fn test_add_item_defaults_quantity_to_one() -> TestResult {
        let account = buyer();
        let account_uuid = account.uuid;

        let mut mocks = Mocks::default();

        mocks
            .carts
            .expect_add_line()
            .once()
            .withf(move |uuid, line| {
                *uuid == account_uuid
                    && *line
                        == NewCartLine {
                            product_slug: "kaos-polos-a1b2c3".to_string(),
                            variant_name: Some("XL".to_string()),
                            quantity: 1,
                        }
            })
            .return_once(move |_, _| Ok(make_line(account_uuid, Some(55_000), 1)));

        let service = service_as(mocks, Some(account), Router::with_path("cart/items").post(handler));

        let mut res = TestClient::post("http://example.com/cart/items")
            .json(&json!({ "product_slug": "kaos-polos-a1b2c3", "variant_name": "XL" }))
            .send(&service)
            .await;

        let body: CartItemEnvelope = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.item.map(|item| item.unit_price), Some(55_000));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_product_returns_404() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .carts
            .expect_add_line()
            .once()
            .return_once(|_, _| Err(CartsServiceError::ProductNotFound));

        let service = service_as(mocks, Some(buyer()), Router::with_path("cart/items").post(handler));

        let res = TestClient::post("http://example.com/cart/items")
            .json(&json!({ "product_slug": "missing", "quantity": 2 }))
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_non_positive_quantity_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .carts
            .expect_add_line()
            .once()
            .withf(|_, line| line.quantity == 0)
            .return_once(|_, _| Err(CartsServiceError::InvalidData));

        let service = service_as(mocks, Some(buyer()), Router::with_path("cart/items").post(handler));

        let res = TestClient::post("http://example.com/cart/items")
            .json(&json!({ "product_slug": "kaos-polos-a1b2c3", "quantity": 0 }))
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
