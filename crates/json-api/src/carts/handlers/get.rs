//! Get Cart Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar_app::domain::carts::records::{Cart, CartLineRecord, CartProductSummary};

use crate::{carts::errors::into_status_error, extensions::*, state::State};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartProductResponse {
    pub name: String,

    /// Current catalog price, or the line's snapshot when one was taken
    pub price: u64,

    pub primary_image: Option<String>,

    pub stock: i32,

    pub weight: i32,

    pub length: i32,

    pub width: i32,

    pub height: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartLineResponse {
    pub uuid: Uuid,

    pub product_slug: String,

    pub variant_name: Option<String>,

    pub quantity: i32,

    /// Price charged per unit
    pub unit_price: u64,

    pub product: CartProductResponse,
}

impl From<CartLineRecord> for CartLineResponse {
    fn from(line: CartLineRecord) -> Self {
        let unit_price = line.effective_unit_price();

        let CartProductSummary {
            name,
            slug,
            primary_image,
            stock,
            weight,
            length,
            width,
            height,
            ..
        } = line.product;

        CartLineResponse {
            uuid: line.uuid.into(),
            product_slug: slug,
            variant_name: line.variant_name,
            quantity: line.quantity,
            unit_price,
            product: CartProductResponse {
                name,
                price: unit_price,
                primary_image,
                stock,
                weight,
                length,
                width,
                height,
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    pub items: Vec<CartLineResponse>,

    /// Sum of unit price times quantity over every line
    pub subtotal: u64,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        let subtotal = cart.subtotal();

        CartResponse {
            items: cart.lines.into_iter().map(Into::into).collect(),
            subtotal,
        }
    }
}

/// Get Cart Handler
#[endpoint(
    tags("cart"),
    summary = "Get Cart",
    responses(
        (status_code = StatusCode::OK, description = "Cart lines"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Not signed in"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let account = depot.account_or_401()?.uuid;

    let cart = state
        .app
        .carts
        .get_cart(account)
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}
