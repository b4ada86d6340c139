//! Cart Records

use jiff::Timestamp;

use crate::{
    domain::{accounts::records::AccountUuid, products::records::ProductUuid},
    uuids::TypedUuid,
};

/// Cart Line UUID
pub type CartLineUuid = TypedUuid<CartLineRecord>;

/// Product details shown alongside a cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartProductSummary {
    pub name: String,
    pub slug: String,
    pub price: u64,
    pub primary_image: Option<String>,
    pub stock: i32,
    pub weight: i32,
    pub length: i32,
    pub width: i32,
    pub height: i32,
}

/// Cart Line Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineRecord {
    pub uuid: CartLineUuid,
    pub account_uuid: AccountUuid,
    pub product_uuid: ProductUuid,
    pub variant_name: Option<String>,
    pub unit_price: Option<u64>,
    pub quantity: i32,
    pub product: CartProductSummary,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CartLineRecord {
    /// Snapshotted unit price, else the product's current price.
    #[must_use]
    pub fn effective_unit_price(&self) -> u64 {
        self.unit_price.unwrap_or(self.product.price)
    }

    #[must_use]
    pub fn line_total(&self) -> u64 {
        let quantity = u64::try_from(self.quantity).unwrap_or_default();

        self.effective_unit_price().saturating_mul(quantity)
    }
}

/// All of an account's cart lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    pub lines: Vec<CartLineRecord>,
}

impl Cart {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn subtotal(&self) -> u64 {
        self.lines
            .iter()
            .map(CartLineRecord::line_total)
            .fold(0, u64::saturating_add)
    }
}
