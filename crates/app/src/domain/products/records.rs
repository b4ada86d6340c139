//! Product Records

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Default parcel weight in grams.
pub const DEFAULT_WEIGHT: i32 = 500;

/// Default parcel edge length in centimetres.
pub const DEFAULT_DIMENSION: i32 = 10;

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Product Image UUID
pub type ProductImageUuid = TypedUuid<ProductImageRecord>;

/// Product Variant UUID
pub type ProductVariantUuid = TypedUuid<ProductVariantRecord>;

/// Product Record
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub uuid: ProductUuid,
    pub name: String,
    pub slug: String,
    pub price: u64,
    pub original_price: Option<u64>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub sold_count: i32,
    pub stock: i32,
    pub rating: f64,
    pub weight: i32,
    pub length: i32,
    pub width: i32,
    pub height: i32,
    pub primary_image: Option<String>,
    pub video_url: Option<String>,
    pub images: Vec<ProductImageRecord>,
    pub variants: Vec<ProductVariantRecord>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ProductRecord {
    /// Find a variant by its display name.
    #[must_use]
    pub fn variant(&self, name: &str) -> Option<&ProductVariantRecord> {
        self.variants.iter().find(|v| v.variant_name == name)
    }

    /// Unit price for an optional variant selection.
    ///
    /// Unknown variant names fall back to the base price.
    #[must_use]
    pub fn unit_price(&self, variant: Option<&str>) -> u64 {
        variant
            .and_then(|name| self.variant(name))
            .map_or(self.price, |v| v.unit_price(self.price))
    }
}

/// Product Image Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductImageRecord {
    pub uuid: ProductImageUuid,
    pub product_uuid: ProductUuid,
    pub image_url: String,
    pub display_order: i32,
}

/// Product Variant Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductVariantRecord {
    pub uuid: ProductVariantUuid,
    pub product_uuid: ProductUuid,
    pub variant_type: Option<String>,
    pub variant_name: String,
    pub price: Option<u64>,
    pub price_modifier: i64,
    pub stock: i32,
    pub is_available: bool,
}

impl ProductVariantRecord {
    /// Absolute variant price, else base adjusted by the modifier, else base.
    #[must_use]
    pub fn unit_price(&self, base: u64) -> u64 {
        match (self.price, self.price_modifier) {
            (Some(price), _) => price,
            (None, 0) => base,
            (None, modifier) => base.saturating_add_signed(modifier),
        }
    }
}
