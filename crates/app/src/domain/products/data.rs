//! Products Data

/// New Product Data
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub price: u64,
    pub original_price: Option<u64>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub sold_count: i32,
    pub stock: i32,
    pub rating: f64,
    pub weight: Option<i32>,
    pub length: Option<i32>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub primary_image: Option<String>,
    pub video_url: Option<String>,
    pub images: Vec<NewProductImage>,
    pub variants: Vec<NewProductVariant>,
}

/// New Product Image Data
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewProductImage {
    pub image_url: String,
    pub display_order: i32,
}

/// New Product Variant Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProductVariant {
    pub variant_type: Option<String>,
    pub variant_name: String,
    pub price: Option<u64>,
    pub price_modifier: i64,
    pub stock: i32,
    pub is_available: bool,
}

impl Default for NewProductVariant {
    fn default() -> Self {
        Self {
            variant_type: None,
            variant_name: String::new(),
            price: None,
            price_modifier: 0,
            stock: 0,
            is_available: true,
        }
    }
}

/// Product Update Data
///
/// `None` leaves a field untouched. `variants`, when present, replaces the
/// whole variant set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub price: Option<u64>,
    pub original_price: Option<u64>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub sold_count: Option<i32>,
    pub stock: Option<i32>,
    pub rating: Option<f64>,
    pub weight: Option<i32>,
    pub length: Option<i32>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub primary_image: Option<String>,
    pub video_url: Option<String>,
    pub variants: Option<Vec<NewProductVariant>>,
}

/// Product listing filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Exact category match.
    pub category: Option<String>,

    /// Case-insensitive name substring.
    pub search: Option<String>,
}
