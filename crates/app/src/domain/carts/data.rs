//! Cart Data

/// New Cart Line Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCartLine {
    pub product_slug: String,
    pub variant_name: Option<String>,
    pub quantity: i32,
}
