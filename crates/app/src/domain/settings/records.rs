//! Store Settings Records

use jiff::Timestamp;
use serde_json::{Map, Value};

/// Seller storefront configuration. A single row; defaults apply until the
/// seller saves it for the first time.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSettings {
    pub username: String,
    pub seller_name: String,
    pub profile_picture: String,
    pub brand_colors: Map<String, Value>,
    pub origin_area_id: String,
    pub origin_postal_code: String,
    pub updated_at: Option<Timestamp>,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            username: "seller".to_string(),
            seller_name: "Store".to_string(),
            profile_picture: String::new(),
            brand_colors: Map::new(),
            origin_area_id: String::new(),
            origin_postal_code: String::new(),
            updated_at: None,
        }
    }
}

/// Where parcels ship from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShippingOrigin {
    pub area_id: String,
    pub postal_code: String,
}

impl From<&StoreSettings> for ShippingOrigin {
    fn from(settings: &StoreSettings) -> Self {
        Self {
            area_id: settings.origin_area_id.clone(),
            postal_code: settings.origin_postal_code.clone(),
        }
    }
}
