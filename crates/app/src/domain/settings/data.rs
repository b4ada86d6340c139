//! Store Settings Data

use serde_json::{Map, Value};

/// Partial settings update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsUpdate {
    pub username: Option<String>,
    pub seller_name: Option<String>,
    pub profile_picture: Option<String>,
    pub brand_colors: Option<Map<String, Value>>,
}
