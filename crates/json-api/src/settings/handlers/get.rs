//! Get Settings Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use bazaar_app::domain::settings::records::StoreSettings;

use crate::{extensions::*, settings::errors::into_status_error, state::State};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct SettingsResponse {
    pub username: String,

    /// Store display name
    pub seller_name: String,

    pub profile_picture: String,

    /// Free-form colour palette for the storefront
    #[salvo(schema(value_type = Object))]
    pub brand_colors: Map<String, Value>,

    pub origin_area_id: String,

    pub origin_postal_code: String,
}

impl From<StoreSettings> for SettingsResponse {
    fn from(settings: StoreSettings) -> Self {
        SettingsResponse {
            username: settings.username,
            seller_name: settings.seller_name,
            profile_picture: settings.profile_picture,
            brand_colors: settings.brand_colors,
            origin_area_id: settings.origin_area_id,
            origin_postal_code: settings.origin_postal_code,
        }
    }
}

/// Get Settings Handler
#[endpoint(tags("settings"), summary = "Get Store Settings")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<SettingsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let settings = state
        .app
        .settings
        .get_settings()
        .await
        .map_err(into_status_error)?;

    Ok(Json(settings.into()))
}
