//! Get Shipping Origin Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use bazaar_app::domain::settings::records::ShippingOrigin;

use crate::{extensions::*, settings::errors::into_status_error, state::State};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct OriginResponse {
    /// Empty until the seller configures an origin
    pub area_id: String,

    pub postal_code: String,
}

impl From<ShippingOrigin> for OriginResponse {
    fn from(origin: ShippingOrigin) -> Self {
        OriginResponse {
            area_id: origin.area_id,
            postal_code: origin.postal_code,
        }
    }
}

/// Get Shipping Origin Handler
#[endpoint(tags("shipping"), summary = "Get Shipping Origin")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<OriginResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let origin = state
        .app
        .settings
        .get_origin()
        .await
        .map_err(into_status_error)?;

    Ok(Json(origin.into()))
}
