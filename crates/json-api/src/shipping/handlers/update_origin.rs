//! Update Shipping Origin Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use bazaar_app::domain::settings::records::ShippingOrigin;

use crate::{
    extensions::*, settings::errors::into_status_error, shipping::get_origin::OriginResponse,
    state::State,
};

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateOriginRequest {
    #[serde(default)]
    pub area_id: String,

    #[serde(default)]
    pub postal_code: String,
}

/// Update Shipping Origin Handler
#[endpoint(
    tags("shipping"),
    summary = "Update Shipping Origin",
    responses(
        (status_code = StatusCode::OK, description = "Origin saved"),
        (status_code = StatusCode::FORBIDDEN, description = "Seller access required"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "shipping.update_origin", skip_all, err)]
pub(crate) async fn handler(
    json: JsonBody<UpdateOriginRequest>,
    depot: &mut Depot,
) -> Result<Json<OriginResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.seller_or_403()?;

    let UpdateOriginRequest {
        area_id,
        postal_code,
    } = json.into_inner();

    let origin = state
        .app
        .settings
        .update_origin(ShippingOrigin {
            area_id: area_id.trim().to_string(),
            postal_code: postal_code.trim().to_string(),
        })
        .await
        .map_err(into_status_error)?;

    Ok(Json(origin.into()))
}
