//! Shipping Availability Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{extensions::*, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AvailabilityResponse {
    /// Whether a shipping provider is configured
    pub available: bool,
}

/// Shipping Availability Handler
#[endpoint(tags("shipping"), summary = "Shipping Availability")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<AvailabilityResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    Ok(Json(AvailabilityResponse {
        available: state.app.shipping.availability(),
    }))
}
