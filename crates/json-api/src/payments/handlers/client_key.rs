//! Client Key Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use bazaar_app::domain::payments::data::ClientConfig;

use crate::{extensions::*, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ClientKeyResponse {
    /// Public key for the hosted payment widget; empty when unconfigured
    pub client_key: String,

    pub is_production: bool,
}

impl From<ClientConfig> for ClientKeyResponse {
    fn from(config: ClientConfig) -> Self {
        ClientKeyResponse {
            client_key: config.client_key,
            is_production: config.is_production,
        }
    }
}

/// Client Key Handler
#[endpoint(tags("payments"), summary = "Get Payment Client Key")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<ClientKeyResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    Ok(Json(state.app.payments.client_config().into()))
}
