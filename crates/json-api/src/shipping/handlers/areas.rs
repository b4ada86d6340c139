//! Area Search Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use bazaar_app::domain::shipping::provider::Area;

use crate::{extensions::*, shipping::errors::into_status_error, state::State};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct AreaResponse {
    /// Provider area identifier used for rate quotes
    pub id: String,

    pub name: Option<String>,

    pub country_name: Option<String>,

    pub country_code: Option<String>,

    pub administrative_division_level_1_name: Option<String>,

    pub administrative_division_level_2_name: Option<String>,

    pub administrative_division_level_3_name: Option<String>,

    pub postal_code: Option<u32>,
}

impl From<Area> for AreaResponse {
    fn from(area: Area) -> Self {
        AreaResponse {
            id: area.id,
            name: area.name,
            country_name: area.country_name,
            country_code: area.country_code,
            administrative_division_level_1_name: area.administrative_division_level_1_name,
            administrative_division_level_2_name: area.administrative_division_level_2_name,
            administrative_division_level_3_name: area.administrative_division_level_3_name,
            postal_code: area.postal_code,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AreasResponse {
    pub areas: Vec<AreaResponse>,
}

/// Area Search Handler
#[endpoint(tags("shipping"), summary = "Search Destination Areas")]
pub(crate) async fn handler(
    input: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<AreasResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let input = input.into_inner().unwrap_or_default();

    let areas = state
        .app
        .shipping
        .search_areas(input.trim())
        .await
        .map_err(into_status_error)?;

    Ok(Json(AreasResponse {
        areas: areas.into_iter().map(Into::into).collect(),
    }))
}
