//! Product Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use bazaar_app::domain::products::data::ProductFilter;

use crate::{
    extensions::*, products::errors::into_status_error, products::get::ProductResponse,
    settings::get::SettingsResponse, state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductsResponse {
    /// The list of products, newest first
    pub products: Vec<ProductResponse>,

    /// Store branding shown alongside the catalog
    pub seller: SettingsResponse,
}

/// Product Index Handler
///
/// Returns the catalog, optionally filtered by category or a name search.
#[endpoint(tags("products"), summary = "List Products")]
pub(crate) async fn handler(
    category: QueryParam<String, false>,
    search: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<ProductsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let filter = ProductFilter {
        category: category.into_inner().filter(|value| !value.is_empty()),
        search: search.into_inner().filter(|value| !value.trim().is_empty()),
    };

    let products = state
        .app
        .products
        .list_products(filter)
        .await
        .map_err(into_status_error)?;

    let seller = state
        .app
        .settings
        .get_settings()
        .await
        .or_500("failed to fetch store settings")?;

    Ok(Json(ProductsResponse {
        products: products.into_iter().map(Into::into).collect(),
        seller: seller.into(),
    }))
}
