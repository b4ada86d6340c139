//! Delete Product Image Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{extensions::*, products::errors::into_status_error, state::State};

/// Delete Product Image Handler
#[endpoint(
    tags("products"),
    summary = "Delete Product Image",
    responses(
        (status_code = StatusCode::OK, description = "Image deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "Product or image not found"),
        (status_code = StatusCode::FORBIDDEN, description = "Seller access required"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "products.delete_image",
    skip_all,
    fields(product_slug = %slug.as_str(), image_uuid = %*image),
    err
)]
pub(crate) async fn handler(
    slug: PathParam<String>,
    image: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.seller_or_403()?;

    state
        .app
        .products
        .delete_image(&slug.into_inner(), image.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::OK)
}
