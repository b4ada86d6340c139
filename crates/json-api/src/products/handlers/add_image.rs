//! Add Product Image Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    extensions::*,
    products::{errors::into_status_error, get::ProductImageResponse},
    state::State,
    uploads::store_upload,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ImageEnvelope {
    pub image: ProductImageResponse,
}

/// Add Product Image Handler
///
/// Stores the multipart `file` field and appends it to the product's images.
#[endpoint(
    tags("products"),
    summary = "Add Product Image",
    responses(
        (status_code = StatusCode::CREATED, description = "Image added"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing image file"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::FORBIDDEN, description = "Seller access required"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "products.add_image",
    skip_all,
    fields(product_slug = %slug.as_str()),
    err
)]
pub(crate) async fn handler(
    slug: PathParam<String>,
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ImageEnvelope>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.seller_or_403()?;

    let slug = slug.into_inner();

    // Avoid writing files for products that do not exist.
    state
        .app
        .products
        .get_product(&slug)
        .await
        .map_err(into_status_error)?;

    let upload = store_upload(req, &state.upload_dir).await?;

    let image = state
        .app
        .products
        .add_image(&slug, &upload.image_url)
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(ImageEnvelope {
        image: image.into(),
    }))
}
