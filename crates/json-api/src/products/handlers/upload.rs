//! Upload Image Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    extensions::*,
    state::State,
    uploads::{StoredUpload, store_upload},
};

/// Upload Image Handler
///
/// Stores an image without attaching it to a product; the returned URL can be
/// used in product create and update requests.
#[endpoint(
    tags("products"),
    summary = "Upload Image",
    responses(
        (status_code = StatusCode::OK, description = "Image stored"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing image file"),
        (status_code = StatusCode::FORBIDDEN, description = "Seller access required"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "products.upload_image", skip_all, err)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<StoredUpload>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.seller_or_403()?;

    Ok(Json(store_upload(req, &state.upload_dir).await?))
}
