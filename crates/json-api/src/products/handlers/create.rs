//! Create Product Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use bazaar_app::domain::products::data::{NewProduct, NewProductImage, NewProductVariant};

use crate::{
    extensions::*,
    products::{errors::into_status_error, get::ProductEnvelope},
    state::State,
};

/// Image reference; either a bare URL or an object with an order.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub(crate) enum ImageRequest {
    Url(String),
    Detailed {
        image_url: String,
        #[serde(default)]
        display_order: i32,
    },
}

impl From<ImageRequest> for NewProductImage {
    fn from(request: ImageRequest) -> Self {
        match request {
            ImageRequest::Url(image_url) => NewProductImage {
                image_url,
                display_order: 0,
            },
            ImageRequest::Detailed {
                image_url,
                display_order,
            } => NewProductImage {
                image_url,
                display_order,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct VariantRequest {
    pub variant_type: Option<String>,

    #[serde(default)]
    pub variant_name: String,

    pub price: Option<u64>,

    #[serde(default)]
    pub price_modifier: i64,

    #[serde(default)]
    pub stock: i32,

    #[serde(default = "available")]
    pub is_available: bool,
}

const fn available() -> bool {
    true
}

impl From<VariantRequest> for NewProductVariant {
    fn from(request: VariantRequest) -> Self {
        NewProductVariant {
            variant_type: request.variant_type,
            variant_name: request.variant_name,
            price: request.price,
            price_modifier: request.price_modifier,
            stock: request.stock,
            is_available: request.is_available,
        }
    }
}

/// Create Product Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateProductRequest {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub price: u64,

    pub original_price: Option<u64>,

    pub category: Option<String>,

    pub description: Option<String>,

    #[serde(default)]
    pub sold_count: i32,

    #[serde(default)]
    pub stock: i32,

    #[serde(default)]
    pub rating: f64,

    pub weight: Option<i32>,

    pub length: Option<i32>,

    pub width: Option<i32>,

    pub height: Option<i32>,

    pub primary_image: Option<String>,

    pub video_url: Option<String>,

    #[serde(default)]
    pub images: Vec<ImageRequest>,

    #[serde(default)]
    pub variants: Vec<VariantRequest>,
}

impl From<CreateProductRequest> for NewProduct {
    fn from(request: CreateProductRequest) -> Self {
        NewProduct {
            name: request.name,
            price: request.price,
            original_price: request.original_price,
            category: request.category,
            description: request.description,
            sold_count: request.sold_count,
            stock: request.stock,
            rating: request.rating,
            weight: request.weight,
            length: request.length,
            width: request.width,
            height: request.height,
            primary_image: request.primary_image,
            video_url: request.video_url,
            images: request.images.into_iter().map(Into::into).collect(),
            variants: request.variants.into_iter().map(Into::into).collect(),
        }
    }
}

/// Create Product Handler
#[endpoint(
    tags("products"),
    summary = "Create Product",
    responses(
        (status_code = StatusCode::CREATED, description = "Product created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Not signed in"),
        (status_code = StatusCode::FORBIDDEN, description = "Seller access required"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "products.create",
    skip_all,
    fields(product_slug = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CreateProductRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ProductEnvelope>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.seller_or_403()?;

    let product = state
        .app
        .products
        .create_product(json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    tracing::Span::current().record("product_slug", tracing::field::display(&product.slug));

    res.add_header(LOCATION, format!("/api/v1/products/{}", product.slug), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(product.into()))
}
