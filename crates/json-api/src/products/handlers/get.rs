//! Get Product Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar_app::domain::products::records::{
    ProductImageRecord, ProductRecord, ProductVariantRecord,
};

use crate::{extensions::*, products::errors::into_status_error, state::State};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductImageResponse {
    pub uuid: Uuid,

    pub image_url: String,

    pub display_order: i32,
}

impl From<ProductImageRecord> for ProductImageResponse {
    fn from(image: ProductImageRecord) -> Self {
        ProductImageResponse {
            uuid: image.uuid.into(),
            image_url: image.image_url,
            display_order: image.display_order,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductVariantResponse {
    pub uuid: Uuid,

    pub variant_type: Option<String>,

    pub variant_name: String,

    /// Absolute price overriding the product price
    pub price: Option<u64>,

    /// Signed adjustment to the product price
    pub price_modifier: i64,

    pub stock: i32,

    pub is_available: bool,
}

impl From<ProductVariantRecord> for ProductVariantResponse {
    fn from(variant: ProductVariantRecord) -> Self {
        ProductVariantResponse {
            uuid: variant.uuid.into(),
            variant_type: variant.variant_type,
            variant_name: variant.variant_name,
            price: variant.price,
            price_modifier: variant.price_modifier,
            stock: variant.stock,
            is_available: variant.is_available,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductResponse {
    /// The unique identifier of the product
    pub uuid: Uuid,

    pub name: String,

    /// URL-safe identifier used in product paths
    pub slug: String,

    /// Price in rupiah
    pub price: u64,

    pub original_price: Option<u64>,

    pub category: Option<String>,

    pub description: Option<String>,

    pub sold_count: i32,

    pub stock: i32,

    pub rating: f64,

    /// Grams
    pub weight: i32,

    /// Centimetres
    pub length: i32,

    pub width: i32,

    pub height: i32,

    pub primary_image: Option<String>,

    pub video_url: Option<String>,

    pub images: Vec<ProductImageResponse>,

    pub variants: Vec<ProductVariantResponse>,

    /// The date and time the product was created
    pub created_at: String,

    /// The date and time the product was last updated
    pub updated_at: String,
}

impl From<ProductRecord> for ProductResponse {
    fn from(product: ProductRecord) -> Self {
        ProductResponse {
            uuid: product.uuid.into(),
            name: product.name,
            slug: product.slug,
            price: product.price,
            original_price: product.original_price,
            category: product.category,
            description: product.description,
            sold_count: product.sold_count,
            stock: product.stock,
            rating: product.rating,
            weight: product.weight,
            length: product.length,
            width: product.width,
            height: product.height,
            primary_image: product.primary_image,
            video_url: product.video_url,
            images: product.images.into_iter().map(Into::into).collect(),
            variants: product.variants.into_iter().map(Into::into).collect(),
            created_at: product.created_at.to_string(),
            updated_at: product.updated_at.to_string(),
        }
    }
}

/// Single product envelope.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductEnvelope {
    pub product: ProductResponse,
}

impl From<ProductRecord> for ProductEnvelope {
    fn from(product: ProductRecord) -> Self {
        ProductEnvelope {
            product: product.into(),
        }
    }
}

/// Get Product Handler
///
/// Returns a product with its images and variants.
#[endpoint(
    tags("products"),
    summary = "Get Product",
    responses(
        (status_code = StatusCode::OK, description = "Product"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    slug: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<ProductEnvelope>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let product = state
        .app
        .products
        .get_product(&slug.into_inner())
        .await
        .map_err(into_status_error)?;

    Ok(Json(product.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use bazaar_app::domain::products::ProductsServiceError;

    use crate::test_helpers::{Mocks, make_product, service_as};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        service_as(mocks, None, Router::with_path("products/{slug}").get(handler))
    }

    #[tokio::test]
    async fn test_get_returns_product() -> TestResult {
        let product = make_product("kaos-polos-a1b2c3", 50_000);

        let mut mocks = Mocks::default();

        mocks
            .products
            .expect_get_product()
            .once()
            .withf(|slug| slug == "kaos-polos-a1b2c3")
            .return_once(move |_| Ok(product));

        let mut res = TestClient::get("http://example.com/products/kaos-polos-a1b2c3")
            .send(&make_service(mocks))
            .await;

        let body: ProductEnvelope = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.product.slug, "kaos-polos-a1b2c3");
        assert_eq!(body.product.price, 50_000);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_missing_product_returns_404() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .products
            .expect_get_product()
            .once()
            .return_once(|_| Err(ProductsServiceError::NotFound));

        let res = TestClient::get("http://example.com/products/missing")
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
