//! Update Product Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};

use bazaar_app::domain::products::data::ProductUpdate;

use crate::{
    extensions::*,
    products::{create::VariantRequest, errors::into_status_error, get::ProductEnvelope},
    state::State,
};

/// Update Product Request; absent fields are left unchanged.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateProductRequest {
    pub name: Option<String>,

    pub price: Option<u64>,

    pub original_price: Option<u64>,

    pub category: Option<String>,

    pub description: Option<String>,

    pub sold_count: Option<i32>,

    pub stock: Option<i32>,

    pub rating: Option<f64>,

    pub weight: Option<i32>,

    pub length: Option<i32>,

    pub width: Option<i32>,

    pub height: Option<i32>,

    pub primary_image: Option<String>,

    pub video_url: Option<String>,

    /// Replaces every existing variant when present
    pub variants: Option<Vec<VariantRequest>>,
}

impl From<UpdateProductRequest> for ProductUpdate {
    fn from(request: UpdateProductRequest) -> Self {
        ProductUpdate {
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
            variants: request
                .variants
                .map(|variants| variants.into_iter().map(Into::into).collect()),
        }
    }
}

/// Update Product Handler
#[endpoint(
    tags("products"),
    summary = "Update Product",
    responses(
        (status_code = StatusCode::OK, description = "Product updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::FORBIDDEN, description = "Seller access required"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "products.update",
    skip_all,
    fields(product_slug = %slug.as_str()),
    err
)]
pub(crate) async fn handler(
    slug: PathParam<String>,
    json: JsonBody<UpdateProductRequest>,
    depot: &mut Depot,
) -> Result<Json<ProductEnvelope>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.seller_or_403()?;

    let product = state
        .app
        .products
        .update_product(&slug.into_inner(), json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    tracing::info!(product_slug = %product.slug, "updated product");

    Ok(Json(product.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use bazaar_app::domain::products::ProductsServiceError;

    use crate::test_helpers::{Mocks, make_product, seller, service_as};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        service_as(
            mocks,
            Some(seller()),
            Router::with_path("products/{slug}").put(handler),
        )
    }

    #[tokio::test]
    async fn test_partial_update_only_sets_given_fields() -> TestResult {
        let mut product = make_product("kaos-polos-a1b2c3", 55_000);

        product.stock = 3;

        let mut mocks = Mocks::default();

        mocks
            .products
            .expect_update_product()
            .once()
            .withf(|slug, update| {
                slug == "kaos-polos-a1b2c3"
                    && *update
                        == ProductUpdate {
                            price: Some(55_000),
                            stock: Some(3),
                            ..ProductUpdate::default()
                        }
            })
            .return_once(move |_, _| Ok(product));

        let mut res = TestClient::put("http://example.com/products/kaos-polos-a1b2c3")
            .json(&json!({ "price": 55_000, "stock": 3 }))
            .send(&make_service(mocks))
            .await;

        let body: ProductEnvelope = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.product.price, 55_000);

        Ok(())
    }

    #[tokio::test]
    async fn test_empty_variant_list_clears_variants() -> TestResult {
        let product = make_product("kaos-polos-a1b2c3", 50_000);

        let mut mocks = Mocks::default();

        mocks
            .products
            .expect_update_product()
            .once()
            .withf(|_, update| update.variants == Some(vec![]))
            .return_once(move |_, _| Ok(product));

        let res = TestClient::put("http://example.com/products/kaos-polos-a1b2c3")
            .json(&json!({ "variants": [] }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_product_returns_404() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .products
            .expect_update_product()
            .once()
            .return_once(|_, _| Err(ProductsServiceError::NotFound));

        let res = TestClient::put("http://example.com/products/missing")
            .json(&json!({ "price": 1 }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
