//! Products service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::products::{
        data::{NewProduct, ProductFilter, ProductUpdate},
        errors::ProductsServiceError,
        records::{ProductImageRecord, ProductImageUuid, ProductRecord},
        repository::PgProductsRepository,
        slug::generate_slug,
    },
};

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    repository: PgProductsRepository,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
        }
    }
}

fn normalize_filter(filter: ProductFilter) -> ProductFilter {
    ProductFilter {
        category: filter.category.filter(|c| !c.is_empty()),
        search: filter.search.filter(|s| !s.trim().is_empty()),
    }
}

#[async_trait]
impl ProductsService for PgProductsService {
    async fn list_products(
        &self,
        filter: ProductFilter,
    ) -> Result<Vec<ProductRecord>, ProductsServiceError> {
        let filter = normalize_filter(filter);

        let mut tx = self.db.begin().await?;

        let products = self.repository.list_products(&mut tx, &filter).await?;

        tx.commit().await?;

        Ok(products)
    }

    async fn get_product(&self, slug: &str) -> Result<ProductRecord, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let product = self.repository.get_product(&mut tx, slug).await?;

        tx.commit().await?;

        Ok(product)
    }

    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError> {
        if product.name.trim().is_empty() {
            return Err(ProductsServiceError::MissingRequiredData);
        }

        let slug = generate_slug(&product.name);

        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_product(&mut tx, &slug, &product)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn update_product(
        &self,
        slug: &str,
        update: ProductUpdate,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let updated = self.repository.update_product(&mut tx, slug, &update).await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_product(&self, slug: &str) -> Result<(), ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_product(&mut tx, slug).await?;

        if rows_affected == 0 {
            return Err(ProductsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<String>, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let categories = self.repository.list_categories(&mut tx).await?;

        tx.commit().await?;

        Ok(categories)
    }

    async fn add_image(
        &self,
        slug: &str,
        image_url: &str,
    ) -> Result<ProductImageRecord, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let product = self.repository.get_product(&mut tx, slug).await?;

        let image = self
            .repository
            .append_image(&mut tx, product.uuid, image_url)
            .await?;

        tx.commit().await?;

        Ok(image)
    }

    async fn delete_image(
        &self,
        slug: &str,
        image: ProductImageUuid,
    ) -> Result<(), ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let product = self.repository.get_product(&mut tx, slug).await?;

        let rows_affected = self
            .repository
            .delete_image(&mut tx, product.uuid, image)
            .await?;

        if rows_affected == 0 {
            return Err(ProductsServiceError::ImageNotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Retrieves products matching the filter, newest first.
    async fn list_products(
        &self,
        filter: ProductFilter,
    ) -> Result<Vec<ProductRecord>, ProductsServiceError>;

    /// Retrieve a single product by slug.
    async fn get_product(&self, slug: &str) -> Result<ProductRecord, ProductsServiceError>;

    /// Creates a new product under a freshly generated slug.
    async fn create_product(&self, product: NewProduct)
    -> Result<ProductRecord, ProductsServiceError>;

    /// Partially updates a product.
    async fn update_product(
        &self,
        slug: &str,
        update: ProductUpdate,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Deletes a product with its images and variants.
    async fn delete_product(&self, slug: &str) -> Result<(), ProductsServiceError>;

    /// Distinct, sorted, non-empty categories.
    async fn list_categories(&self) -> Result<Vec<String>, ProductsServiceError>;

    /// Append an image after the existing ones.
    async fn add_image(
        &self,
        slug: &str,
        image_url: &str,
    ) -> Result<ProductImageRecord, ProductsServiceError>;

    /// Remove one image from a product.
    async fn delete_image(
        &self,
        slug: &str,
        image: ProductImageUuid,
    ) -> Result<(), ProductsServiceError>;
}
