//! Products Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    database::{amount_to_i64, try_get_amount, try_get_optional_amount},
    domain::products::{
        data::{NewProduct, NewProductImage, NewProductVariant, ProductFilter, ProductUpdate},
        records::{
            DEFAULT_DIMENSION, DEFAULT_WEIGHT, ProductImageRecord, ProductImageUuid,
            ProductRecord, ProductUuid, ProductVariantRecord, ProductVariantUuid,
        },
    },
};

const LIST_PRODUCTS_SQL: &str = include_str!("sql/list_products.sql");
const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const UPDATE_PRODUCT_SQL: &str = include_str!("sql/update_product.sql");
const DELETE_PRODUCT_SQL: &str = include_str!("sql/delete_product.sql");
const LIST_CATEGORIES_SQL: &str = include_str!("sql/list_categories.sql");
const LIST_IMAGES_SQL: &str = include_str!("sql/list_images.sql");
const CREATE_IMAGE_SQL: &str = include_str!("sql/create_image.sql");
const APPEND_IMAGE_SQL: &str = include_str!("sql/append_image.sql");
const DELETE_IMAGE_SQL: &str = include_str!("sql/delete_image.sql");
const LIST_VARIANTS_SQL: &str = include_str!("sql/list_variants.sql");
const CREATE_VARIANT_SQL: &str = include_str!("sql/create_variant.sql");
const DELETE_VARIANTS_SQL: &str = include_str!("sql/delete_variants.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: &ProductFilter,
    ) -> Result<Vec<ProductRecord>, sqlx::Error> {
        let mut products = query_as::<Postgres, ProductRecord>(LIST_PRODUCTS_SQL)
            .bind(filter.category.as_deref())
            .bind(filter.search.as_deref())
            .fetch_all(&mut **tx)
            .await?;

        self.load_children(tx, &mut products).await?;

        Ok(products)
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        slug: &str,
    ) -> Result<ProductRecord, sqlx::Error> {
        let product = query_as::<Postgres, ProductRecord>(GET_PRODUCT_SQL)
            .bind(slug)
            .fetch_one(&mut **tx)
            .await?;

        let mut products = vec![product];

        self.load_children(tx, &mut products).await?;

        products.pop().ok_or(sqlx::Error::RowNotFound)
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        slug: &str,
        product: &NewProduct,
    ) -> Result<ProductRecord, sqlx::Error> {
        let uuid = ProductUuid::new();

        let mut created = query_as::<Postgres, ProductRecord>(CREATE_PRODUCT_SQL)
            .bind(uuid.into_uuid())
            .bind(&product.name)
            .bind(slug)
            .bind(amount_to_i64(product.price, "price")?)
            .bind(
                product
                    .original_price
                    .map(|p| amount_to_i64(p, "original_price"))
                    .transpose()?,
            )
            .bind(product.category.as_deref())
            .bind(product.description.as_deref())
            .bind(product.sold_count)
            .bind(product.stock)
            .bind(product.rating)
            .bind(product.weight.unwrap_or(DEFAULT_WEIGHT))
            .bind(product.length.unwrap_or(DEFAULT_DIMENSION))
            .bind(product.width.unwrap_or(DEFAULT_DIMENSION))
            .bind(product.height.unwrap_or(DEFAULT_DIMENSION))
            .bind(product.primary_image.as_deref())
            .bind(product.video_url.as_deref())
            .fetch_one(&mut **tx)
            .await?;

        for image in &product.images {
            let image = self.create_image(tx, uuid, image).await?;
            created.images.push(image);
        }

        created.variants = self.replace_variants(tx, uuid, &product.variants).await?;

        Ok(created)
    }

    pub(crate) async fn update_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        slug: &str,
        update: &ProductUpdate,
    ) -> Result<ProductRecord, sqlx::Error> {
        let updated = query_as::<Postgres, ProductRecord>(UPDATE_PRODUCT_SQL)
            .bind(slug)
            .bind(update.name.as_deref())
            .bind(update.price.map(|p| amount_to_i64(p, "price")).transpose()?)
            .bind(
                update
                    .original_price
                    .map(|p| amount_to_i64(p, "original_price"))
                    .transpose()?,
            )
            .bind(update.category.as_deref())
            .bind(update.description.as_deref())
            .bind(update.sold_count)
            .bind(update.stock)
            .bind(update.rating)
            .bind(update.weight)
            .bind(update.length)
            .bind(update.width)
            .bind(update.height)
            .bind(update.primary_image.as_deref())
            .bind(update.video_url.as_deref())
            .fetch_one(&mut **tx)
            .await?;

        if let Some(variants) = &update.variants {
            self.replace_variants(tx, updated.uuid, variants).await?;
        }

        let mut products = vec![updated];

        self.load_children(tx, &mut products).await?;

        products.pop().ok_or(sqlx::Error::RowNotFound)
    }

    pub(crate) async fn delete_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        slug: &str,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_PRODUCT_SQL)
            .bind(slug)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn list_categories(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<String>, sqlx::Error> {
        query_scalar::<Postgres, String>(LIST_CATEGORIES_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    async fn create_image(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        image: &NewProductImage,
    ) -> Result<ProductImageRecord, sqlx::Error> {
        query_as::<Postgres, ProductImageRecord>(CREATE_IMAGE_SQL)
            .bind(ProductImageUuid::new().into_uuid())
            .bind(product.into_uuid())
            .bind(&image.image_url)
            .bind(image.display_order)
            .fetch_one(&mut **tx)
            .await
    }

    /// Insert an image after every existing one.
    pub(crate) async fn append_image(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        image_url: &str,
    ) -> Result<ProductImageRecord, sqlx::Error> {
        query_as::<Postgres, ProductImageRecord>(APPEND_IMAGE_SQL)
            .bind(ProductImageUuid::new().into_uuid())
            .bind(product.into_uuid())
            .bind(image_url)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_image(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        image: ProductImageUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_IMAGE_SQL)
            .bind(image.into_uuid())
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    async fn replace_variants(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        variants: &[NewProductVariant],
    ) -> Result<Vec<ProductVariantRecord>, sqlx::Error> {
        query(DELETE_VARIANTS_SQL)
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?;

        let mut created = Vec::with_capacity(variants.len());

        for variant in variants {
            let uuid = ProductVariantUuid::new();

            query(CREATE_VARIANT_SQL)
                .bind(uuid.into_uuid())
                .bind(product.into_uuid())
                .bind(variant.variant_type.as_deref())
                .bind(&variant.variant_name)
                .bind(variant.price.map(|p| amount_to_i64(p, "price")).transpose()?)
                .bind(variant.price_modifier)
                .bind(variant.stock)
                .bind(variant.is_available)
                .execute(&mut **tx)
                .await?;

            created.push(ProductVariantRecord {
                uuid,
                product_uuid: product,
                variant_type: variant.variant_type.clone(),
                variant_name: variant.variant_name.clone(),
                price: variant.price,
                price_modifier: variant.price_modifier,
                stock: variant.stock,
                is_available: variant.is_available,
            });
        }

        Ok(created)
    }

    async fn load_children(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        products: &mut [ProductRecord],
    ) -> Result<(), sqlx::Error> {
        if products.is_empty() {
            return Ok(());
        }

        let ids: Vec<Uuid> = products.iter().map(|p| p.uuid.into_uuid()).collect();

        let images = query_as::<Postgres, ProductImageRecord>(LIST_IMAGES_SQL)
            .bind(&ids)
            .fetch_all(&mut **tx)
            .await?;

        let variants = query_as::<Postgres, ProductVariantRecord>(LIST_VARIANTS_SQL)
            .bind(&ids)
            .fetch_all(&mut **tx)
            .await?;

        for product in products.iter_mut() {
            product.images = images
                .iter()
                .filter(|i| i.product_uuid == product.uuid)
                .cloned()
                .collect();

            product.variants = variants
                .iter()
                .filter(|v| v.product_uuid == product.uuid)
                .cloned()
                .collect();
        }

        Ok(())
    }
}

impl<'r> FromRow<'r, PgRow> for ProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            slug: row.try_get("slug")?,
            price: try_get_amount(row, "price")?,
            original_price: try_get_optional_amount(row, "original_price")?,
            category: row.try_get("category")?,
            description: row.try_get("description")?,
            sold_count: row.try_get("sold_count")?,
            stock: row.try_get("stock")?,
            rating: row.try_get("rating")?,
            weight: row.try_get("weight")?,
            length: row.try_get("length")?,
            width: row.try_get("width")?,
            height: row.try_get("height")?,
            primary_image: row.try_get("primary_image")?,
            video_url: row.try_get("video_url")?,
            images: Vec::new(),
            variants: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for ProductImageRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ProductImageUuid::from_uuid(row.try_get("uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            image_url: row.try_get("image_url")?,
            display_order: row.try_get("display_order")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for ProductVariantRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ProductVariantUuid::from_uuid(row.try_get("uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            variant_type: row.try_get("variant_type")?,
            variant_name: row.try_get("variant_name")?,
            price: try_get_optional_amount(row, "price")?,
            price_modifier: row.try_get("price_modifier")?,
            stock: row.try_get("stock")?,
            is_available: row.try_get("is_available")?,
        })
    }
}
