//! Carts service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        accounts::records::AccountUuid,
        carts::{
            data::NewCartLine,
            errors::CartsServiceError,
            records::{Cart, CartLineRecord, CartLineUuid},
            repository::PgCartLinesRepository,
        },
        products::repository::PgProductsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    lines_repository: PgCartLinesRepository,
    products_repository: PgProductsRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            lines_repository: PgCartLinesRepository::new(),
            products_repository: PgProductsRepository::new(),
        }
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn get_cart(&self, account: AccountUuid) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let lines = self.lines_repository.list_lines(&mut tx, account).await?;

        tx.commit().await?;

        Ok(Cart { lines })
    }

    async fn add_line(
        &self,
        account: AccountUuid,
        line: NewCartLine,
    ) -> Result<CartLineRecord, CartsServiceError> {
        if line.quantity < 1 {
            return Err(CartsServiceError::InvalidData);
        }

        let variant_name = line.variant_name.as_deref().filter(|v| !v.is_empty());

        let mut tx = self.db.begin().await?;

        let product = self
            .products_repository
            .get_product(&mut tx, &line.product_slug)
            .await
            .map_err(|error| match error {
                sqlx::Error::RowNotFound => CartsServiceError::ProductNotFound,
                other => other.into(),
            })?;

        let unit_price = product.unit_price(variant_name);

        let uuid = self
            .lines_repository
            .upsert_line(
                &mut tx,
                account,
                product.uuid,
                variant_name,
                unit_price,
                line.quantity,
            )
            .await?;

        let created = self.lines_repository.get_line(&mut tx, account, uuid).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn update_quantity(
        &self,
        account: AccountUuid,
        line: CartLineUuid,
        quantity: i32,
    ) -> Result<Option<CartLineRecord>, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        if quantity <= 0 {
            let rows_affected = self.lines_repository.delete_line(&mut tx, account, line).await?;

            if rows_affected == 0 {
                return Err(CartsServiceError::NotFound);
            }

            tx.commit().await?;

            return Ok(None);
        }

        let rows_affected = self
            .lines_repository
            .update_quantity(&mut tx, account, line, quantity)
            .await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::NotFound);
        }

        let updated = self.lines_repository.get_line(&mut tx, account, line).await?;

        tx.commit().await?;

        Ok(Some(updated))
    }

    async fn clear_cart(&self, account: AccountUuid) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin().await?;

        self.lines_repository.clear(&mut tx, account).await?;

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Retrieve every line in an account's cart.
    async fn get_cart(&self, account: AccountUuid) -> Result<Cart, CartsServiceError>;

    /// Add a product (and optional variant) to the cart, merging with an
    /// existing line for the same pair.
    async fn add_line(
        &self,
        account: AccountUuid,
        line: NewCartLine,
    ) -> Result<CartLineRecord, CartsServiceError>;

    /// Set a line's quantity; zero or less removes the line and returns `None`.
    async fn update_quantity(
        &self,
        account: AccountUuid,
        line: CartLineUuid,
        quantity: i32,
    ) -> Result<Option<CartLineRecord>, CartsServiceError>;

    /// Remove every line from the cart.
    async fn clear_cart(&self, account: AccountUuid) -> Result<(), CartsServiceError>;
}
