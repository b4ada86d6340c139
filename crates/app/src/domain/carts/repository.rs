//! Cart Lines Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    database::{amount_to_i64, try_get_amount, try_get_optional_amount},
    domain::{
        accounts::records::AccountUuid,
        carts::records::{CartLineRecord, CartLineUuid, CartProductSummary},
        products::records::ProductUuid,
    },
};

const LIST_LINES_SQL: &str = include_str!("sql/list_lines.sql");
const GET_LINE_SQL: &str = include_str!("sql/get_line.sql");
const UPSERT_LINE_SQL: &str = include_str!("sql/upsert_line.sql");
const UPDATE_QUANTITY_SQL: &str = include_str!("sql/update_quantity.sql");
const DELETE_LINE_SQL: &str = include_str!("sql/delete_line.sql");
const CLEAR_CART_SQL: &str = include_str!("sql/clear_cart.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartLinesRepository;

impl PgCartLinesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: AccountUuid,
    ) -> Result<Vec<CartLineRecord>, sqlx::Error> {
        query_as::<Postgres, CartLineRecord>(LIST_LINES_SQL)
            .bind(account.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: AccountUuid,
        line: CartLineUuid,
    ) -> Result<CartLineRecord, sqlx::Error> {
        query_as::<Postgres, CartLineRecord>(GET_LINE_SQL)
            .bind(account.into_uuid())
            .bind(line.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Insert a line, or add to the quantity of the matching
    /// (account, product, variant) line and refresh its price.
    pub(crate) async fn upsert_line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: AccountUuid,
        product: ProductUuid,
        variant_name: Option<&str>,
        unit_price: u64,
        quantity: i32,
    ) -> Result<CartLineUuid, sqlx::Error> {
        let uuid: Uuid = query_scalar(UPSERT_LINE_SQL)
            .bind(CartLineUuid::new().into_uuid())
            .bind(account.into_uuid())
            .bind(product.into_uuid())
            .bind(variant_name)
            .bind(amount_to_i64(unit_price, "unit_price")?)
            .bind(quantity)
            .fetch_one(&mut **tx)
            .await?;

        Ok(CartLineUuid::from_uuid(uuid))
    }

    pub(crate) async fn update_quantity(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: AccountUuid,
        line: CartLineUuid,
        quantity: i32,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(UPDATE_QUANTITY_SQL)
            .bind(account.into_uuid())
            .bind(line.into_uuid())
            .bind(quantity)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn delete_line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: AccountUuid,
        line: CartLineUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_LINE_SQL)
            .bind(account.into_uuid())
            .bind(line.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn clear(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: AccountUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(CLEAR_CART_SQL)
            .bind(account.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for CartLineRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CartLineUuid::from_uuid(row.try_get("uuid")?),
            account_uuid: AccountUuid::from_uuid(row.try_get("account_uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            variant_name: row.try_get("variant_name")?,
            unit_price: try_get_optional_amount(row, "unit_price")?,
            quantity: row.try_get("quantity")?,
            product: CartProductSummary {
                name: row.try_get("product_name")?,
                slug: row.try_get("product_slug")?,
                price: try_get_amount(row, "product_price")?,
                primary_image: row.try_get("product_primary_image")?,
                stock: row.try_get("product_stock")?,
                weight: row.try_get("product_weight")?,
                length: row.try_get("product_length")?,
                width: row.try_get("product_width")?,
                height: row.try_get("product_height")?,
            },
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
