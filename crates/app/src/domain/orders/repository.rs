//! Orders Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use uuid::Uuid;

use crate::{
    database::{amount_to_i64, try_get_amount},
    domain::{
        accounts::records::AccountUuid,
        orders::records::{OrderLineRecord, OrderLineUuid, OrderRecord, OrderStatus, OrderUuid},
        products::records::ProductUuid,
    },
};

const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const CREATE_ORDER_LINE_SQL: &str = include_str!("sql/create_order_line.sql");
const LIST_ORDER_LINES_SQL: &str = include_str!("sql/list_order_lines.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const LOCK_ORDER_SQL: &str = include_str!("sql/lock_order.sql");
const LOCK_ORDER_BY_GATEWAY_ID_SQL: &str = include_str!("sql/lock_order_by_gateway_id.sql");
const LIST_ORDERS_SQL: &str = include_str!("sql/list_orders.sql");
const UPDATE_STATUS_SQL: &str = include_str!("sql/update_status.sql");
const RECORD_PAYMENT_TOKEN_SQL: &str = include_str!("sql/record_payment_token.sql");
const RECORD_PAYMENT_STATUS_SQL: &str = include_str!("sql/record_payment_status.sql");
const RECORD_SHIPMENT_SQL: &str = include_str!("sql/record_shipment.sql");
const RECORD_TRACKING_SQL: &str = include_str!("sql/record_tracking.sql");

/// Order header ready for insertion.
#[derive(Debug)]
pub(crate) struct OrderInsert<'a> {
    pub uuid: OrderUuid,
    pub account: AccountUuid,
    pub subtotal: u64,
    pub shipping_cost: u64,
    pub shipping_address: Option<&'a str>,
    pub destination_area_id: Option<&'a str>,
    pub destination_postal_code: Option<&'a str>,
    pub destination_contact_name: Option<&'a str>,
    pub destination_contact_phone: Option<&'a str>,
    pub courier_company: Option<&'a str>,
    pub courier_type: Option<&'a str>,
    pub courier_service_name: Option<&'a str>,
    pub shipping_etd: Option<&'a str>,
}

/// Line snapshot ready for insertion.
#[derive(Debug, Clone)]
pub(crate) struct OrderLineInsert {
    pub product_uuid: Option<ProductUuid>,
    pub product_name: String,
    pub variant_name: Option<String>,
    pub quantity: i32,
    pub price: u64,
    pub weight: i32,
}

/// Provider tracking fields; `None` keeps the stored value.
#[derive(Debug, Default)]
pub(crate) struct TrackingUpdate<'a> {
    pub waybill_id: Option<&'a str>,
    pub tracking_status: Option<&'a str>,
    pub tracking_url: Option<&'a str>,
    pub status: Option<OrderStatus>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderInsert<'_>,
        lines: &[OrderLineInsert],
    ) -> Result<OrderRecord, sqlx::Error> {
        let total = order.subtotal.saturating_add(order.shipping_cost);

        let mut created = query_as::<Postgres, OrderRecord>(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(order.account.into_uuid())
            .bind(amount_to_i64(order.subtotal, "subtotal")?)
            .bind(amount_to_i64(order.shipping_cost, "shipping_cost")?)
            .bind(amount_to_i64(total, "total")?)
            .bind(order.shipping_address)
            .bind(order.destination_area_id)
            .bind(order.destination_postal_code)
            .bind(order.destination_contact_name)
            .bind(order.destination_contact_phone)
            .bind(order.courier_company)
            .bind(order.courier_type)
            .bind(order.courier_service_name)
            .bind(order.shipping_etd)
            .fetch_one(&mut **tx)
            .await?;

        for (position, line) in (0_i32..).zip(lines) {
            let line = query_as::<Postgres, OrderLineRecord>(CREATE_ORDER_LINE_SQL)
                .bind(OrderLineUuid::new().into_uuid())
                .bind(created.uuid.into_uuid())
                .bind(line.product_uuid.map(ProductUuid::into_uuid))
                .bind(&line.product_name)
                .bind(line.variant_name.as_deref())
                .bind(line.quantity)
                .bind(amount_to_i64(line.price, "price")?)
                .bind(line.weight)
                .bind(position)
                .fetch_one(&mut **tx)
                .await?;

            created.lines.push(line);
        }

        Ok(created)
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        let order = query_as::<Postgres, OrderRecord>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        self.with_lines(tx, order).await
    }

    /// Fetch an order and hold its row lock until the transaction ends.
    pub(crate) async fn lock_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        let order = query_as::<Postgres, OrderRecord>(LOCK_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        self.with_lines(tx, order).await
    }

    /// Lock the newest order whose accepted payment id matches.
    pub(crate) async fn lock_order_by_gateway_id(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        gateway_order_id: &str,
    ) -> Result<Option<OrderRecord>, sqlx::Error> {
        let order = query_as::<Postgres, OrderRecord>(LOCK_ORDER_BY_GATEWAY_ID_SQL)
            .bind(gateway_order_id)
            .fetch_optional(&mut **tx)
            .await?;

        match order {
            Some(order) => Ok(Some(self.with_lines(tx, order).await?)),
            None => Ok(None),
        }
    }

    /// Orders newest first, optionally restricted to one account.
    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: Option<AccountUuid>,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        let mut orders = query_as::<Postgres, OrderRecord>(LIST_ORDERS_SQL)
            .bind(account.map(AccountUuid::into_uuid))
            .fetch_all(&mut **tx)
            .await?;

        self.load_lines(tx, &mut orders).await?;

        Ok(orders)
    }

    pub(crate) async fn update_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<OrderRecord, sqlx::Error> {
        let order = query_as::<Postgres, OrderRecord>(UPDATE_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(status.as_str())
            .fetch_one(&mut **tx)
            .await?;

        self.with_lines(tx, order).await
    }

    pub(crate) async fn record_payment_token(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        gateway_order_id: &str,
        token: &str,
    ) -> Result<OrderRecord, sqlx::Error> {
        let order = query_as::<Postgres, OrderRecord>(RECORD_PAYMENT_TOKEN_SQL)
            .bind(order.into_uuid())
            .bind(gateway_order_id)
            .bind(token)
            .fetch_one(&mut **tx)
            .await?;

        self.with_lines(tx, order).await
    }

    pub(crate) async fn record_payment_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        status: Option<OrderStatus>,
        transaction_id: Option<&str>,
    ) -> Result<OrderRecord, sqlx::Error> {
        let order = query_as::<Postgres, OrderRecord>(RECORD_PAYMENT_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(status.map(OrderStatus::as_str))
            .bind(transaction_id)
            .fetch_one(&mut **tx)
            .await?;

        self.with_lines(tx, order).await
    }

    /// Store a booked shipment and mark the order shipped.
    pub(crate) async fn record_shipment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        shipment_id: &str,
        waybill_id: Option<&str>,
        tracking_status: &str,
        tracking_url: Option<&str>,
    ) -> Result<OrderRecord, sqlx::Error> {
        let order = query_as::<Postgres, OrderRecord>(RECORD_SHIPMENT_SQL)
            .bind(order.into_uuid())
            .bind(shipment_id)
            .bind(waybill_id)
            .bind(tracking_status)
            .bind(tracking_url)
            .fetch_one(&mut **tx)
            .await?;

        self.with_lines(tx, order).await
    }

    pub(crate) async fn record_tracking(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        update: TrackingUpdate<'_>,
    ) -> Result<OrderRecord, sqlx::Error> {
        let order = query_as::<Postgres, OrderRecord>(RECORD_TRACKING_SQL)
            .bind(order.into_uuid())
            .bind(update.waybill_id)
            .bind(update.tracking_status)
            .bind(update.tracking_url)
            .bind(update.status.map(OrderStatus::as_str))
            .fetch_one(&mut **tx)
            .await?;

        self.with_lines(tx, order).await
    }

    async fn with_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderRecord,
    ) -> Result<OrderRecord, sqlx::Error> {
        let mut orders = vec![order];

        self.load_lines(tx, &mut orders).await?;

        orders.pop().ok_or(sqlx::Error::RowNotFound)
    }

    async fn load_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &mut [OrderRecord],
    ) -> Result<(), sqlx::Error> {
        if orders.is_empty() {
            return Ok(());
        }

        let ids: Vec<Uuid> = orders.iter().map(|o| o.uuid.into_uuid()).collect();

        let lines = query_as::<Postgres, OrderLineRecord>(LIST_ORDER_LINES_SQL)
            .bind(&ids)
            .fetch_all(&mut **tx)
            .await?;

        for order in orders.iter_mut() {
            order.lines = lines
                .iter()
                .filter(|l| l.order_uuid == order.uuid)
                .cloned()
                .collect();
        }

        Ok(())
    }
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;

        let status = status
            .parse::<OrderStatus>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            account_uuid: AccountUuid::from_uuid(row.try_get("account_uuid")?),
            subtotal: try_get_amount(row, "subtotal")?,
            shipping_cost: try_get_amount(row, "shipping_cost")?,
            total: try_get_amount(row, "total")?,
            status,
            shipping_address: row.try_get("shipping_address")?,
            destination_area_id: row.try_get("destination_area_id")?,
            destination_postal_code: row.try_get("destination_postal_code")?,
            destination_contact_name: row.try_get("destination_contact_name")?,
            destination_contact_phone: row.try_get("destination_contact_phone")?,
            courier_company: row.try_get("courier_company")?,
            courier_type: row.try_get("courier_type")?,
            courier_service_name: row.try_get("courier_service_name")?,
            shipping_etd: row.try_get("shipping_etd")?,
            gateway_order_id: row.try_get("gateway_order_id")?,
            payment_token: row.try_get("payment_token")?,
            payment_transaction_id: row.try_get("payment_transaction_id")?,
            shipment_id: row.try_get("shipment_id")?,
            waybill_id: row.try_get("waybill_id")?,
            tracking_status: row.try_get("tracking_status")?,
            tracking_url: row.try_get("tracking_url")?,
            lines: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderLineRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderLineUuid::from_uuid(row.try_get("uuid")?),
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            product_uuid: row
                .try_get::<Option<Uuid>, _>("product_uuid")?
                .map(ProductUuid::from_uuid),
            product_name: row.try_get("product_name")?,
            variant_name: row.try_get("variant_name")?,
            quantity: row.try_get("quantity")?,
            price: try_get_amount(row, "price")?,
            weight: row.try_get("weight")?,
        })
    }
}
