//! Orders service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};

use crate::{
    database::Db,
    domain::{
        accounts::records::AccountRecord,
        carts::{records::CartLineRecord, repository::PgCartLinesRepository},
        orders::{
            data::NewOrder,
            errors::OrdersServiceError,
            records::{OrderRecord, OrderStatus, OrderUuid},
            repository::{OrderInsert, OrderLineInsert, PgOrdersRepository},
        },
        products::records::DEFAULT_WEIGHT,
        settings::{records::ShippingOrigin, repository::PgSettingsRepository},
        shipping::{
            provider::{Parcel, RateRequest, ShippingProvider},
            rates::{DEFAULT_PARCEL_DIMENSION, find_quote, parse_postal_code, resolve_origin},
        },
        truncate_chars,
    },
};

#[derive(Clone)]
pub struct PgOrdersService {
    db: Db,
    shipping: Option<Arc<dyn ShippingProvider>>,
    orders_repository: PgOrdersRepository,
    lines_repository: PgCartLinesRepository,
    settings_repository: PgSettingsRepository,
}

impl std::fmt::Debug for PgOrdersService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgOrdersService")
            .field("shipping_configured", &self.shipping.is_some())
            .finish_non_exhaustive()
    }
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db, shipping: Option<Arc<dyn ShippingProvider>>) -> Self {
        Self {
            db,
            shipping,
            orders_repository: PgOrdersRepository::new(),
            lines_repository: PgCartLinesRepository::new(),
            settings_repository: PgSettingsRepository::new(),
        }
    }

    /// Provider price for the chosen courier service, else the client
    /// estimate.
    async fn shipping_cost(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &NewOrder,
        lines: &[OrderLineInsert],
    ) -> Result<u64, sqlx::Error> {
        let (Some(provider), Some(area_id), Some(company), Some(courier_type)) = (
            self.shipping.as_deref(),
            non_blank(order.destination_area_id.as_deref()),
            non_blank(order.courier_company.as_deref()),
            non_blank(order.courier_type.as_deref()),
        ) else {
            return Ok(order.shipping_cost);
        };

        let settings = self.settings_repository.get_settings(tx).await?;
        let origin = resolve_origin(None, None, &ShippingOrigin::from(&settings));

        let request = RateRequest {
            couriers: company.to_string(),
            items: lines.iter().map(rate_parcel).collect(),
            origin_area_id: Some(origin.area_id),
            origin_postal_code: parse_postal_code(&origin.postal_code),
            destination_area_id: Some(area_id.to_string()),
            destination_postal_code: None,
        };

        match provider.rates(&request).await {
            Ok(response) => {
                let quoted = find_quote(&response.pricing, courier_type);

                if quoted.is_none() {
                    tracing::warn!(
                        company,
                        courier_type,
                        "no matching quote, keeping client shipping estimate"
                    );
                }

                Ok(quoted.unwrap_or(order.shipping_cost))
            }
            Err(error) => {
                tracing::warn!(%error, "shipping re-quote failed, keeping client estimate");

                Ok(order.shipping_cost)
            }
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn rate_parcel(line: &OrderLineInsert) -> Parcel {
    Parcel {
        name: Some(truncate_chars(&line.product_name, 50)),
        description: None,
        value: line.price,
        quantity: u32::try_from(line.quantity).unwrap_or_default(),
        weight: u32::try_from(line.weight).unwrap_or_default(),
        length: DEFAULT_PARCEL_DIMENSION,
        width: DEFAULT_PARCEL_DIMENSION,
        height: DEFAULT_PARCEL_DIMENSION,
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn create_order(
        &self,
        account: AccountRecord,
        order: NewOrder,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = self.lines_repository.list_lines(&mut tx, account.uuid).await?;

        if cart.is_empty() {
            return Err(OrdersServiceError::EmptyCart);
        }

        let lines: Vec<OrderLineInsert> = cart
            .iter()
            .map(|line| OrderLineInsert {
                product_uuid: Some(line.product_uuid),
                product_name: line.product.name.clone(),
                variant_name: line.variant_name.clone(),
                quantity: line.quantity,
                price: line.effective_unit_price(),
                weight: if line.product.weight > 0 {
                    line.product.weight
                } else {
                    DEFAULT_WEIGHT
                },
            })
            .collect();

        let subtotal = cart
            .iter()
            .map(CartLineRecord::line_total)
            .fold(0, u64::saturating_add);

        let shipping_cost = self.shipping_cost(&mut tx, &order, &lines).await?;

        // Amounts are stored as BIGINT.
        subtotal
            .checked_add(shipping_cost)
            .filter(|total| i64::try_from(*total).is_ok())
            .ok_or(OrdersServiceError::InvalidData)?;

        let contact_name = non_blank(order.destination_contact_name.as_deref())
            .unwrap_or(&account.name);

        let contact_phone = non_blank(order.destination_contact_phone.as_deref())
            .or(account.phone.as_deref());

        let created = self
            .orders_repository
            .create_order(
                &mut tx,
                OrderInsert {
                    uuid: OrderUuid::new(),
                    account: account.uuid,
                    subtotal,
                    shipping_cost,
                    shipping_address: order.shipping_address.as_deref(),
                    destination_area_id: order.destination_area_id.as_deref(),
                    destination_postal_code: order.destination_postal_code.as_deref(),
                    destination_contact_name: Some(contact_name),
                    destination_contact_phone: contact_phone,
                    courier_company: order.courier_company.as_deref(),
                    courier_type: order.courier_type.as_deref(),
                    courier_service_name: order.courier_service_name.as_deref(),
                    shipping_etd: order.shipping_etd.as_deref(),
                },
                &lines,
            )
            .await?;

        self.lines_repository.clear(&mut tx, account.uuid).await?;

        tx.commit().await?;

        tracing::info!(
            order_uuid = %created.uuid,
            total = created.total,
            lines = created.lines.len(),
            "order created"
        );

        Ok(created)
    }

    async fn list_orders(
        &self,
        viewer: AccountRecord,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let scope = (!viewer.is_seller()).then_some(viewer.uuid);

        let mut tx = self.db.begin().await?;

        let orders = self.orders_repository.list_orders(&mut tx, scope).await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn get_order(
        &self,
        viewer: AccountRecord,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let order = self.orders_repository.get_order(&mut tx, order).await?;

        tx.commit().await?;

        if !viewer.is_seller() && order.account_uuid != viewer.uuid {
            return Err(OrdersServiceError::Forbidden);
        }

        Ok(order)
    }

    async fn update_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let updated = self
            .orders_repository
            .update_status(&mut tx, order, status)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Turn the account's cart into an order and empty the cart.
    async fn create_order(
        &self,
        account: AccountRecord,
        order: NewOrder,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Every order for sellers, own orders for buyers; newest first.
    async fn list_orders(&self, viewer: AccountRecord)
    -> Result<Vec<OrderRecord>, OrdersServiceError>;

    /// Retrieve a single order the viewer may see.
    async fn get_order(
        &self,
        viewer: AccountRecord,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Set an order's status.
    async fn update_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<OrderRecord, OrdersServiceError>;
}
