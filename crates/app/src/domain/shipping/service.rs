//! Shipping service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use serde_json::{Map, Value};

use crate::{
    database::Db,
    domain::{
        accounts::{records::AccountRecord, repository::PgAccountsRepository},
        orders::{
            records::{OrderRecord, OrderStatus, OrderUuid},
            repository::{PgOrdersRepository, TrackingUpdate},
        },
        settings::{records::ShippingOrigin, repository::PgSettingsRepository},
        shipping::{
            data::{RateQuery, Tracking},
            errors::ShippingServiceError,
            provider::{
                Area, Parcel, RateRequest, ShipmentRequest, ShippingProvider,
                ShippingProviderError,
            },
            rates::{
                DEFAULT_COURIERS, DEFAULT_PARCEL_DIMENSION, DEFAULT_PARCEL_WEIGHT, RateQuote,
                flatten_rates, normalize_parcels, parse_postal_code, postal_code_fallback,
                resolve_origin,
            },
        },
        truncate_chars,
    },
};

const MIN_AREA_QUERY_LENGTH: usize = 3;
const DEFAULT_CONTACT_PHONE: &str = "088888888888";
const DEFAULT_ORIGIN_ADDRESS: &str = "Store address";
const DEFAULT_DESTINATION_ADDRESS: &str = "Buyer address";
const DEFAULT_POSTAL_CODE: u32 = 10110;
const DEFAULT_COURIER_COMPANY: &str = "jne";
const DEFAULT_COURIER_TYPE: &str = "reg";
const DEFAULT_TRACKING_STATUS: &str = "confirmed";

#[derive(Clone)]
pub struct PgShippingService {
    db: Db,
    provider: Option<Arc<dyn ShippingProvider>>,
    orders_repository: PgOrdersRepository,
    accounts_repository: PgAccountsRepository,
    settings_repository: PgSettingsRepository,
}

impl std::fmt::Debug for PgShippingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgShippingService")
            .field("provider_configured", &self.provider.is_some())
            .finish_non_exhaustive()
    }
}

impl PgShippingService {
    #[must_use]
    pub fn new(db: Db, provider: Option<Arc<dyn ShippingProvider>>) -> Self {
        Self {
            db,
            provider,
            orders_repository: PgOrdersRepository::new(),
            accounts_repository: PgAccountsRepository::new(),
            settings_repository: PgSettingsRepository::new(),
        }
    }

    fn provider(&self) -> Result<&dyn ShippingProvider, ShippingServiceError> {
        self.provider
            .as_deref()
            .ok_or(ShippingServiceError::ProviderNotConfigured)
    }
}

#[async_trait]
impl ShippingService for PgShippingService {
    fn availability(&self) -> bool {
        self.provider.is_some()
    }

    async fn search_areas(&self, input: &str) -> Result<Vec<Area>, ShippingServiceError> {
        let Some(provider) = self.provider.as_deref() else {
            return Ok(Vec::new());
        };

        if input.trim().chars().count() < MIN_AREA_QUERY_LENGTH {
            return Ok(Vec::new());
        }

        match provider.search_areas(input.trim()).await {
            Ok(areas) => Ok(areas),
            Err(error) => {
                tracing::warn!(%error, "area search failed");

                Ok(Vec::new())
            }
        }
    }

    async fn quote_rates(&self, query: RateQuery) -> Result<Vec<RateQuote>, ShippingServiceError> {
        let provider = self.provider()?;

        let destination = query
            .destination_area_id
            .filter(|a| !a.trim().is_empty())
            .ok_or(ShippingServiceError::DestinationRequired)?;

        let mut tx = self.db.begin().await?;

        let settings = self.settings_repository.get_settings(&mut tx).await?;

        tx.commit().await?;

        let origin = resolve_origin(
            query.origin_area_id.as_deref(),
            query.origin_postal_code.as_deref(),
            &ShippingOrigin::from(&settings),
        );

        let request = RateRequest {
            couriers: query
                .couriers
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_COURIERS.to_string()),
            items: normalize_parcels(&query.items),
            origin_area_id: Some(origin.area_id),
            origin_postal_code: parse_postal_code(&origin.postal_code),
            destination_area_id: Some(destination.clone()),
            destination_postal_code: query
                .destination_postal_code
                .as_deref()
                .and_then(parse_postal_code),
        };

        let error = match provider.rates(&request).await {
            Ok(response) => return Ok(flatten_rates(&response.pricing)),
            Err(error) => error,
        };

        tracing::warn!(%error, destination_area_id = %destination, "rate quote failed");

        if let Some(postal_code) = postal_code_fallback(&destination) {
            let fallback = RateRequest {
                destination_area_id: None,
                destination_postal_code: Some(postal_code),
                ..request
            };

            match provider.rates(&fallback).await {
                Ok(response) => {
                    let quotes = flatten_rates(&response.pricing);

                    if !quotes.is_empty() {
                        return Ok(quotes);
                    }
                }
                Err(fallback_error) => {
                    tracing::warn!(error = %fallback_error, postal_code, "postal code fallback failed");
                }
            }
        }

        Err(error.into())
    }

    async fn create_shipment(
        &self,
        seller: AccountRecord,
        order: OrderUuid,
    ) -> Result<OrderRecord, ShippingServiceError> {
        let provider = self.provider()?;

        let mut tx = self.db.begin().await?;

        let order = self.orders_repository.lock_order(&mut tx, order).await?;

        if order.shipment_id.is_some() {
            return Err(ShippingServiceError::ShipmentExists);
        }

        if !order.status.is_shippable() {
            return Err(ShippingServiceError::OrderNotPaid);
        }

        let buyer = self
            .accounts_repository
            .get_account(&mut tx, order.account_uuid)
            .await?;

        let request = booking_request(&seller, &buyer, &order);

        let booked = provider.create_order(&request).await?;

        let shipment_id = booked
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ShippingProviderError::Status {
                status: 502,
                message: "booking response carried no shipment id".to_string(),
            })?;

        let shipped = self
            .orders_repository
            .record_shipment(
                &mut tx,
                order.uuid,
                &shipment_id,
                booked.courier.waybill_id.as_deref(),
                booked.status.as_deref().unwrap_or(DEFAULT_TRACKING_STATUS),
                booked.courier.link.as_deref(),
            )
            .await?;

        tx.commit().await?;

        tracing::info!(order_uuid = %shipped.uuid, %shipment_id, "shipment booked");

        Ok(shipped)
    }

    async fn track(
        &self,
        viewer: AccountRecord,
        order: OrderUuid,
    ) -> Result<Tracking, ShippingServiceError> {
        let mut tx = self.db.begin().await?;

        let order = self.orders_repository.get_order(&mut tx, order).await?;

        if !viewer.is_seller() && order.account_uuid != viewer.uuid {
            return Err(ShippingServiceError::Forbidden);
        }

        let (Some(provider), Some(shipment_id)) =
            (self.provider.as_deref(), order.shipment_id.clone())
        else {
            tx.commit().await?;

            return Ok(stored_tracking(&order));
        };

        let remote = match provider.get_order(&shipment_id).await {
            Ok(remote) => remote,
            Err(error) => {
                tracing::warn!(%error, %shipment_id, "tracking refresh failed");

                tx.commit().await?;

                return Ok(stored_tracking(&order));
            }
        };

        let delivered = matches!(remote.status.as_deref(), Some("delivered" | "completed"));

        let updated = self
            .orders_repository
            .record_tracking(
                &mut tx,
                order.uuid,
                TrackingUpdate {
                    waybill_id: remote.courier.waybill_id.as_deref(),
                    tracking_status: remote.status.as_deref(),
                    tracking_url: remote.courier.link.as_deref(),
                    status: delivered.then_some(OrderStatus::Completed),
                },
            )
            .await?;

        tx.commit().await?;

        Ok(Tracking {
            order_uuid: updated.uuid,
            status: remote.status.unwrap_or_default(),
            waybill_id: updated.waybill_id,
            tracking_url: updated.tracking_url,
            courier_company: updated.courier_company,
            courier_type: updated.courier_type,
            driver_name: remote.courier.driver_name,
            driver_phone: remote.courier.driver_phone,
            history: remote.courier.history,
        })
    }
}

fn stored_tracking(order: &OrderRecord) -> Tracking {
    Tracking {
        order_uuid: order.uuid,
        status: order
            .tracking_status
            .clone()
            .unwrap_or_else(|| order.status.to_string()),
        waybill_id: order.waybill_id.clone(),
        tracking_url: order.tracking_url.clone(),
        courier_company: order.courier_company.clone(),
        courier_type: order.courier_type.clone(),
        driver_name: None,
        driver_phone: None,
        history: Vec::new(),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Booking request: seller as shipper and origin, order destination with the
/// buyer's details as fallback.
fn booking_request(
    seller: &AccountRecord,
    buyer: &AccountRecord,
    order: &OrderRecord,
) -> ShipmentRequest {
    let seller_phone = non_blank(seller.phone.as_deref()).unwrap_or(DEFAULT_CONTACT_PHONE);

    let items = order
        .lines
        .iter()
        .map(|line| Parcel {
            name: Some(truncate_chars(&line.product_name, 50)),
            description: Some(truncate_chars(
                line.variant_name.as_deref().unwrap_or_default(),
                100,
            )),
            value: line.price,
            quantity: u32::try_from(line.quantity).unwrap_or_default(),
            weight: u32::try_from(line.weight)
                .ok()
                .filter(|w| *w > 0)
                .unwrap_or(DEFAULT_PARCEL_WEIGHT),
            length: DEFAULT_PARCEL_DIMENSION,
            width: DEFAULT_PARCEL_DIMENSION,
            height: DEFAULT_PARCEL_DIMENSION,
        })
        .collect();

    let mut metadata = Map::new();
    metadata.insert(
        "internal_order_id".to_string(),
        Value::String(order.uuid.to_string()),
    );

    let short_id: String = order.uuid.to_string().chars().take(8).collect();

    ShipmentRequest {
        shipper_contact_name: seller.name.clone(),
        shipper_contact_phone: seller_phone.to_string(),
        shipper_contact_email: seller.email.clone(),
        shipper_organization: seller.name.clone(),
        origin_contact_name: seller.name.clone(),
        origin_contact_phone: seller_phone.to_string(),
        origin_address: non_blank(seller.address.as_deref())
            .unwrap_or(DEFAULT_ORIGIN_ADDRESS)
            .to_string(),
        origin_postal_code: seller
            .postal_code
            .as_deref()
            .and_then(parse_postal_code)
            .unwrap_or(DEFAULT_POSTAL_CODE),
        origin_area_id: non_blank(seller.area_id.as_deref()).map(str::to_string),
        destination_contact_name: non_blank(order.destination_contact_name.as_deref())
            .unwrap_or(&buyer.name)
            .to_string(),
        destination_contact_phone: non_blank(order.destination_contact_phone.as_deref())
            .or(non_blank(buyer.phone.as_deref()))
            .unwrap_or(DEFAULT_CONTACT_PHONE)
            .to_string(),
        destination_address: non_blank(order.shipping_address.as_deref())
            .unwrap_or(DEFAULT_DESTINATION_ADDRESS)
            .to_string(),
        destination_postal_code: order
            .destination_postal_code
            .as_deref()
            .and_then(parse_postal_code)
            .unwrap_or(DEFAULT_POSTAL_CODE),
        destination_area_id: non_blank(order.destination_area_id.as_deref()).map(str::to_string),
        courier_company: non_blank(order.courier_company.as_deref())
            .unwrap_or(DEFAULT_COURIER_COMPANY)
            .to_string(),
        courier_type: non_blank(order.courier_type.as_deref())
            .unwrap_or(DEFAULT_COURIER_TYPE)
            .to_string(),
        delivery_type: "now".to_string(),
        order_note: format!("Order #{short_id}"),
        metadata,
        items,
    }
}

#[automock]
#[async_trait]
pub trait ShippingService: Send + Sync {
    /// Whether a shipping provider is configured.
    fn availability(&self) -> bool;

    /// Search destination areas; short inputs yield nothing.
    async fn search_areas(&self, input: &str) -> Result<Vec<Area>, ShippingServiceError>;

    /// Quote courier rates, cheapest first.
    async fn quote_rates(&self, query: RateQuery) -> Result<Vec<RateQuote>, ShippingServiceError>;

    /// Book the courier pickup for a paid order and mark it shipped.
    async fn create_shipment(
        &self,
        seller: AccountRecord,
        order: OrderUuid,
    ) -> Result<OrderRecord, ShippingServiceError>;

    /// Refresh and return the delivery state of an order.
    async fn track(
        &self,
        viewer: AccountRecord,
        order: OrderUuid,
    ) -> Result<Tracking, ShippingServiceError>;
}
