//! Get Order Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar_app::domain::orders::records::{OrderLineRecord, OrderRecord};

use crate::{extensions::*, orders::errors::into_status_error, state::State};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderLineResponse {
    pub uuid: Uuid,

    /// Absent once the product has been deleted
    pub product_uuid: Option<Uuid>,

    pub product_name: String,

    pub variant_name: Option<String>,

    pub quantity: i32,

    /// Unit price frozen at checkout
    pub price: u64,

    pub weight: i32,
}

impl From<OrderLineRecord> for OrderLineResponse {
    fn from(line: OrderLineRecord) -> Self {
        OrderLineResponse {
            uuid: line.uuid.into(),
            product_uuid: line.product_uuid.map(Into::into),
            product_name: line.product_name,
            variant_name: line.variant_name,
            quantity: line.quantity,
            price: line.price,
            weight: line.weight,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    pub uuid: Uuid,

    pub account_uuid: Uuid,

    pub subtotal: u64,

    pub shipping_cost: u64,

    pub total: u64,

    /// One of pending, paid, processing, shipped, completed, cancelled
    pub status: String,

    pub shipping_address: Option<String>,

    pub destination_area_id: Option<String>,

    pub destination_postal_code: Option<String>,

    pub destination_contact_name: Option<String>,

    pub destination_contact_phone: Option<String>,

    pub courier_company: Option<String>,

    pub courier_type: Option<String>,

    pub courier_service_name: Option<String>,

    pub shipping_etd: Option<String>,

    /// Hosted payment page token
    pub payment_token: Option<String>,

    pub shipment_id: Option<String>,

    pub waybill_id: Option<String>,

    pub tracking_status: Option<String>,

    pub tracking_url: Option<String>,

    pub items: Vec<OrderLineResponse>,

    pub created_at: String,

    pub updated_at: String,
}

impl From<OrderRecord> for OrderResponse {
    fn from(order: OrderRecord) -> Self {
        OrderResponse {
            uuid: order.uuid.into(),
            account_uuid: order.account_uuid.into(),
            subtotal: order.subtotal,
            shipping_cost: order.shipping_cost,
            total: order.total,
            status: order.status.to_string(),
            shipping_address: order.shipping_address,
            destination_area_id: order.destination_area_id,
            destination_postal_code: order.destination_postal_code,
            destination_contact_name: order.destination_contact_name,
            destination_contact_phone: order.destination_contact_phone,
            courier_company: order.courier_company,
            courier_type: order.courier_type,
            courier_service_name: order.courier_service_name,
            shipping_etd: order.shipping_etd,
            payment_token: order.payment_token,
            shipment_id: order.shipment_id,
            waybill_id: order.waybill_id,
            tracking_status: order.tracking_status,
            tracking_url: order.tracking_url,
            items: order.lines.into_iter().map(Into::into).collect(),
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderEnvelope {
    pub order: OrderResponse,
}

impl From<OrderRecord> for OrderEnvelope {
    fn from(order: OrderRecord) -> Self {
        OrderEnvelope {
            order: order.into(),
        }
    }
}

/// Get Order Handler
#[endpoint(
    tags("orders"),
    summary = "Get Order",
    responses(
        (status_code = StatusCode::OK, description = "Order found"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Not signed in"),
        (status_code = StatusCode::FORBIDDEN, description = "Order belongs to another account"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderEnvelope>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let viewer = depot.account_or_401()?;

    let order = state
        .app
        .orders
        .get_order(viewer, order.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use bazaar_app::domain::orders::{
        OrdersServiceError,
        records::{OrderStatus, OrderUuid},
    };

    use crate::test_helpers::{Mocks, buyer, make_order, service_as};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        service_as(
            mocks,
            Some(buyer()),
            Router::with_path("orders/{order}").get(handler),
        )
    }

    #[tokio::test]
    async fn test_get_order_success() -> TestResult {
        let order = make_order(buyer().uuid, OrderStatus::Paid);
        let uuid = order.uuid;

        let mut mocks = Mocks::default();

        mocks
            .orders
            .expect_get_order()
            .once()
            .withf(move |viewer, requested| viewer.email == "ana@example.com" && *requested == uuid)
            .return_once(move |_, _| Ok(order));

        let mut res = TestClient::get(format!("http://example.com/orders/{uuid}"))
            .send(&make_service(mocks))
            .await;

        let body: OrderEnvelope = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.order.status, "paid");
        assert_eq!(body.order.total, 65_000);
        assert_eq!(body.order.items.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_foreign_order_returns_403() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .orders
            .expect_get_order()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::Forbidden));

        let res = TestClient::get(format!("http://example.com/orders/{}", OrderUuid::new()))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_order_returns_404() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .orders
            .expect_get_order()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::NotFound));

        let res = TestClient::get(format!("http://example.com/orders/{}", OrderUuid::new()))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
