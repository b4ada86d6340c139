//! Payment Notification Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use bazaar_app::domain::payments::data::PaymentNotification;

use crate::{extensions::*, payments::errors::into_status_error, state::State};

/// Gateway webhook body. The gateway sends amounts and codes as strings but
/// numbers are accepted too.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct NotificationRequest {
    #[serde(default)]
    pub order_id: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub status_code: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub gross_amount: String,

    #[serde(default)]
    pub signature_key: String,

    #[serde(default)]
    pub transaction_status: String,

    pub fraud_status: Option<String>,

    pub transaction_id: Option<String>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(value) => value,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

impl From<NotificationRequest> for PaymentNotification {
    fn from(request: NotificationRequest) -> Self {
        PaymentNotification {
            order_id: request.order_id,
            status_code: request.status_code,
            gross_amount: request.gross_amount,
            signature_key: request.signature_key,
            transaction_status: request.transaction_status,
            fraud_status: request.fraud_status,
            transaction_id: request.transaction_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct NotificationResponse {
    pub success: bool,
}

/// Payment Notification Handler
///
/// Called by the gateway; authenticated by the payload signature rather than
/// a session.
#[endpoint(
    tags("payments"),
    summary = "Payment Notification Webhook",
    responses(
        (status_code = StatusCode::OK, description = "Notification applied"),
        (status_code = StatusCode::FORBIDDEN, description = "Invalid signature"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
    ),
)]
#[tracing::instrument(
    name = "payments.notification",
    skip_all,
    fields(gateway_order_id = tracing::field::Empty, transaction_status = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<NotificationRequest>,
    depot: &mut Depot,
) -> Result<Json<NotificationResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let notification: PaymentNotification = json.into_inner().into();

    let span = tracing::Span::current();

    span.record("gateway_order_id", notification.order_id.as_str());
    span.record(
        "transaction_status",
        notification.transaction_status.as_str(),
    );

    let order = state
        .app
        .payments
        .handle_notification(notification)
        .await
        .map_err(into_status_error)?;

    tracing::info!(order_uuid = %order.uuid, status = %order.status, "applied payment notification");

    Ok(Json(NotificationResponse { success: true }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use bazaar_app::domain::{orders::records::OrderStatus, payments::PaymentsServiceError};

    use crate::test_helpers::{Mocks, buyer, make_order, service_as};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        service_as(
            mocks,
            None,
            Router::with_path("payment/notification").post(handler),
        )
    }

    #[tokio::test]
    async fn test_notification_is_applied_without_session() -> TestResult {
        let order = make_order(buyer().uuid, OrderStatus::Paid);
        let order_id = order.uuid.to_string();
        let expected_id = order_id.clone();

        let mut mocks = Mocks::default();

        mocks
            .payments
            .expect_handle_notification()
            .once()
            .withf(move |notification| {
                notification.order_id == expected_id
                    && notification.status_code == "200"
                    && notification.gross_amount == "65000.00"
                    && notification.transaction_status == "settlement"
                    && notification.fraud_status.is_none()
            })
            .return_once(move |_| Ok(order));

        let mut res = TestClient::post("http://example.com/payment/notification")
            .json(&json!({
                "order_id": order_id,
                "status_code": 200,
                "gross_amount": "65000.00",
                "signature_key": "abc",
                "transaction_status": "settlement"
            }))
            .send(&make_service(mocks))
            .await;

        let body: NotificationResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(body.success);

        Ok(())
    }

    #[tokio::test]
    async fn test_bad_signature_returns_403() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .payments
            .expect_handle_notification()
            .once()
            .return_once(|_| Err(PaymentsServiceError::InvalidSignature));

        let res = TestClient::post("http://example.com/payment/notification")
            .json(&json!({
                "order_id": "x",
                "status_code": "200",
                "gross_amount": "1.00",
                "signature_key": "forged",
                "transaction_status": "settlement"
            }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
