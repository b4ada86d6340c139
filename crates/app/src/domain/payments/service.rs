//! Payments service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use uuid::Uuid;

use crate::{
    database::Db,
    domain::{
        accounts::{records::AccountRecord, repository::PgAccountsRepository},
        orders::{
            records::{OrderRecord, OrderUuid},
            repository::PgOrdersRepository,
        },
        payments::{
            data::{ClientConfig, PaymentNotification, PaymentStatus, PaymentToken},
            errors::PaymentsServiceError,
            gateway::{
                CreditCard, CustomerAddress, CustomerDetails, ItemDetail, PaymentProvider,
                SnapRequest, TransactionDetails,
            },
            reconcile::{
                MAX_TOKEN_ATTEMPTS, alternate_order_id, reconcile, signature, signature_matches,
            },
        },
        truncate_chars,
    },
};

const COUNTRY_CODE: &str = "IDN";
const DEFAULT_ITEM_NAME: &str = "Product";
const DEFAULT_SHIPPING_NAME: &str = "Shipping";
const SHIPPING_ITEM_ID: &str = "shipping";

#[derive(Debug, Clone)]
pub struct PgPaymentsService {
    db: Db,
    provider: Option<PaymentProvider>,
    orders_repository: PgOrdersRepository,
    accounts_repository: PgAccountsRepository,
}

impl PgPaymentsService {
    #[must_use]
    pub fn new(db: Db, provider: Option<PaymentProvider>) -> Self {
        Self {
            db,
            provider,
            orders_repository: PgOrdersRepository::new(),
            accounts_repository: PgAccountsRepository::new(),
        }
    }

    fn provider(&self) -> Result<&PaymentProvider, PaymentsServiceError> {
        self.provider
            .as_ref()
            .ok_or(PaymentsServiceError::ProviderNotConfigured)
    }
}

fn ensure_visible(viewer: &AccountRecord, order: &OrderRecord) -> Result<(), PaymentsServiceError> {
    if viewer.is_seller() || order.account_uuid == viewer.uuid {
        Ok(())
    } else {
        Err(PaymentsServiceError::Forbidden)
    }
}

#[async_trait]
impl PaymentsService for PgPaymentsService {
    fn client_config(&self) -> ClientConfig {
        self.provider
            .as_ref()
            .map(|p| ClientConfig {
                client_key: p.client_key.clone(),
                is_production: p.is_production,
            })
            .unwrap_or_default()
    }

    async fn issue_token(
        &self,
        viewer: AccountRecord,
        order: OrderUuid,
    ) -> Result<PaymentToken, PaymentsServiceError> {
        let provider = self.provider()?;

        let mut tx = self.db.begin().await?;

        let order = self.orders_repository.get_order(&mut tx, order).await?;

        ensure_visible(&viewer, &order)?;

        let customer = if order.account_uuid == viewer.uuid {
            viewer
        } else {
            self.accounts_repository
                .get_account(&mut tx, order.account_uuid)
                .await?
        };

        let mut request = snap_request(&order, &customer);

        let mut attempt = 1;

        let token = loop {
            match provider.gateway.create_transaction(&request).await {
                Ok(token) => break token,
                Err(error) if error.is_order_id_collision() && attempt < MAX_TOKEN_ATTEMPTS => {
                    let alternate = alternate_order_id(order.uuid, Timestamp::now().as_second());

                    tracing::warn!(
                        order_uuid = %order.uuid,
                        rejected = %request.transaction_details.order_id,
                        %alternate,
                        "transaction id already used, retrying"
                    );

                    request.transaction_details.order_id = alternate;
                    attempt += 1;
                }
                Err(error) => return Err(error.into()),
            }
        };

        let gateway_order_id = request.transaction_details.order_id;

        self.orders_repository
            .record_payment_token(&mut tx, order.uuid, &gateway_order_id, &token.token)
            .await?;

        tx.commit().await?;

        Ok(PaymentToken {
            token: token.token,
            redirect_url: token.redirect_url,
            gateway_order_id,
        })
    }

    async fn poll_status(
        &self,
        viewer: AccountRecord,
        order: OrderUuid,
    ) -> Result<PaymentStatus, PaymentsServiceError> {
        let mut tx = self.db.begin().await?;

        let order = self.orders_repository.lock_order(&mut tx, order).await?;

        ensure_visible(&viewer, &order)?;

        let stored = PaymentStatus {
            order_uuid: order.uuid,
            status: order.status,
            transaction_status: None,
        };

        let Some(provider) = self.provider.as_ref() else {
            tx.commit().await?;

            return Ok(stored);
        };

        let lookup_id = order
            .gateway_order_id
            .clone()
            .unwrap_or_else(|| order.uuid.to_string());

        let remote = match provider.gateway.transaction_status(&lookup_id).await {
            Ok(remote) => remote,
            Err(error) => {
                tracing::warn!(%error, order_uuid = %order.uuid, "payment status lookup failed");

                tx.commit().await?;

                return Ok(stored);
            }
        };

        let transaction_status = remote.transaction_status.unwrap_or_default();

        let updated = self
            .orders_repository
            .record_payment_status(
                &mut tx,
                order.uuid,
                reconcile(&transaction_status, remote.fraud_status.as_deref()),
                remote.transaction_id.as_deref(),
            )
            .await?;

        tx.commit().await?;

        Ok(PaymentStatus {
            order_uuid: updated.uuid,
            status: updated.status,
            transaction_status: Some(transaction_status),
        })
    }

    async fn handle_notification(
        &self,
        notification: PaymentNotification,
    ) -> Result<OrderRecord, PaymentsServiceError> {
        let provider = self.provider()?;

        let expected = signature(
            &notification.order_id,
            &notification.status_code,
            &notification.gross_amount,
            &provider.server_key,
        );

        if !signature_matches(&expected, &notification.signature_key) {
            tracing::warn!(order_id = %notification.order_id, "rejected notification signature");

            return Err(PaymentsServiceError::InvalidSignature);
        }

        let mut tx = self.db.begin().await?;

        let by_uuid = match Uuid::parse_str(&notification.order_id) {
            Ok(uuid) => match self
                .orders_repository
                .lock_order(&mut tx, OrderUuid::from_uuid(uuid))
                .await
            {
                Ok(order) => Some(order),
                Err(sqlx::Error::RowNotFound) => None,
                Err(error) => return Err(error.into()),
            },
            Err(_) => None,
        };

        let order = match by_uuid {
            Some(order) => order,
            None => self
                .orders_repository
                .lock_order_by_gateway_id(&mut tx, &notification.order_id)
                .await?
                .ok_or(PaymentsServiceError::NotFound)?,
        };

        let updated = self
            .orders_repository
            .record_payment_status(
                &mut tx,
                order.uuid,
                reconcile(
                    &notification.transaction_status,
                    notification.fraud_status.as_deref(),
                ),
                notification.transaction_id.as_deref(),
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            order_uuid = %updated.uuid,
            transaction_status = %notification.transaction_status,
            status = %updated.status,
            "payment notification applied"
        );

        Ok(updated)
    }
}

/// Hosted payment request from frozen order lines plus a shipping line.
fn snap_request(order: &OrderRecord, customer: &AccountRecord) -> SnapRequest {
    let mut item_details: Vec<ItemDetail> = order
        .lines
        .iter()
        .map(|line| ItemDetail {
            id: line
                .product_uuid
                .map_or_else(|| line.uuid.to_string(), |p| p.to_string()),
            price: line.price,
            quantity: line.quantity,
            name: truncate_chars(non_blank(&line.product_name).unwrap_or(DEFAULT_ITEM_NAME), 50),
        })
        .collect();

    if order.shipping_cost > 0 {
        item_details.push(ItemDetail {
            id: SHIPPING_ITEM_ID.to_string(),
            price: order.shipping_cost,
            quantity: 1,
            name: truncate_chars(
                order
                    .courier_service_name
                    .as_deref()
                    .and_then(non_blank)
                    .unwrap_or(DEFAULT_SHIPPING_NAME),
                50,
            ),
        });
    }

    let gross_amount = order.lines_total().saturating_add(order.shipping_cost);

    let (first_name, last_name) = split_name(&customer.name, &customer.email);
    let phone = customer.phone.clone().unwrap_or_default();
    let shipping_text = order.shipping_address.as_deref().and_then(non_blank);
    let account_address = customer.address.as_deref().and_then(non_blank);

    let billing_address = CustomerAddress {
        first_name: first_name.clone(),
        last_name: last_name.clone(),
        email: customer.email.clone(),
        phone: phone.clone(),
        address: account_address.or(shipping_text).unwrap_or_default().to_string(),
        city: customer.city.clone().unwrap_or_default(),
        postal_code: customer
            .postal_code
            .as_deref()
            .and_then(non_blank)
            .map(str::to_string),
        country_code: COUNTRY_CODE.to_string(),
    };

    let shipping_address = CustomerAddress {
        address: shipping_text.or(account_address).unwrap_or_default().to_string(),
        ..billing_address.clone()
    };

    SnapRequest {
        transaction_details: TransactionDetails {
            order_id: order.uuid.to_string(),
            gross_amount,
        },
        customer_details: CustomerDetails {
            first_name,
            last_name,
            email: customer.email.clone(),
            phone,
            billing_address,
            shipping_address,
        },
        item_details,
        credit_card: CreditCard { secure: true },
    }
}

fn non_blank(value: &str) -> Option<&str> {
    (!value.trim().is_empty()).then_some(value)
}

/// Split on the first space; an empty first name falls back to the email's
/// local part.
fn split_name(name: &str, email: &str) -> (String, String) {
    let (first, last) = name.split_once(' ').unwrap_or((name, ""));

    let first = if first.is_empty() {
        email.split('@').next().unwrap_or_default()
    } else {
        first
    };

    (first.to_string(), last.to_string())
}

#[automock]
#[async_trait]
pub trait PaymentsService: Send + Sync {
    /// Public gateway configuration for the storefront.
    fn client_config(&self) -> ClientConfig;

    /// Issue a hosted payment page token for an order.
    async fn issue_token(
        &self,
        viewer: AccountRecord,
        order: OrderUuid,
    ) -> Result<PaymentToken, PaymentsServiceError>;

    /// Ask the gateway for the transaction state and apply it.
    async fn poll_status(
        &self,
        viewer: AccountRecord,
        order: OrderUuid,
    ) -> Result<PaymentStatus, PaymentsServiceError>;

    /// Verify and apply a gateway status notification.
    async fn handle_notification(
        &self,
        notification: PaymentNotification,
    ) -> Result<OrderRecord, PaymentsServiceError>;
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use testresult::TestResult;

    use crate::{
        domain::{
            orders::{OrdersService, records::OrderStatus},
            payments::{
                GatewayError, MockPaymentGateway,
                gateway::{SnapToken, TransactionStatus},
            },
        },
        test::{
            TestContext,
            helpers::{create_buyer, create_seller, place_order},
        },
    };

    use super::*;

    const SERVER_KEY: &str = "SB-Mid-server-test";

    fn service(ctx: &TestContext, gateway: MockPaymentGateway) -> PgPaymentsService {
        PgPaymentsService::new(
            ctx.database(),
            Some(PaymentProvider {
                gateway: Arc::new(gateway),
                server_key: SERVER_KEY.to_string(),
                client_key: "SB-Mid-client-test".to_string(),
                is_production: false,
            }),
        )
    }

    fn token() -> SnapToken {
        SnapToken {
            token: "snap-token".to_string(),
            redirect_url: Some("https://app.sandbox.midtrans.com/snap/v4/redirection/snap-token".to_string()),
        }
    }

    fn collision() -> GatewayError {
        GatewayError::Rejected {
            status: 400,
            messages: vec!["transaction_details.order_id has already been taken".to_string()],
        }
    }

    fn notification(order_id: &str, transaction_status: &str) -> PaymentNotification {
        let status_code = "200";
        let gross_amount = "65000.00";

        PaymentNotification {
            order_id: order_id.to_string(),
            status_code: status_code.to_string(),
            gross_amount: gross_amount.to_string(),
            signature_key: signature(order_id, status_code, gross_amount, SERVER_KEY),
            transaction_status: transaction_status.to_string(),
            fraud_status: None,
            transaction_id: Some("txn-1".to_string()),
        }
    }

    #[test]
    fn split_name_uses_first_space() {
        assert_eq!(
            split_name("Ana Putri Lestari", "ana@example.com"),
            ("Ana".to_string(), "Putri Lestari".to_string())
        );
        assert_eq!(
            split_name("Ana", "ana@example.com"),
            ("Ana".to_string(), String::new())
        );
        assert_eq!(
            split_name("", "ana@example.com"),
            ("ana".to_string(), String::new())
        );
    }

    #[tokio::test]
    async fn client_config_without_provider_is_empty() {
        let ctx = TestContext::new().await;

        let config = PgPaymentsService::new(ctx.database(), None).client_config();

        assert_eq!(config, ClientConfig::default());
    }

    #[tokio::test]
    async fn issue_token_without_provider_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let buyer = create_buyer(&ctx, "ana@example.com").await?;

        let order = place_order(&ctx, &buyer).await?;

        let result = PgPaymentsService::new(ctx.database(), None)
            .issue_token(buyer, order.uuid)
            .await;

        assert!(
            matches!(result, Err(PaymentsServiceError::ProviderNotConfigured)),
            "expected ProviderNotConfigured, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn issue_token_sends_order_lines_and_shipping() -> TestResult {
        let ctx = TestContext::new().await;
        let buyer = create_buyer(&ctx, "ana@example.com").await?;

        let order = place_order(&ctx, &buyer).await?;
        let order_id = order.uuid.to_string();
        let expected_gross = order.total;

        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_create_transaction()
            .once()
            .withf(move |request| {
                let shipping = request.item_details.last();

                request.transaction_details.order_id == order_id
                    && request.transaction_details.gross_amount == expected_gross
                    && request.item_details.len() == 2
                    && shipping.is_some_and(|s| s.id == "shipping" && s.quantity == 1)
                    && request.customer_details.first_name == "Ana"
                    && request.customer_details.last_name == "Lestari"
                    && request.customer_details.billing_address.country_code == "IDN"
                    && request.credit_card.secure
            })
            .return_once(|_| Ok(token()));

        let issued = service(&ctx, gateway).issue_token(buyer.clone(), order.uuid).await?;

        assert_eq!(issued.token, "snap-token");
        assert_eq!(issued.gateway_order_id, order.uuid.to_string());

        let stored = ctx.orders.get_order(buyer, order.uuid).await?;
        assert_eq!(stored.payment_token.as_deref(), Some("snap-token"));
        assert_eq!(stored.gateway_order_id, Some(order.uuid.to_string()));

        Ok(())
    }

    #[tokio::test]
    async fn issue_token_retries_with_alternate_id_on_collision() -> TestResult {
        let ctx = TestContext::new().await;
        let buyer = create_buyer(&ctx, "ana@example.com").await?;

        let order = place_order(&ctx, &buyer).await?;
        let plain_id = order.uuid.to_string();

        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_create_transaction()
            .times(2)
            .returning(move |request| {
                if request.transaction_details.order_id == plain_id {
                    Err(collision())
                } else {
                    Ok(token())
                }
            });

        let issued = service(&ctx, gateway).issue_token(buyer.clone(), order.uuid).await?;

        let prefix = format!("{}-", order.uuid);
        assert!(
            issued.gateway_order_id.starts_with(&prefix),
            "unexpected id {}",
            issued.gateway_order_id
        );

        let stored = ctx.orders.get_order(buyer, order.uuid).await?;
        assert_eq!(stored.gateway_order_id, Some(issued.gateway_order_id));

        Ok(())
    }

    #[tokio::test]
    async fn issue_token_gives_up_after_three_collisions() -> TestResult {
        let ctx = TestContext::new().await;
        let buyer = create_buyer(&ctx, "ana@example.com").await?;

        let order = place_order(&ctx, &buyer).await?;

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut gateway = MockPaymentGateway::new();
        gateway.expect_create_transaction().returning(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);

            Err(collision())
        });

        let result = service(&ctx, gateway).issue_token(buyer.clone(), order.uuid).await;

        assert!(
            matches!(result, Err(PaymentsServiceError::Gateway(GatewayError::Rejected { .. }))),
            "expected gateway rejection, got {result:?}"
        );
        assert_eq!(calls.load(Ordering::SeqCst), MAX_TOKEN_ATTEMPTS);

        let stored = ctx.orders.get_order(buyer, order.uuid).await?;
        assert!(stored.payment_token.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn issue_token_does_not_retry_other_rejections() -> TestResult {
        let ctx = TestContext::new().await;
        let buyer = create_buyer(&ctx, "ana@example.com").await?;

        let order = place_order(&ctx, &buyer).await?;

        let mut gateway = MockPaymentGateway::new();
        gateway.expect_create_transaction().once().return_once(|_| {
            Err(GatewayError::Rejected {
                status: 401,
                messages: vec!["Access denied due to unauthorized transaction".to_string()],
            })
        });

        let result = service(&ctx, gateway).issue_token(buyer, order.uuid).await;

        assert!(result.is_err());

        Ok(())
    }

    #[tokio::test]
    async fn issue_token_for_other_buyers_order_is_forbidden() -> TestResult {
        let ctx = TestContext::new().await;
        let ana = create_buyer(&ctx, "ana@example.com").await?;
        let bob = create_buyer(&ctx, "bob@example.com").await?;

        let order = place_order(&ctx, &ana).await?;

        let mut gateway = MockPaymentGateway::new();
        gateway.expect_create_transaction().never();

        let result = service(&ctx, gateway).issue_token(bob, order.uuid).await;

        assert!(
            matches!(result, Err(PaymentsServiceError::Forbidden)),
            "expected Forbidden, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn poll_status_applies_settlement() -> TestResult {
        let ctx = TestContext::new().await;
        let buyer = create_buyer(&ctx, "ana@example.com").await?;

        let order = place_order(&ctx, &buyer).await?;
        let lookup_id = order.uuid.to_string();

        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_transaction_status()
            .once()
            .withf(move |id| id == lookup_id)
            .return_once(|_| {
                Ok(TransactionStatus {
                    transaction_status: Some("settlement".to_string()),
                    fraud_status: None,
                    transaction_id: Some("txn-9".to_string()),
                })
            });

        let status = service(&ctx, gateway).poll_status(buyer.clone(), order.uuid).await?;

        assert_eq!(status.status, OrderStatus::Paid);
        assert_eq!(status.transaction_status.as_deref(), Some("settlement"));

        let stored = ctx.orders.get_order(buyer, order.uuid).await?;
        assert_eq!(stored.payment_transaction_id.as_deref(), Some("txn-9"));

        Ok(())
    }

    #[tokio::test]
    async fn poll_status_keeps_stored_status_on_gateway_error() -> TestResult {
        let ctx = TestContext::new().await;
        let buyer = create_buyer(&ctx, "ana@example.com").await?;

        let order = place_order(&ctx, &buyer).await?;

        let mut gateway = MockPaymentGateway::new();
        gateway.expect_transaction_status().once().return_once(|_| {
            Err(GatewayError::Rejected {
                status: 503,
                messages: Vec::new(),
            })
        });

        let status = service(&ctx, gateway).poll_status(buyer, order.uuid).await?;

        assert_eq!(status.status, OrderStatus::Pending);
        assert!(status.transaction_status.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn notification_with_bad_signature_changes_nothing() -> TestResult {
        let ctx = TestContext::new().await;
        let buyer = create_buyer(&ctx, "ana@example.com").await?;

        let order = place_order(&ctx, &buyer).await?;

        let forged = PaymentNotification {
            signature_key: "0".repeat(128),
            ..notification(&order.uuid.to_string(), "settlement")
        };

        let result = service(&ctx, MockPaymentGateway::new())
            .handle_notification(forged)
            .await;

        assert!(
            matches!(result, Err(PaymentsServiceError::InvalidSignature)),
            "expected InvalidSignature, got {result:?}"
        );

        let stored = ctx.orders.get_order(buyer, order.uuid).await?;
        assert_eq!(stored.status, OrderStatus::Pending);

        Ok(())
    }

    #[tokio::test]
    async fn notification_applies_status_by_order_uuid() -> TestResult {
        let ctx = TestContext::new().await;
        let buyer = create_buyer(&ctx, "ana@example.com").await?;

        let order = place_order(&ctx, &buyer).await?;

        let updated = service(&ctx, MockPaymentGateway::new())
            .handle_notification(notification(&order.uuid.to_string(), "expire"))
            .await?;

        assert_eq!(updated.status, OrderStatus::Cancelled);
        assert_eq!(updated.payment_transaction_id.as_deref(), Some("txn-1"));

        Ok(())
    }

    #[tokio::test]
    async fn notification_finds_order_by_alternate_gateway_id() -> TestResult {
        let ctx = TestContext::new().await;
        let buyer = create_buyer(&ctx, "ana@example.com").await?;

        let order = place_order(&ctx, &buyer).await?;
        let plain_id = order.uuid.to_string();

        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_create_transaction()
            .times(2)
            .returning(move |request| {
                if request.transaction_details.order_id == plain_id {
                    Err(collision())
                } else {
                    Ok(token())
                }
            });

        let payments = service(&ctx, gateway);

        let issued = payments.issue_token(buyer, order.uuid).await?;

        let updated = payments
            .handle_notification(notification(&issued.gateway_order_id, "settlement"))
            .await?;

        assert_eq!(updated.uuid, order.uuid);
        assert_eq!(updated.status, OrderStatus::Paid);

        Ok(())
    }

    #[tokio::test]
    async fn notification_for_unknown_order_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = service(&ctx, MockPaymentGateway::new())
            .handle_notification(notification("no-such-order", "settlement"))
            .await;

        assert!(
            matches!(result, Err(PaymentsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn seller_may_poll_any_order() -> TestResult {
        let ctx = TestContext::new().await;
        let buyer = create_buyer(&ctx, "ana@example.com").await?;
        let seller = create_seller(&ctx, "toko@example.com").await?;

        let order = place_order(&ctx, &buyer).await?;

        let status = PgPaymentsService::new(ctx.database(), None)
            .poll_status(seller, order.uuid)
            .await?;

        assert_eq!(status.status, OrderStatus::Pending);

        Ok(())
    }
}
