//! App Context

use std::{sync::Arc, time::Duration};

use thiserror::Error;

use crate::{
    auth::SessionKeys,
    database::{self, Db},
    domain::{
        accounts::{AccountsService, PgAccountsService},
        carts::{CartsService, PgCartsService},
        orders::{OrdersService, PgOrdersService},
        payments::{
            GatewayError, PaymentProvider, PaymentsService, PgPaymentsService,
            midtrans::MidtransClient,
        },
        products::{PgProductsService, ProductsService},
        settings::{PgSettingsService, SettingsService},
        shipping::{
            PgShippingService, ShippingProvider, ShippingProviderError, ShippingService,
            biteship::BiteshipClient,
        },
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to build payment gateway client")]
    Payments(#[source] GatewayError),

    #[error("failed to build shipping provider client")]
    Shipping(#[source] ShippingProviderError),
}

/// Payment gateway credentials.
#[derive(Clone)]
pub struct PaymentSettings {
    pub server_key: String,
    pub client_key: String,
    pub is_production: bool,
}

impl std::fmt::Debug for PaymentSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentSettings")
            .field("server_key", &"**redacted**")
            .field("client_key", &self.client_key)
            .field("is_production", &self.is_production)
            .finish()
    }
}

/// Shipping aggregator credentials.
#[derive(Clone)]
pub struct ShippingSettings {
    pub api_key: String,
    pub base_url: String,
}

impl std::fmt::Debug for ShippingSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShippingSettings")
            .field("api_key", &"**redacted**")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Everything needed to wire the services. Providers are optional; without
/// them the dependent operations report that they are not configured.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub database_url: String,
    pub sessions: SessionKeys,
    pub payments: Option<PaymentSettings>,
    pub shipping: Option<ShippingSettings>,
    pub provider_timeout: Duration,
}

#[derive(Clone)]
pub struct AppContext {
    pub accounts: Arc<dyn AccountsService>,
    pub products: Arc<dyn ProductsService>,
    pub carts: Arc<dyn CartsService>,
    pub orders: Arc<dyn OrdersService>,
    pub payments: Arc<dyn PaymentsService>,
    pub shipping: Arc<dyn ShippingService>,
    pub settings: Arc<dyn SettingsService>,
    pub sessions: SessionKeys,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("sessions", &self.sessions)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Connect to the database and build every service.
    ///
    /// # Errors
    ///
    /// Returns an error when the database connection or a provider client
    /// cannot be established.
    pub async fn from_settings(settings: AppSettings) -> Result<Self, AppInitError> {
        let pool = database::connect(&settings.database_url)
            .await
            .map_err(AppInitError::Database)?;

        let payments = settings
            .payments
            .map(|payments| {
                let gateway = MidtransClient::new(
                    &payments.server_key,
                    payments.is_production,
                    settings.provider_timeout,
                )
                .map_err(AppInitError::Payments)?;

                Ok::<_, AppInitError>(PaymentProvider {
                    gateway: Arc::new(gateway),
                    server_key: payments.server_key,
                    client_key: payments.client_key,
                    is_production: payments.is_production,
                })
            })
            .transpose()?;

        let shipping = settings
            .shipping
            .map(|shipping| {
                BiteshipClient::new(shipping.base_url, shipping.api_key, settings.provider_timeout)
                    .map(|client| Arc::new(client) as Arc<dyn ShippingProvider>)
                    .map_err(AppInitError::Shipping)
            })
            .transpose()?;

        Ok(Self::from_parts(
            Db::new(pool),
            settings.sessions,
            payments,
            shipping,
        ))
    }

    /// Wire services over an existing database handle.
    #[must_use]
    pub fn from_parts(
        db: Db,
        sessions: SessionKeys,
        payments: Option<PaymentProvider>,
        shipping: Option<Arc<dyn ShippingProvider>>,
    ) -> Self {
        Self {
            accounts: Arc::new(PgAccountsService::new(db.clone())),
            products: Arc::new(PgProductsService::new(db.clone())),
            carts: Arc::new(PgCartsService::new(db.clone())),
            orders: Arc::new(PgOrdersService::new(db.clone(), shipping.clone())),
            payments: Arc::new(PgPaymentsService::new(db.clone(), payments)),
            shipping: Arc::new(PgShippingService::new(db.clone(), shipping)),
            settings: Arc::new(PgSettingsService::new(db)),
            sessions,
        }
    }
}
