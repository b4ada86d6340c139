//! Server configuration module

use std::time::Duration;

use clap::Parser;

use bazaar_app::{
    auth::SessionKeys,
    context::{AppSettings, PaymentSettings, ShippingSettings},
};

use crate::config::{
    auth::SessionConfig,
    db::DatabaseConfig,
    observability::{LoggingConfig, ObservabilityConfig},
    providers::{PaymentConfig, ProviderConfig, ShippingConfig},
    server::ServerRuntimeConfig,
};

pub(crate) mod auth;
pub(crate) mod db;
pub(crate) mod observability;
pub(crate) mod providers;
pub(crate) mod server;

/// Bazaar JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "bazaar-json", about = "Bazaar JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network and upload settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Observability (traces/metrics) settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Session signing settings.
    #[command(flatten)]
    pub session: SessionConfig,

    /// Payment gateway credentials.
    #[command(flatten)]
    pub payments: PaymentConfig,

    /// Shipping aggregator credentials.
    #[command(flatten)]
    pub shipping: ShippingConfig,

    /// Outbound provider call settings.
    #[command(flatten)]
    pub providers: ProviderConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }

    /// Settings for wiring the application services.
    #[must_use]
    pub fn app_settings(&self) -> AppSettings {
        AppSettings {
            database_url: self.database.database_url.clone(),
            sessions: SessionKeys::new(&self.session.jwt_secret),
            payments: self.payments.credentials().map(|(server_key, client_key)| {
                PaymentSettings {
                    server_key,
                    client_key,
                    is_production: self.payments.midtrans_is_production,
                }
            }),
            shipping: self.shipping.api_key().map(|api_key| ShippingSettings {
                api_key,
                base_url: self.shipping.biteship_base_url.clone(),
            }),
            provider_timeout: Duration::from_secs(self.providers.provider_timeout_seconds),
        }
    }
}
