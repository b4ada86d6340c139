//! Provider Config

use clap::Args;

use bazaar_app::domain::shipping::biteship::DEFAULT_BASE_URL;

/// Payment gateway settings. Payments are disabled without a server key.
#[derive(Debug, Args)]
pub struct PaymentConfig {
    /// Midtrans server key
    #[arg(long, env = "MIDTRANS_SERVER_KEY", hide_env_values = true)]
    pub midtrans_server_key: Option<String>,

    /// Midtrans client key handed to the storefront
    #[arg(long, env = "MIDTRANS_CLIENT_KEY", default_value = "")]
    pub midtrans_client_key: String,

    /// Use the production endpoints instead of the sandbox
    #[arg(long, env = "MIDTRANS_IS_PRODUCTION", default_value_t = false)]
    pub midtrans_is_production: bool,
}

impl PaymentConfig {
    pub(crate) fn credentials(&self) -> Option<(String, String)> {
        self.midtrans_server_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(|key| (key.to_owned(), self.midtrans_client_key.clone()))
    }
}

/// Shipping aggregator settings. Shipping is disabled without an API key.
#[derive(Debug, Args)]
pub struct ShippingConfig {
    /// Biteship API key
    #[arg(long, env = "BITESHIP_API_KEY", hide_env_values = true)]
    pub biteship_api_key: Option<String>,

    /// Biteship API base URL
    #[arg(long, env = "BITESHIP_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub biteship_base_url: String,
}

impl ShippingConfig {
    pub(crate) fn api_key(&self) -> Option<String> {
        self.biteship_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_owned)
    }
}

/// Outbound call settings shared by every provider.
#[derive(Debug, Args)]
pub struct ProviderConfig {
    /// Per-call timeout for provider requests, in seconds
    #[arg(long, env = "PROVIDER_TIMEOUT_SECONDS", default_value_t = 15_u64)]
    pub provider_timeout_seconds: u64,
}
