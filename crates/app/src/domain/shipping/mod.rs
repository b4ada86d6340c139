//! Shipping

pub mod biteship;
pub mod data;
pub mod errors;
pub mod provider;
pub mod rates;
pub mod service;

pub use errors::ShippingServiceError;
pub use provider::{MockShippingProvider, ShippingProvider, ShippingProviderError};
pub use service::*;
