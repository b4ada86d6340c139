//! Payments

pub mod data;
pub mod errors;
pub mod gateway;
pub mod midtrans;
pub mod reconcile;
pub mod service;

pub use errors::PaymentsServiceError;
pub use gateway::{GatewayError, MockPaymentGateway, PaymentGateway, PaymentProvider};
pub use service::*;
