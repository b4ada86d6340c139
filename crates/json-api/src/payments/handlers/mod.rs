//! Payment Handlers

pub(crate) mod client_key;
pub(crate) mod notification;
pub(crate) mod status;
pub(crate) mod token;
