//! Shipping Handlers

pub(crate) mod areas;
pub(crate) mod availability;
pub(crate) mod get_origin;
pub(crate) mod rates;
pub(crate) mod shipment;
pub(crate) mod tracking;
pub(crate) mod update_origin;
