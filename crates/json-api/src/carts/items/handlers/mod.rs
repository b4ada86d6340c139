//! Cart Item Handlers

pub(crate) mod create;
pub(crate) mod update;
