//! Product Handlers

pub(crate) mod add_image;
pub(crate) mod categories;
pub(crate) mod create;
pub(crate) mod delete;
pub(crate) mod delete_image;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod update;
pub(crate) mod upload;
