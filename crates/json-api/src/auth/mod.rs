//! Accounts and sessions

pub(crate) mod cookies;
pub(crate) mod errors;
mod handlers;
pub(crate) mod middleware;

pub(crate) use handlers::*;
