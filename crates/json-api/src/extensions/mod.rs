//! Extension traits

mod depot;
mod result;
mod upstream;

pub(crate) use depot::DepotExt as _;
pub(crate) use result::ResultExt as _;
pub(crate) use upstream::upstream_status_error;
