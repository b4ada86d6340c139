//! Authentication

mod errors;
mod password;
mod session;

pub use errors::*;
pub use password::*;
pub use session::*;
