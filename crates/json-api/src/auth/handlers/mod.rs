//! Auth Handlers

pub(crate) mod change_email;
pub(crate) mod change_password;
pub(crate) mod login;
pub(crate) mod logout;
pub(crate) mod me;
pub(crate) mod register;
