//! Mapping of third-party provider failures to HTTP errors.

use salvo::{http::StatusCode, prelude::StatusError};

/// Relay the provider's status when it is a client or server error,
/// otherwise answer 502. Provider 401/403 mean our credentials were refused
/// and also answer 502, keeping those codes for the caller's own session.
pub(crate) fn upstream_status_error(status: Option<u16>, detail: &str) -> StatusError {
    status
        .and_then(|code| StatusCode::from_u16(code).ok())
        .filter(|code| code.is_client_error() || code.is_server_error())
        .filter(|code| !matches!(*code, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN))
        .and_then(StatusError::from_code)
        .unwrap_or_else(StatusError::bad_gateway)
        .brief(detail)
}
