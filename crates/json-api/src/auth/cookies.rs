//! Session cookie helpers.

use salvo::http::cookie::{Cookie, SameSite, time::Duration};

use bazaar_app::auth::{SESSION_COOKIE, SESSION_TTL_DAYS};

/// The session cookie carrying a freshly issued token.
pub(crate) fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::days(SESSION_TTL_DAYS))
        .build()
}

/// A cookie that makes the browser drop the session.
pub(crate) fn expired_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::ZERO)
        .build()
}
