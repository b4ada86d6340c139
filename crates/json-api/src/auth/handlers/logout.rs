//! Logout Handler

use salvo::prelude::*;

use crate::auth::cookies::expired_session_cookie;

/// Logout Handler
///
/// Expires the session cookie.
#[endpoint(tags("auth"), summary = "Sign Out")]
pub(crate) async fn handler(res: &mut Response) -> StatusCode {
    res.add_cookie(expired_session_cookie());

    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use testresult::TestResult;

    use crate::test_helpers::session_set_cookie;

    use super::*;

    #[tokio::test]
    async fn test_logout_expires_cookie() -> TestResult {
        let service = Service::new(Router::with_path("auth/logout").post(handler));

        let res = TestClient::post("http://example.com/auth/logout")
            .send(&service)
            .await;

        let cookie = session_set_cookie(&res).ok_or("expected Set-Cookie")?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(cookie.starts_with("store_auth_token=;"), "got {cookie:?}");
        assert!(cookie.contains("Max-Age=0"), "got {cookie:?}");

        Ok(())
    }
}
