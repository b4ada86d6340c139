//! Login Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use bazaar_app::domain::accounts::AccountsServiceError;

use crate::{
    auth::{cookies::session_cookie, errors::into_status_error, me::UserResponse},
    extensions::*,
    state::State,
};

/// Login Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LoginRequest {
    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub password: String,
}

/// Login Handler
#[endpoint(
    tags("auth"),
    summary = "Sign In",
    responses(
        (status_code = StatusCode::OK, description = "Signed in"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid email or password"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "auth.login", skip_all, err)]
pub(crate) async fn handler(
    json: JsonBody<LoginRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let account = state
        .app
        .accounts
        .authenticate(&request.email, &request.password)
        .await
        .map_err(|error| match error {
            AccountsServiceError::InvalidCredentials | AccountsServiceError::NotFound => {
                StatusError::unauthorized().brief("Invalid email or password")
            }
            other => into_status_error(other),
        })?;

    let token = state
        .app
        .sessions
        .issue(account.uuid)
        .or_500("failed to issue session token")?;

    res.add_cookie(session_cookie(token));

    Ok(Json(account.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, buyer, service_as, session_keys, session_set_cookie};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        service_as(mocks, None, Router::with_path("auth/login").post(handler))
    }

    #[tokio::test]
    async fn test_login_issues_verifiable_session() -> TestResult {
        let account = buyer();
        let uuid = account.uuid;

        let mut mocks = Mocks::default();

        mocks
            .accounts
            .expect_authenticate()
            .once()
            .withf(|email, password| email == "ana@example.com" && password == "password123")
            .return_once(move |_, _| Ok(account));

        let res = TestClient::post("http://example.com/auth/login")
            .json(&json!({ "email": "ana@example.com", "password": "password123" }))
            .send(&make_service(mocks))
            .await;

        let cookie = session_set_cookie(&res).unwrap_or_default();

        let token = cookie
            .strip_prefix("store_auth_token=")
            .and_then(|rest| rest.split(';').next())
            .ok_or("expected session cookie")?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(session_keys().verify(token)?, uuid);

        Ok(())
    }

    #[tokio::test]
    async fn test_login_wrong_password_returns_401() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .accounts
            .expect_authenticate()
            .once()
            .return_once(|_, _| Err(AccountsServiceError::InvalidCredentials));

        let mut res = TestClient::post("http://example.com/auth/login")
            .json(&json!({ "email": "ana@example.com", "password": "wrong" }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
        assert!(session_set_cookie(&res).is_none(), "no cookie on failure");
        assert!(res.take_string().await?.contains("Invalid email or password"));

        Ok(())
    }
}
