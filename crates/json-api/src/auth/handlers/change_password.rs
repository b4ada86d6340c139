//! Change Password Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{auth::errors::into_status_error, extensions::*, state::State};

/// Change Password Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ChangePasswordRequest {
    #[serde(default)]
    pub current_password: String,

    #[serde(default)]
    pub new_password: String,
}

/// Change Password Handler
#[endpoint(
    tags("auth"),
    summary = "Change Password",
    responses(
        (status_code = StatusCode::OK, description = "Password changed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing, weak or incorrect password"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Not signed in"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "auth.change_password", skip_all, err)]
pub(crate) async fn handler(
    json: JsonBody<ChangePasswordRequest>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let account = depot.account_or_401()?;
    let request = json.into_inner();

    state
        .app
        .accounts
        .change_password(account.uuid, &request.current_password, &request.new_password)
        .await
        .map_err(into_status_error)?;

    tracing::info!(account_uuid = %account.uuid, "changed password");

    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use serde_json::json;
    use testresult::TestResult;

    use bazaar_app::domain::accounts::{AccountsServiceError, records::AccountRecord};

    use crate::test_helpers::{Mocks, buyer, service_as};

    use super::*;

    fn make_service(mocks: Mocks, account: Option<AccountRecord>) -> Service {
        service_as(
            mocks,
            account,
            Router::with_path("auth/change-password").post(handler),
        )
    }

    #[tokio::test]
    async fn test_change_password_success() -> TestResult {
        let account = buyer();
        let uuid = account.uuid;

        let mut mocks = Mocks::default();

        mocks
            .accounts
            .expect_change_password()
            .once()
            .withf(move |account, current, new| {
                *account == uuid && current == "password123" && new == "secret456"
            })
            .return_once(|_, _, _| Ok(()));

        let res = TestClient::post("http://example.com/auth/change-password")
            .json(&json!({ "current_password": "password123", "new_password": "secret456" }))
            .send(&make_service(mocks, Some(account)))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_change_password_requires_session() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.accounts.expect_change_password().never();

        let res = TestClient::post("http://example.com/auth/change-password")
            .json(&json!({ "current_password": "password123", "new_password": "secret456" }))
            .send(&make_service(mocks, None))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_short_password_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .accounts
            .expect_change_password()
            .once()
            .return_once(|_, _, _| Err(AccountsServiceError::WeakPassword(6)));

        let res = TestClient::post("http://example.com/auth/change-password")
            .json(&json!({ "current_password": "password123", "new_password": "abc" }))
            .send(&make_service(mocks, Some(buyer())))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_wrong_current_password_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .accounts
            .expect_change_password()
            .once()
            .return_once(|_, _, _| Err(AccountsServiceError::InvalidCredentials));

        let res = TestClient::post("http://example.com/auth/change-password")
            .json(&json!({ "current_password": "nope", "new_password": "secret456" }))
            .send(&make_service(mocks, Some(buyer())))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
