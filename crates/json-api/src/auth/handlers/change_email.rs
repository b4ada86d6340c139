//! Change Email Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    auth::{errors::into_status_error, me::UserResponse},
    extensions::*,
    state::State,
};

/// Change Email Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ChangeEmailRequest {
    #[serde(default)]
    pub new_email: String,

    #[serde(default)]
    pub password: String,
}

/// Change Email Handler
#[endpoint(
    tags("auth"),
    summary = "Change Email",
    responses(
        (status_code = StatusCode::OK, description = "Email changed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid email or password"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Not signed in"),
        (status_code = StatusCode::CONFLICT, description = "Email already in use"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "auth.change_email", skip_all, err)]
pub(crate) async fn handler(
    json: JsonBody<ChangeEmailRequest>,
    depot: &mut Depot,
) -> Result<Json<UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let account = depot.account_or_401()?;
    let request = json.into_inner();

    let account = state
        .app
        .accounts
        .change_email(account.uuid, &request.new_email, &request.password)
        .await
        .map_err(into_status_error)?;

    tracing::info!(account_uuid = %account.uuid, "changed email");

    Ok(Json(account.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use bazaar_app::domain::accounts::AccountsServiceError;

    use crate::test_helpers::{Mocks, buyer, service_as};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        service_as(
            mocks,
            Some(buyer()),
            Router::with_path("auth/change-email").post(handler),
        )
    }

    #[tokio::test]
    async fn test_change_email_returns_updated_account() -> TestResult {
        let mut updated = buyer();

        updated.email = "baru@example.com".to_string();

        let mut mocks = Mocks::default();

        mocks
            .accounts
            .expect_change_email()
            .once()
            .withf(|_, email, password| email == "Baru@Example.com" && password == "password123")
            .return_once(move |_, _, _| Ok(updated));

        let response: UserResponse = TestClient::post("http://example.com/auth/change-email")
            .json(&json!({ "new_email": "Baru@Example.com", "password": "password123" }))
            .send(&make_service(mocks))
            .await
            .take_json()
            .await?;

        let user = response.user.ok_or("expected a user")?;

        assert_eq!(user.email, "baru@example.com");

        Ok(())
    }

    #[tokio::test]
    async fn test_taken_email_returns_409() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .accounts
            .expect_change_email()
            .once()
            .return_once(|_, _, _| Err(AccountsServiceError::AlreadyExists));

        let res = TestClient::post("http://example.com/auth/change-email")
            .json(&json!({ "new_email": "toko@example.com", "password": "password123" }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_email_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .accounts
            .expect_change_email()
            .once()
            .return_once(|_, _, _| Err(AccountsServiceError::InvalidEmail));

        let res = TestClient::post("http://example.com/auth/change-email")
            .json(&json!({ "new_email": "not-an-email", "password": "password123" }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
