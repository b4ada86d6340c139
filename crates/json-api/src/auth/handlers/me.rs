//! Current Account Handler

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar_app::domain::accounts::records::AccountRecord;

use crate::extensions::*;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct AccountResponse {
    /// The unique identifier of the account
    pub uuid: Uuid,

    pub email: String,

    pub name: String,

    /// `buyer` or `seller`
    pub role: String,

    pub phone: Option<String>,

    pub address: Option<String>,

    pub city: Option<String>,

    pub province: Option<String>,

    pub postal_code: Option<String>,
}

impl From<AccountRecord> for AccountResponse {
    fn from(account: AccountRecord) -> Self {
        AccountResponse {
            uuid: account.uuid.into(),
            email: account.email,
            name: account.name,
            role: account.role.to_string(),
            phone: account.phone,
            address: account.address,
            city: account.city,
            province: account.province,
            postal_code: account.postal_code,
        }
    }
}

/// Account envelope; `user` is null for anonymous callers.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UserResponse {
    pub user: Option<AccountResponse>,
}

impl From<AccountRecord> for UserResponse {
    fn from(account: AccountRecord) -> Self {
        UserResponse {
            user: Some(account.into()),
        }
    }
}

/// Current Account Handler
///
/// Returns the signed-in account, or a null user.
#[endpoint(tags("auth"), summary = "Current Account")]
pub(crate) async fn handler(depot: &mut Depot) -> Json<UserResponse> {
    Json(UserResponse {
        user: depot.account().cloned().map(Into::into),
    })
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, buyer, service_as};

    use super::*;

    fn make_service(account: Option<AccountRecord>) -> Service {
        service_as(
            Mocks::default(),
            account,
            Router::with_path("auth/me").get(handler),
        )
    }

    #[tokio::test]
    async fn test_me_returns_signed_in_account() -> TestResult {
        let account = buyer();

        let response: UserResponse = TestClient::get("http://example.com/auth/me")
            .send(&make_service(Some(account.clone())))
            .await
            .take_json()
            .await?;

        let user = response.user.ok_or("expected a user")?;

        assert_eq!(user.uuid, account.uuid.into_uuid());
        assert_eq!(user.role, "buyer");

        Ok(())
    }

    #[tokio::test]
    async fn test_me_without_session_returns_null_user() -> TestResult {
        let response: UserResponse = TestClient::get("http://example.com/auth/me")
            .send(&make_service(None))
            .await
            .take_json()
            .await?;

        assert!(response.user.is_none(), "expected null user");

        Ok(())
    }
}
