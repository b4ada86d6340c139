//! Update Settings Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use bazaar_app::domain::settings::data::SettingsUpdate;

use crate::{
    extensions::*,
    settings::{errors::into_status_error, get::SettingsResponse},
    state::State,
};

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateSettingsRequest {
    pub username: Option<String>,

    pub seller_name: Option<String>,

    pub profile_picture: Option<String>,

    #[salvo(schema(value_type = Option<Object>))]
    pub brand_colors: Option<Map<String, Value>>,
}

impl From<UpdateSettingsRequest> for SettingsUpdate {
    fn from(request: UpdateSettingsRequest) -> Self {
        SettingsUpdate {
            username: request.username,
            seller_name: request.seller_name,
            profile_picture: request.profile_picture,
            brand_colors: request.brand_colors,
        }
    }
}

/// Update Settings Handler
#[endpoint(
    tags("settings"),
    summary = "Update Store Settings",
    responses(
        (status_code = StatusCode::OK, description = "Settings saved"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::FORBIDDEN, description = "Seller access required"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "settings.update", skip_all, err)]
pub(crate) async fn handler(
    json: JsonBody<UpdateSettingsRequest>,
    depot: &mut Depot,
) -> Result<Json<SettingsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.seller_or_403()?;

    let settings = state
        .app
        .settings
        .update_settings(json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(settings.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use bazaar_app::domain::settings::{SettingsServiceError, records::StoreSettings};

    use crate::test_helpers::{Mocks, buyer, seller, service_as};

    use super::*;

    #[tokio::test]
    async fn test_update_settings_forwards_partial_update() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .settings
            .expect_update_settings()
            .once()
            .withf(|update| {
                update.seller_name.as_deref() == Some("Toko Ana")
                    && update.username.is_none()
                    && update
                        .brand_colors
                        .as_ref()
                        .is_some_and(|colors| colors.contains_key("primary"))
            })
            .return_once(|_| {
                Ok(StoreSettings {
                    seller_name: "Toko Ana".to_string(),
                    ..StoreSettings::default()
                })
            });

        let service = service_as(mocks, Some(seller()), Router::with_path("settings").put(handler));

        let mut res = TestClient::put("http://example.com/settings")
            .json(&json!({ "seller_name": "Toko Ana", "brand_colors": { "primary": "#ff5500" } }))
            .send(&service)
            .await;

        let body: SettingsResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.seller_name, "Toko Ana");

        Ok(())
    }

    #[tokio::test]
    async fn test_blank_username_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .settings
            .expect_update_settings()
            .once()
            .return_once(|_| Err(SettingsServiceError::InvalidData));

        let service = service_as(mocks, Some(seller()), Router::with_path("settings").put(handler));

        let res = TestClient::put("http://example.com/settings")
            .json(&json!({ "username": " " }))
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_buyer_cannot_update_settings() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.settings.expect_update_settings().never();

        let service = service_as(mocks, Some(buyer()), Router::with_path("settings").put(handler));

        let res = TestClient::put("http://example.com/settings")
            .json(&json!({ "seller_name": "Toko" }))
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
