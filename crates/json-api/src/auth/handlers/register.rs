//! Register Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use bazaar_app::domain::accounts::data::NewAccount;

use crate::{
    auth::{cookies::session_cookie, errors::into_status_error, me::UserResponse},
    extensions::*,
    state::State,
};

/// Register Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RegisterRequest {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub password: String,

    #[serde(default)]
    pub phone: String,

    pub address: Option<String>,

    pub city: Option<String>,

    pub province: Option<String>,

    pub postal_code: Option<String>,
}

impl From<RegisterRequest> for NewAccount {
    fn from(request: RegisterRequest) -> Self {
        NewAccount {
            name: request.name,
            email: request.email,
            password: request.password,
            phone: request.phone,
            address: request.address,
            city: request.city,
            province: request.province,
            postal_code: request.postal_code,
            area_id: None,
        }
    }
}

/// Register Handler
///
/// Creates a buyer account and signs it in.
#[endpoint(
    tags("auth"),
    summary = "Register",
    responses(
        (status_code = StatusCode::OK, description = "Account created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::CONFLICT, description = "Email already in use"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "auth.register", skip_all, err)]
pub(crate) async fn handler(
    json: JsonBody<RegisterRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let account = state
        .app
        .accounts
        .register(json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    let token = state
        .app
        .sessions
        .issue(account.uuid)
        .or_500("failed to issue session token")?;

    res.add_cookie(session_cookie(token));

    tracing::info!(account_uuid = %account.uuid, "registered account");

    Ok(Json(account.into()))
}
