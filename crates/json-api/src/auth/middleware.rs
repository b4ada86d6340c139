//! Session middleware.

use std::sync::Arc;

use salvo::{http::header::AUTHORIZATION, prelude::*};
use tracing::{debug, error};

use bazaar_app::{auth::SESSION_COOKIE, domain::accounts::AccountsServiceError};

use crate::{extensions::*, state::State};

/// Resolve the session cookie (or a bearer token) to an account and put it
/// in the depot. Requests without a valid session continue anonymously;
/// handlers decide whether they need one.
#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(token) = session_token(req) else {
        ctrl.call_next(req, depot, res).await;

        return;
    };

    let state = match depot.obtain::<Arc<State>>() {
        Ok(state) => Arc::clone(state),
        Err(_error) => {
            res.render(StatusError::internal_server_error());

            return;
        }
    };

    let account = match state.app.sessions.verify(&token) {
        Ok(account) => account,
        Err(source) => {
            debug!("ignoring session token: {source}");

            ctrl.call_next(req, depot, res).await;

            return;
        }
    };

    match state.app.accounts.get_account(account).await {
        Ok(account) => depot.insert_account(account),
        Err(AccountsServiceError::NotFound) => {
            debug!(account_uuid = %account, "session refers to a missing account");
        }
        Err(source) => {
            error!("failed to load session account: {source}");

            res.render(StatusError::internal_server_error());

            return;
        }
    }

    ctrl.call_next(req, depot, res).await;
}

fn session_token(req: &Request) -> Option<String> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE)
        && !cookie.value().is_empty()
    {
        return Some(cookie.value().to_owned());
    }

    extract_bearer_token(req).map(str::to_owned)
}

fn extract_bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.splitn(2, ' ');

    let scheme = parts.next()?;
    let token = parts.next()?.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}
