//! Account Errors

use salvo::http::StatusError;
use tracing::error;

use bazaar_app::domain::accounts::AccountsServiceError;

pub(crate) fn into_status_error(error: AccountsServiceError) -> StatusError {
    match error {
        AccountsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Email is already in use")
        }
        AccountsServiceError::MissingRequiredData => {
            StatusError::bad_request().brief("Name, email, password and phone are required")
        }
        AccountsServiceError::InvalidEmail => {
            StatusError::bad_request().brief("Invalid email format")
        }
        AccountsServiceError::WeakPassword(min) => StatusError::bad_request()
            .brief(format!("Password must be at least {min} characters")),
        AccountsServiceError::InvalidCredentials => {
            StatusError::bad_request().brief("Password is incorrect")
        }
        AccountsServiceError::InvalidReference | AccountsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid account payload")
        }
        AccountsServiceError::NotFound => StatusError::not_found().brief("Account not found"),
        AccountsServiceError::Auth(source) => {
            error!("failed to process credentials: {source}");

            StatusError::internal_server_error()
        }
        AccountsServiceError::Sql(source) => {
            error!("account storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
