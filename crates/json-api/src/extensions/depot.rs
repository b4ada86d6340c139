//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};

use bazaar_app::domain::accounts::records::AccountRecord;

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    fn insert_account(&mut self, account: AccountRecord);

    /// The signed-in account, if any.
    fn account(&self) -> Option<&AccountRecord>;

    fn account_or_401(&self) -> Result<AccountRecord, StatusError>;

    fn seller_or_403(&self) -> Result<AccountRecord, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_account(&mut self, account: AccountRecord) {
        self.inject(account);
    }

    fn account(&self) -> Option<&AccountRecord> {
        self.obtain::<AccountRecord>().ok()
    }

    fn account_or_401(&self) -> Result<AccountRecord, StatusError> {
        self.account()
            .cloned()
            .ok_or_else(|| StatusError::unauthorized().brief("Sign in first"))
    }

    fn seller_or_403(&self) -> Result<AccountRecord, StatusError> {
        let account = self.account_or_401()?;

        if account.is_seller() {
            Ok(account)
        } else {
            Err(StatusError::forbidden().brief("Seller access required"))
        }
    }
}
