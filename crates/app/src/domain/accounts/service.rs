//! Accounts service.

use std::sync::LazyLock;

use async_trait::async_trait;
use mockall::automock;
use regex::Regex;

use crate::{
    auth::{hash_password, verify_password},
    database::Db,
    domain::accounts::{
        data::NewAccount,
        errors::AccountsServiceError,
        records::{AccountRecord, AccountUuid, Role},
        repository::{AccountInsert, PgAccountsRepository},
    },
};

/// Minimum length for a changed password.
pub const MIN_PASSWORD_LENGTH: usize = 6;

static EMAIL_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").ok()
});

/// Trim and lowercase an email address.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Whether an (already normalised) email address looks deliverable.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(email))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone)]
pub struct PgAccountsService {
    db: Db,
    repository: PgAccountsRepository,
}

impl PgAccountsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgAccountsRepository::new(),
        }
    }

    async fn create_with_role(
        &self,
        account: NewAccount,
        role: Role,
    ) -> Result<AccountRecord, AccountsServiceError> {
        let email = normalize_email(&account.email);
        let name = account.name.trim();
        let phone = account.phone.trim();

        if name.is_empty() || email.is_empty() || account.password.is_empty() || phone.is_empty() {
            return Err(AccountsServiceError::MissingRequiredData);
        }

        if !is_valid_email(&email) {
            return Err(AccountsServiceError::InvalidEmail);
        }

        let password_hash = hash_password(&account.password)?;

        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_account(
                &mut tx,
                AccountInsert {
                    uuid: AccountUuid::new(),
                    email: &email,
                    name,
                    phone: Some(phone),
                    address: non_empty(account.address.as_deref()),
                    city: non_empty(account.city.as_deref()),
                    province: non_empty(account.province.as_deref()),
                    postal_code: non_empty(account.postal_code.as_deref()),
                    area_id: non_empty(account.area_id.as_deref()),
                    password_hash: &password_hash,
                    role,
                },
            )
            .await?;

        tx.commit().await?;

        Ok(created)
    }
}

#[async_trait]
impl AccountsService for PgAccountsService {
    async fn register(&self, account: NewAccount) -> Result<AccountRecord, AccountsServiceError> {
        self.create_with_role(account, Role::Buyer).await
    }

    async fn create_seller(
        &self,
        account: NewAccount,
    ) -> Result<AccountRecord, AccountsServiceError> {
        self.create_with_role(account, Role::Seller).await
    }

    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AccountRecord, AccountsServiceError> {
        let email = normalize_email(email);

        let mut tx = self.db.begin().await?;

        let credentials = self.repository.find_credentials(&mut tx, &email).await?;

        tx.commit().await?;

        match credentials {
            Some(credentials) if verify_password(password, &credentials.password_hash) => {
                Ok(credentials.account)
            }
            _ => Err(AccountsServiceError::InvalidCredentials),
        }
    }

    async fn get_account(&self, account: AccountUuid) -> Result<AccountRecord, AccountsServiceError> {
        let mut tx = self.db.begin().await?;

        let account = self.repository.get_account(&mut tx, account).await?;

        tx.commit().await?;

        Ok(account)
    }

    async fn change_password(
        &self,
        account: AccountUuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AccountsServiceError> {
        if current_password.is_empty() || new_password.is_empty() {
            return Err(AccountsServiceError::MissingRequiredData);
        }

        if new_password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AccountsServiceError::WeakPassword(MIN_PASSWORD_LENGTH));
        }

        let mut tx = self.db.begin().await?;

        let stored = self.repository.get_password_hash(&mut tx, account).await?;

        if !verify_password(current_password, &stored) {
            return Err(AccountsServiceError::InvalidCredentials);
        }

        let password_hash = hash_password(new_password)?;

        let rows_affected = self
            .repository
            .update_password(&mut tx, account, &password_hash)
            .await?;

        if rows_affected == 0 {
            return Err(AccountsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn change_email(
        &self,
        account: AccountUuid,
        new_email: &str,
        password: &str,
    ) -> Result<AccountRecord, AccountsServiceError> {
        let email = normalize_email(new_email);

        if email.is_empty() || password.is_empty() {
            return Err(AccountsServiceError::MissingRequiredData);
        }

        if !is_valid_email(&email) {
            return Err(AccountsServiceError::InvalidEmail);
        }

        let mut tx = self.db.begin().await?;

        let current = self.repository.get_account(&mut tx, account).await?;
        let stored = self.repository.get_password_hash(&mut tx, account).await?;

        if !verify_password(password, &stored) {
            return Err(AccountsServiceError::InvalidCredentials);
        }

        if current.email == email {
            return Err(AccountsServiceError::InvalidData);
        }

        if self.repository.email_taken(&mut tx, &email, account).await? {
            return Err(AccountsServiceError::AlreadyExists);
        }

        let updated = self.repository.update_email(&mut tx, account, &email).await?;

        tx.commit().await?;

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait AccountsService: Send + Sync {
    /// Register a buyer account.
    async fn register(&self, account: NewAccount) -> Result<AccountRecord, AccountsServiceError>;

    /// Provision a seller account.
    async fn create_seller(&self, account: NewAccount)
    -> Result<AccountRecord, AccountsServiceError>;

    /// Check an email and password pair, returning the matching account.
    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AccountRecord, AccountsServiceError>;

    /// Retrieve a single account.
    async fn get_account(&self, account: AccountUuid) -> Result<AccountRecord, AccountsServiceError>;

    /// Replace the password after verifying the current one.
    async fn change_password(
        &self,
        account: AccountUuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AccountsServiceError>;

    /// Replace the login email after verifying the password.
    async fn change_email(
        &self,
        account: AccountUuid,
        new_email: &str,
        password: &str,
    ) -> Result<AccountRecord, AccountsServiceError>;
}
