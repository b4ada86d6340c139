//! Accounts Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use crate::domain::accounts::records::{AccountRecord, AccountUuid, Role};

const CREATE_ACCOUNT_SQL: &str = include_str!("sql/create_account.sql");
const GET_ACCOUNT_SQL: &str = include_str!("sql/get_account.sql");
const FIND_CREDENTIALS_SQL: &str = include_str!("sql/find_credentials.sql");
const GET_PASSWORD_HASH_SQL: &str = include_str!("sql/get_password_hash.sql");
const UPDATE_PASSWORD_SQL: &str = include_str!("sql/update_password.sql");
const UPDATE_EMAIL_SQL: &str = include_str!("sql/update_email.sql");
const EMAIL_TAKEN_SQL: &str = include_str!("sql/email_taken.sql");

/// Validated, normalised account row ready for insertion.
#[derive(Debug)]
pub(crate) struct AccountInsert<'a> {
    pub uuid: AccountUuid,
    pub email: &'a str,
    pub name: &'a str,
    pub phone: Option<&'a str>,
    pub address: Option<&'a str>,
    pub city: Option<&'a str>,
    pub province: Option<&'a str>,
    pub postal_code: Option<&'a str>,
    pub area_id: Option<&'a str>,
    pub password_hash: &'a str,
    pub role: Role,
}

#[derive(Debug)]
pub(crate) struct AccountCredentials {
    pub account: AccountRecord,
    pub password_hash: String,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgAccountsRepository;

impl PgAccountsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_account(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: AccountInsert<'_>,
    ) -> Result<AccountRecord, sqlx::Error> {
        query_as::<Postgres, AccountRecord>(CREATE_ACCOUNT_SQL)
            .bind(account.uuid.into_uuid())
            .bind(account.email)
            .bind(account.name)
            .bind(account.phone)
            .bind(account.address)
            .bind(account.city)
            .bind(account.province)
            .bind(account.postal_code)
            .bind(account.area_id)
            .bind(account.password_hash)
            .bind(account.role.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_account(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: AccountUuid,
    ) -> Result<AccountRecord, sqlx::Error> {
        query_as::<Postgres, AccountRecord>(GET_ACCOUNT_SQL)
            .bind(account.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find_credentials(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        email: &str,
    ) -> Result<Option<AccountCredentials>, sqlx::Error> {
        query_as::<Postgres, AccountCredentials>(FIND_CREDENTIALS_SQL)
            .bind(email)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn get_password_hash(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: AccountUuid,
    ) -> Result<String, sqlx::Error> {
        query_scalar::<Postgres, String>(GET_PASSWORD_HASH_SQL)
            .bind(account.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_password(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: AccountUuid,
        password_hash: &str,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(UPDATE_PASSWORD_SQL)
            .bind(account.into_uuid())
            .bind(password_hash)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn update_email(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: AccountUuid,
        email: &str,
    ) -> Result<AccountRecord, sqlx::Error> {
        query_as::<Postgres, AccountRecord>(UPDATE_EMAIL_SQL)
            .bind(account.into_uuid())
            .bind(email)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn email_taken(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        email: &str,
        except: AccountUuid,
    ) -> Result<bool, sqlx::Error> {
        query_scalar::<Postgres, bool>(EMAIL_TAKEN_SQL)
            .bind(email)
            .bind(except.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for AccountRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let role: String = row.try_get("role")?;

        let role = role.parse::<Role>().map_err(|e| sqlx::Error::ColumnDecode {
            index: "role".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            uuid: AccountUuid::from_uuid(row.try_get("uuid")?),
            email: row.try_get("email")?,
            name: row.try_get("name")?,
            phone: row.try_get("phone")?,
            address: row.try_get("address")?,
            city: row.try_get("city")?,
            province: row.try_get("province")?,
            postal_code: row.try_get("postal_code")?,
            area_id: row.try_get("area_id")?,
            role,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for AccountCredentials {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            account: AccountRecord::from_row(row)?,
            password_hash: row.try_get("password_hash")?,
        })
    }
}
