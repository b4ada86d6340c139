//! Store Settings Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use serde_json::{Map, Value};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, types::Json};

use crate::domain::settings::records::{ShippingOrigin, StoreSettings};

const GET_SETTINGS_SQL: &str = include_str!("sql/get_settings.sql");
const UPSERT_SETTINGS_SQL: &str = include_str!("sql/upsert_settings.sql");
const UPSERT_ORIGIN_SQL: &str = include_str!("sql/upsert_origin.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgSettingsRepository;

impl PgSettingsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Stored settings, or defaults when never saved.
    pub(crate) async fn get_settings(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<StoreSettings, sqlx::Error> {
        let settings = query_as::<Postgres, StoreSettings>(GET_SETTINGS_SQL)
            .fetch_optional(&mut **tx)
            .await?;

        Ok(settings.unwrap_or_default())
    }

    pub(crate) async fn save_settings(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        settings: &StoreSettings,
    ) -> Result<StoreSettings, sqlx::Error> {
        query_as::<Postgres, StoreSettings>(UPSERT_SETTINGS_SQL)
            .bind(&settings.username)
            .bind(&settings.seller_name)
            .bind(&settings.profile_picture)
            .bind(Json(&settings.brand_colors))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn save_origin(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        origin: &ShippingOrigin,
    ) -> Result<StoreSettings, sqlx::Error> {
        query_as::<Postgres, StoreSettings>(UPSERT_ORIGIN_SQL)
            .bind(&origin.area_id)
            .bind(&origin.postal_code)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for StoreSettings {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let Json(brand_colors) = row.try_get::<Json<Map<String, Value>>, _>("brand_colors")?;

        Ok(Self {
            username: row.try_get("username")?,
            seller_name: row.try_get("seller_name")?,
            profile_picture: row.try_get("profile_picture")?,
            brand_colors,
            origin_area_id: row.try_get("origin_area_id")?,
            origin_postal_code: row.try_get("origin_postal_code")?,
            updated_at: Some(row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff()),
        })
    }
}
