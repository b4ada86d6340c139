//! Store settings service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::settings::{
        data::SettingsUpdate,
        errors::SettingsServiceError,
        records::{ShippingOrigin, StoreSettings},
        repository::PgSettingsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgSettingsService {
    db: Db,
    repository: PgSettingsRepository,
}

impl PgSettingsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgSettingsRepository::new(),
        }
    }
}

#[async_trait]
impl SettingsService for PgSettingsService {
    async fn get_settings(&self) -> Result<StoreSettings, SettingsServiceError> {
        let mut tx = self.db.begin().await?;

        let settings = self.repository.get_settings(&mut tx).await?;

        tx.commit().await?;

        Ok(settings)
    }

    async fn update_settings(
        &self,
        update: SettingsUpdate,
    ) -> Result<StoreSettings, SettingsServiceError> {
        if update.username.as_deref().is_some_and(|u| u.trim().is_empty()) {
            return Err(SettingsServiceError::InvalidData);
        }

        let mut tx = self.db.begin().await?;

        let current = self.repository.get_settings(&mut tx).await?;

        let merged = StoreSettings {
            username: update.username.unwrap_or(current.username),
            seller_name: update.seller_name.unwrap_or(current.seller_name),
            profile_picture: update.profile_picture.unwrap_or(current.profile_picture),
            brand_colors: update.brand_colors.unwrap_or(current.brand_colors),
            ..current
        };

        let saved = self.repository.save_settings(&mut tx, &merged).await?;

        tx.commit().await?;

        Ok(saved)
    }

    async fn get_origin(&self) -> Result<ShippingOrigin, SettingsServiceError> {
        let settings = self.get_settings().await?;

        Ok(ShippingOrigin::from(&settings))
    }

    async fn update_origin(
        &self,
        origin: ShippingOrigin,
    ) -> Result<ShippingOrigin, SettingsServiceError> {
        let mut tx = self.db.begin().await?;

        let saved = self.repository.save_origin(&mut tx, &origin).await?;

        tx.commit().await?;

        Ok(ShippingOrigin::from(&saved))
    }
}

#[automock]
#[async_trait]
pub trait SettingsService: Send + Sync {
    /// Current settings, or defaults when never saved.
    async fn get_settings(&self) -> Result<StoreSettings, SettingsServiceError>;

    /// Merge and persist a partial update.
    async fn update_settings(
        &self,
        update: SettingsUpdate,
    ) -> Result<StoreSettings, SettingsServiceError>;

    /// The configured shipping origin.
    async fn get_origin(&self) -> Result<ShippingOrigin, SettingsServiceError>;

    /// Replace the shipping origin.
    async fn update_origin(
        &self,
        origin: ShippingOrigin,
    ) -> Result<ShippingOrigin, SettingsServiceError>;
}
