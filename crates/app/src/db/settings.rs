//! Shop settings repository.
//!
//! Settings rows are created lazily: a shop that has never saved anything
//! gets the documented defaults from [`ShopSettings::default`] on read, and
//! its first update writes a full row coalesced over those defaults.

use chrono_tz::Tz;
use sqlx::PgPool;

use delivery_date_pro_core::{CutoffTime, ShopDomain, ShopSettings, ShopSettingsUpdate};

use super::RepositoryError;

#[derive(Debug, sqlx::FromRow)]
struct SettingsRow {
    cutoff_time: String,
    daily_capacity: i32,
    max_days_ahead: i32,
    allow_weekend_delivery: bool,
    timezone: String,
    show_on_cart_page: bool,
}

impl SettingsRow {
    fn into_settings(self) -> Result<ShopSettings, RepositoryError> {
        let cutoff_time = CutoffTime::parse(&self.cutoff_time).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid cutoff time in database: {e}"))
        })?;
        let timezone = self.timezone.parse::<Tz>().map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "invalid timezone in database: {}",
                self.timezone
            ))
        })?;
        Ok(ShopSettings {
            cutoff_time,
            daily_capacity: u32_from_db(self.daily_capacity, "daily_capacity")?,
            max_days_ahead: u32_from_db(self.max_days_ahead, "max_days_ahead")?,
            allow_weekend_delivery: self.allow_weekend_delivery,
            timezone,
            show_on_cart_page: self.show_on_cart_page,
        })
    }
}

fn u32_from_db(value: i32, column: &str) -> Result<u32, RepositoryError> {
    u32::try_from(value).map_err(|_| {
        RepositoryError::DataCorruption(format!("negative {column} in database: {value}"))
    })
}

/// Repository for shop settings.
pub struct SettingsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SettingsRepository<'a> {
    /// Create a new settings repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a shop's stored settings, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `DataCorruption` if a stored value no longer parses.
    pub async fn get(&self, shop: &ShopDomain) -> Result<Option<ShopSettings>, RepositoryError> {
        let row: Option<SettingsRow> = sqlx::query_as(
            r"
            SELECT cutoff_time, daily_capacity, max_days_ahead,
                   allow_weekend_delivery, timezone, show_on_cart_page
            FROM shop_settings
            WHERE shop = $1
            ",
        )
        .bind(shop)
        .fetch_optional(self.pool)
        .await?;

        row.map(SettingsRow::into_settings).transpose()
    }

    /// A shop's effective settings: the stored row or the defaults.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the read fails.
    pub async fn get_or_default(&self, shop: &ShopDomain) -> Result<ShopSettings, RepositoryError> {
        Ok(self.get(shop).await?.unwrap_or_default())
    }

    /// Apply a partial update, creating the row if absent.
    ///
    /// Absent fields keep the stored value, or the default when the shop has
    /// no row yet. Returns the effective settings after the write.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the write fails.
    pub async fn upsert(
        &self,
        shop: &ShopDomain,
        update: ShopSettingsUpdate,
    ) -> Result<ShopSettings, RepositoryError> {
        let merged = self.get_or_default(shop).await?.apply(update);

        sqlx::query(
            r"
            INSERT INTO shop_settings
                (shop, cutoff_time, daily_capacity, max_days_ahead,
                 allow_weekend_delivery, timezone, show_on_cart_page)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (shop) DO UPDATE SET
                cutoff_time = $2,
                daily_capacity = $3,
                max_days_ahead = $4,
                allow_weekend_delivery = $5,
                timezone = $6,
                show_on_cart_page = $7,
                updated_at = NOW()
            ",
        )
        .bind(shop)
        .bind(merged.cutoff_time.to_string())
        .bind(i64::from(merged.daily_capacity))
        .bind(i64::from(merged.max_days_ahead))
        .bind(merged.allow_weekend_delivery)
        .bind(merged.timezone.name())
        .bind(merged.show_on_cart_page)
        .execute(self.pool)
        .await?;

        Ok(merged)
    }

    /// Remove a shop's settings row (app uninstall cleanup).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, shop: &ShopDomain) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM shop_settings WHERE shop = $1")
            .bind(shop)
            .execute(self.pool)
            .await?;
        Ok(())
    }
}
