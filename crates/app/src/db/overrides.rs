//! Product override repository.
//!
//! Rows mirror the product's `delivery.*` metafields and are kept current by
//! the products/update webhook. Reads go through the in-process cache in
//! [`crate::state::AppState`]; this repository is the backing store.

use sqlx::PgPool;

use delivery_date_pro_core::{ProductId, ProductOverride, ShopDomain};

use super::RepositoryError;

#[derive(Debug, sqlx::FromRow)]
struct OverrideRow {
    enabled: Option<bool>,
    cutoff_hours: Option<i16>,
    max_days_ahead: Option<i32>,
    daily_capacity: Option<i32>,
}

impl OverrideRow {
    fn into_override(self) -> Result<ProductOverride, RepositoryError> {
        Ok(ProductOverride {
            enabled: self.enabled,
            cutoff_hours: self
                .cutoff_hours
                .map(|h| {
                    u8::try_from(h).map_err(|_| {
                        RepositoryError::DataCorruption(format!(
                            "cutoff_hours out of range in database: {h}"
                        ))
                    })
                })
                .transpose()?,
            max_days_ahead: self
                .max_days_ahead
                .map(|d| opt_u32_from_db(d, "max_days_ahead"))
                .transpose()?,
            daily_capacity: self
                .daily_capacity
                .map(|c| opt_u32_from_db(c, "daily_capacity"))
                .transpose()?,
        })
    }
}

fn opt_u32_from_db(value: i32, column: &str) -> Result<u32, RepositoryError> {
    u32::try_from(value).map_err(|_| {
        RepositoryError::DataCorruption(format!("negative {column} in database: {value}"))
    })
}

/// Repository for product delivery overrides.
pub struct OverrideRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OverrideRepository<'a> {
    /// Create a new override repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the stored override for a product, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `DataCorruption` if a stored value is out of range.
    pub async fn get(
        &self,
        shop: &ShopDomain,
        product_id: &ProductId,
    ) -> Result<Option<ProductOverride>, RepositoryError> {
        let row: Option<OverrideRow> = sqlx::query_as(
            r"
            SELECT enabled, cutoff_hours, max_days_ahead, daily_capacity
            FROM product_overrides
            WHERE shop = $1 AND product_id = $2
            ",
        )
        .bind(shop)
        .bind(product_id)
        .fetch_optional(self.pool)
        .await?;

        row.map(OverrideRow::into_override).transpose()
    }

    /// Replace a product's override row with freshly decoded metafields.
    ///
    /// The webhook payload carries the product's full metafield state, so
    /// this is a whole-row upsert rather than a field-wise patch.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the write fails.
    pub async fn upsert(
        &self,
        shop: &ShopDomain,
        product_id: &ProductId,
        overrides: ProductOverride,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO product_overrides
                (shop, product_id, enabled, cutoff_hours, max_days_ahead, daily_capacity)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (shop, product_id) DO UPDATE SET
                enabled = $3,
                cutoff_hours = $4,
                max_days_ahead = $5,
                daily_capacity = $6,
                updated_at = NOW()
            ",
        )
        .bind(shop)
        .bind(product_id)
        .bind(overrides.enabled)
        .bind(overrides.cutoff_hours.map(i16::from))
        .bind(overrides.max_days_ahead.map(i64::from))
        .bind(overrides.daily_capacity.map(i64::from))
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Remove every override row for a shop (app uninstall cleanup).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_all(&self, shop: &ShopDomain) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM product_overrides WHERE shop = $1")
            .bind(shop)
            .execute(self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn row_preserves_three_state_enabled() {
        for enabled in [None, Some(true), Some(false)] {
            let row = OverrideRow {
                enabled,
                cutoff_hours: None,
                max_days_ahead: None,
                daily_capacity: None,
            };
            assert_eq!(row.into_override().unwrap().enabled, enabled);
        }
    }

    #[test]
    fn out_of_range_cutoff_hours_is_corruption() {
        let row = OverrideRow {
            enabled: None,
            cutoff_hours: Some(-1),
            max_days_ahead: None,
            daily_capacity: None,
        };
        assert!(matches!(
            row.into_override().unwrap_err(),
            RepositoryError::DataCorruption(_)
        ));
    }
}
