//! Booked-count repository: the persistence side of the capacity gate.

use std::collections::BTreeMap;

use sqlx::PgPool;

use delivery_date_pro_core::{DeliveryDate, ShopDomain};

use super::RepositoryError;

/// Repository for per-date booked counts.
pub struct DailyCountRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DailyCountRepository<'a> {
    /// Create a new daily count repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Current booked count for a date, zero when no row exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_for(
        &self,
        shop: &ShopDomain,
        date: DeliveryDate,
    ) -> Result<u32, RepositoryError> {
        let count: Option<i32> =
            sqlx::query_scalar("SELECT count FROM delivery_day_counts WHERE shop = $1 AND date = $2")
                .bind(shop)
                .bind(date)
                .fetch_optional(self.pool)
                .await?;

        Ok(count.map_or(0, |c| u32::try_from(c).unwrap_or(0)))
    }

    /// Booked counts for every date in `[start, end]`, in one query.
    ///
    /// The availability scan consults counts once per candidate date;
    /// prefetching the window keeps that a map lookup instead of a query
    /// per day. Dates stored as `YYYY-MM-DD` text compare in calendar
    /// order, so a lexicographic range is a date range.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn counts_between(
        &self,
        shop: &ShopDomain,
        start: DeliveryDate,
        end: DeliveryDate,
    ) -> Result<BTreeMap<DeliveryDate, u32>, RepositoryError> {
        let rows: Vec<(String, i32)> = sqlx::query_as(
            r"
            SELECT date, count FROM delivery_day_counts
            WHERE shop = $1 AND date >= $2 AND date <= $3
            ",
        )
        .bind(shop)
        .bind(start)
        .bind(end)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(|(date, count)| {
                let date = DeliveryDate::parse(&date).map_err(|e| {
                    RepositoryError::DataCorruption(format!("invalid count date in database: {e}"))
                })?;
                Ok((date, u32::try_from(count).unwrap_or(0)))
            })
            .collect()
    }

    /// Atomically create-or-increment the counter for a (shop, date) pair.
    ///
    /// Concurrent calls for the same key serialize inside the database; each
    /// call adds exactly one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the write fails.
    pub async fn increment(
        &self,
        shop: &ShopDomain,
        date: DeliveryDate,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO delivery_day_counts (shop, date, count)
            VALUES ($1, $2, 1)
            ON CONFLICT (shop, date) DO UPDATE
                SET count = delivery_day_counts.count + 1
            ",
        )
        .bind(shop)
        .bind(date)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Remove every count row for a shop (app uninstall cleanup).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_all(&self, shop: &ShopDomain) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM delivery_day_counts WHERE shop = $1")
            .bind(shop)
            .execute(self.pool)
            .await?;
        Ok(())
    }
}
