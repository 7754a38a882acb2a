//! Blackout date repository.

use sqlx::PgPool;
use uuid::Uuid;

use delivery_date_pro_core::{BlackoutDate, BlackoutEntry, ShopDomain};

use super::RepositoryError;

/// A stored blackout entry, including its row identity.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BlackoutRow {
    pub id: Uuid,
    pub date: BlackoutDate,
    pub recurring: bool,
    pub label: Option<String>,
}

impl BlackoutRow {
    /// The matcher's view of this row.
    #[must_use]
    pub fn to_entry(&self) -> BlackoutEntry {
        BlackoutEntry {
            date: self.date,
            recurring: self.recurring,
            label: self.label.clone(),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RawBlackoutRow {
    id: Uuid,
    date: String,
    recurring: bool,
    label: Option<String>,
}

impl RawBlackoutRow {
    fn into_row(self) -> Result<BlackoutRow, RepositoryError> {
        let date = BlackoutDate::parse(&self.date).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid blackout date in database: {e}"))
        })?;
        Ok(BlackoutRow {
            id: self.id,
            date,
            recurring: self.recurring,
            label: self.label,
        })
    }
}

/// Repository for blackout dates.
pub struct BlackoutRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BlackoutRepository<'a> {
    /// Create a new blackout repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All blackout entries for a shop, earliest date string first.
    ///
    /// The table is shop-curated and small; callers scan it linearly per
    /// date check.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `DataCorruption` if a stored date no longer parses.
    pub async fn list(&self, shop: &ShopDomain) -> Result<Vec<BlackoutRow>, RepositoryError> {
        let rows: Vec<RawBlackoutRow> = sqlx::query_as(
            r"
            SELECT id, date, recurring, label
            FROM blackout_dates
            WHERE shop = $1
            ORDER BY date ASC
            ",
        )
        .bind(shop)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(RawBlackoutRow::into_row).collect()
    }

    /// Add a blackout entry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn add(
        &self,
        shop: &ShopDomain,
        date: BlackoutDate,
        recurring: bool,
        label: Option<&str>,
    ) -> Result<BlackoutRow, RepositoryError> {
        let id = Uuid::new_v4();
        sqlx::query(
            r"
            INSERT INTO blackout_dates (id, shop, date, recurring, label)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(id)
        .bind(shop)
        .bind(date)
        .bind(recurring)
        .bind(label)
        .execute(self.pool)
        .await?;

        Ok(BlackoutRow {
            id,
            date,
            recurring,
            label: label.map(str::to_owned),
        })
    }

    /// Remove a blackout entry by id, scoped to the shop.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such row exists for the
    /// shop, or `Database` if the delete fails.
    pub async fn remove(&self, shop: &ShopDomain, id: Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM blackout_dates WHERE shop = $1 AND id = $2")
            .bind(shop)
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("blackout {id}")));
        }
        Ok(())
    }

    /// Remove every blackout entry for a shop (app uninstall cleanup).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_all(&self, shop: &ShopDomain) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM blackout_dates WHERE shop = $1")
            .bind(shop)
            .execute(self.pool)
            .await?;
        Ok(())
    }
}
