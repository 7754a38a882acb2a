//! Order add-on repository.
//!
//! Add-ons are linked to a Shopify variant; selecting one in the widget adds
//! that variant to the cart, so the price shown here is informational and
//! the variant's price is what the customer pays.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use delivery_date_pro_core::ShopDomain;

use super::RepositoryError;

/// A stored add-on.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AddOn {
    pub id: Uuid,
    pub name: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    pub variant_id: String,
    pub sort_order: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating an add-on.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewAddOn {
    pub name: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    pub variant_id: String,
    #[serde(default)]
    pub sort_order: i32,
}

/// A partial add-on update with explicit optional fields.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AddOnUpdate {
    pub name: Option<String>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub price: Option<Decimal>,
    pub variant_id: Option<String>,
    pub sort_order: Option<i32>,
    pub active: Option<bool>,
}

/// Repository for order add-ons.
pub struct AddOnRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AddOnRepository<'a> {
    /// Create a new add-on repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Active add-ons for the storefront, in display order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_active(&self, shop: &ShopDomain) -> Result<Vec<AddOn>, RepositoryError> {
        let rows = sqlx::query_as(
            r"
            SELECT id, name, price, variant_id, sort_order, active, created_at
            FROM add_ons
            WHERE shop = $1 AND active = TRUE
            ORDER BY sort_order ASC, created_at ASC
            ",
        )
        .bind(shop)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// All add-ons for the admin view, in display order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self, shop: &ShopDomain) -> Result<Vec<AddOn>, RepositoryError> {
        let rows = sqlx::query_as(
            r"
            SELECT id, name, price, variant_id, sort_order, active, created_at
            FROM add_ons
            WHERE shop = $1
            ORDER BY sort_order ASC, created_at ASC
            ",
        )
        .bind(shop)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Create an add-on; new add-ons start active.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        shop: &ShopDomain,
        new: NewAddOn,
    ) -> Result<AddOn, RepositoryError> {
        let id = Uuid::new_v4();
        let row = sqlx::query_as(
            r"
            INSERT INTO add_ons (id, shop, name, price, variant_id, sort_order, active)
            VALUES ($1, $2, $3, $4, $5, $6, TRUE)
            RETURNING id, name, price, variant_id, sort_order, active, created_at
            ",
        )
        .bind(id)
        .bind(shop)
        .bind(&new.name)
        .bind(new.price)
        .bind(&new.variant_id)
        .bind(new.sort_order)
        .fetch_one(self.pool)
        .await?;

        Ok(row)
    }

    /// Apply a partial update to an add-on, scoped to the shop.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such row exists for the
    /// shop, or `Database` if the write fails.
    pub async fn update(
        &self,
        shop: &ShopDomain,
        id: Uuid,
        update: AddOnUpdate,
    ) -> Result<AddOn, RepositoryError> {
        let row: Option<AddOn> = sqlx::query_as(
            r"
            UPDATE add_ons SET
                name = COALESCE($3, name),
                price = COALESCE($4, price),
                variant_id = COALESCE($5, variant_id),
                sort_order = COALESCE($6, sort_order),
                active = COALESCE($7, active)
            WHERE shop = $1 AND id = $2
            RETURNING id, name, price, variant_id, sort_order, active, created_at
            ",
        )
        .bind(shop)
        .bind(id)
        .bind(update.name.as_deref())
        .bind(update.price)
        .bind(update.variant_id.as_deref())
        .bind(update.sort_order)
        .bind(update.active)
        .fetch_optional(self.pool)
        .await?;

        row.ok_or_else(|| RepositoryError::NotFound(format!("add-on {id}")))
    }

    /// Delete an add-on, scoped to the shop.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such row exists for the
    /// shop, or `Database` if the delete fails.
    pub async fn delete(&self, shop: &ShopDomain, id: Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM add_ons WHERE shop = $1 AND id = $2")
            .bind(shop)
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("add-on {id}")));
        }
        Ok(())
    }

    /// Remove every add-on for a shop (app uninstall cleanup).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_all(&self, shop: &ShopDomain) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM add_ons WHERE shop = $1")
            .bind(shop)
            .execute(self.pool)
            .await?;
        Ok(())
    }
}
