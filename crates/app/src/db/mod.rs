//! Database operations for the delivery app.
//!
//! ## Tables
//!
//! - `shop_settings` - Per-shop delivery configuration (lazily created)
//! - `blackout_dates` - One-off and recurring blackout entries
//! - `product_overrides` - Per-product values synced from metafields
//! - `delivery_day_counts` - Booked orders per (shop, date)
//! - `add_ons` - Variant-linked order add-ons
//!
//! # Migrations
//!
//! Migrations are stored in `crates/app/migrations/` and run via:
//! ```bash
//! cargo run -p delivery-date-pro-cli -- migrate
//! ```

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub mod add_ons;
pub mod blackouts;
pub mod daily_counts;
pub mod overrides;
pub mod settings;

pub use add_ons::{AddOn, AddOnRepository, AddOnUpdate, NewAddOn};
pub use blackouts::{BlackoutRepository, BlackoutRow};
pub use daily_counts::DailyCountRepository;
pub use overrides::OverrideRepository;
pub use settings::SettingsRepository;

/// Error type for repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying database failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored value no longer parses as its domain type.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// The referenced row does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
