//! Demo data seeding.
//!
//! Writes a sensible starting configuration for a shop: weekday deliveries
//! with a 14:00 cutoff plus the usual annual holidays, so a development
//! storefront has something to render immediately.

use delivery_date_pro_core::{BlackoutDate, ShopDomain, ShopSettingsUpdate};

use delivery_date_pro_app::db::{self, BlackoutRepository, SettingsRepository};

use super::{CommandError, database_url};

const HOLIDAYS: &[(&str, &str)] = &[
    ("01-01", "New Year's Day"),
    ("12-25", "Christmas Day"),
    ("12-26", "Boxing Day"),
];

/// Seed a shop with demo settings and recurring holiday blackouts.
///
/// # Errors
///
/// Returns `CommandError` when the database is unreachable or a write
/// fails.
pub async fn run(shop: &str) -> Result<(), CommandError> {
    let database_url = database_url()?;
    let shop = ShopDomain::normalize(shop);

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!(shop = %shop, "Seeding settings...");
    let settings = SettingsRepository::new(&pool)
        .upsert(&shop, ShopSettingsUpdate::default())
        .await?;
    tracing::info!(
        cutoff = %settings.cutoff_time,
        capacity = settings.daily_capacity,
        "Settings in place"
    );

    let blackouts = BlackoutRepository::new(&pool);
    let existing = blackouts.list(&shop).await?;
    for (date, label) in HOLIDAYS {
        let date = BlackoutDate::parse(date).expect("holiday literals are valid month-days");
        if existing.iter().any(|row| row.date == date && row.recurring) {
            continue;
        }
        blackouts.add(&shop, date, true, Some(label)).await?;
        tracing::info!(%date, label, "Added recurring blackout");
    }

    tracing::info!("Seed complete!");
    Ok(())
}
