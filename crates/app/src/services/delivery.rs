//! Delivery availability orchestration.
//!
//! Assembles the per-call snapshot (settings, blackout entries, booked
//! counts) the rules engine consumes, resolves product overrides through
//! the in-process cache, and enforces the product-disabled guard that the
//! engine itself never sees.

use chrono::{DateTime, Utc};
use tracing::instrument;

use delivery_date_pro_core::{
    AvailabilityResult, BlackoutEntry, DateValidation, DeliveryDate, ProductId, ProductOverride,
    ResolvedRules, ShopDomain, add_calendar_days, compute_availability, local_date, validate_date,
};

use crate::db::{BlackoutRepository, DailyCountRepository, OverrideRepository, SettingsRepository};
use crate::error::Result;
use crate::state::AppState;

/// Availability as the storefront sees it for one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductAvailability {
    /// The date picker is disabled for this product.
    Disabled,
    /// The scanned window.
    Ready(AvailabilityResult),
}

/// Orchestrates availability, validation, and order recording.
pub struct DeliveryService<'a> {
    state: &'a AppState,
}

impl<'a> DeliveryService<'a> {
    /// Create a new delivery service.
    #[must_use]
    pub const fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Product overrides, via the in-process cache.
    ///
    /// A cached `None` records "no override row", so unconfigured products
    /// skip the database on repeat requests too.
    async fn overrides_for(
        &self,
        shop: &ShopDomain,
        product_id: Option<&ProductId>,
    ) -> Result<Option<ProductOverride>> {
        let Some(product_id) = product_id else {
            return Ok(None);
        };

        let key = (shop.clone(), product_id.clone());
        if let Some(cached) = self.state.override_cache().get(&key).await {
            return Ok(cached);
        }

        let fetched = OverrideRepository::new(self.state.pool())
            .get(shop, product_id)
            .await?;
        self.state.override_cache().insert(key, fetched).await;
        Ok(fetched)
    }

    /// Compute the upcoming availability window for a shop and optional
    /// product.
    ///
    /// Settings and blackout entries are fetched once and treated as a
    /// consistent snapshot; booked counts for the whole scan window are
    /// prefetched in a single query. A product whose override disables the
    /// feature short-circuits to [`ProductAvailability::Disabled`] without
    /// invoking the engine.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` when any snapshot read fails.
    #[instrument(skip(self), fields(shop = %shop))]
    pub async fn availability(
        &self,
        shop: &ShopDomain,
        product_id: Option<&ProductId>,
        now: DateTime<Utc>,
    ) -> Result<ProductAvailability> {
        let overrides = self.overrides_for(shop, product_id).await?;
        if overrides.is_some_and(|o| o.is_disabled()) {
            return Ok(ProductAvailability::Disabled);
        }

        let settings_repo = SettingsRepository::new(self.state.pool());
        let blackout_repo = BlackoutRepository::new(self.state.pool());
        let (settings, blackouts) = tokio::try_join!(
            settings_repo.get_or_default(shop),
            blackout_repo.list(shop),
        )?;
        let entries: Vec<BlackoutEntry> = blackouts.iter().map(|b| b.to_entry()).collect();

        let rules = ResolvedRules::resolve(&settings, overrides.as_ref());

        // Prefetch counts for the widest window the scan can touch: past
        // the cutoff the start date shifts to tomorrow, so the last
        // scanned day is today + max_days_ahead + 1.
        let today = local_date(now, rules.timezone);
        let window_end = add_calendar_days(
            today,
            i64::from(rules.max_days_ahead) + 1,
            rules.timezone,
        );
        let counts = DailyCountRepository::new(self.state.pool())
            .counts_between(shop, today, window_end)
            .await?;

        Ok(ProductAvailability::Ready(compute_availability(
            &rules, now, &entries, &counts,
        )))
    }

    /// Re-validate a customer-submitted date with the same rule set.
    ///
    /// Overrides supply thresholds here exactly as they do for the range
    /// scan; the `enabled` flag is not consulted, since an order for the
    /// product is already in flight.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` when any snapshot read fails.
    #[instrument(skip(self), fields(shop = %shop, date = %candidate))]
    pub async fn validate(
        &self,
        shop: &ShopDomain,
        candidate: DeliveryDate,
        product_id: Option<&ProductId>,
        now: DateTime<Utc>,
    ) -> Result<DateValidation> {
        let overrides = self.overrides_for(shop, product_id).await?;

        let settings_repo = SettingsRepository::new(self.state.pool());
        let blackout_repo = BlackoutRepository::new(self.state.pool());
        let (settings, blackouts) = tokio::try_join!(
            settings_repo.get_or_default(shop),
            blackout_repo.list(shop),
        )?;
        let entries: Vec<BlackoutEntry> = blackouts.iter().map(|b| b.to_entry()).collect();

        let rules = ResolvedRules::resolve(&settings, overrides.as_ref());

        let count = DailyCountRepository::new(self.state.pool())
            .count_for(shop, candidate)
            .await?;
        let counts = std::collections::BTreeMap::from([(candidate, count)]);

        Ok(validate_date(&rules, candidate, now, &entries, &counts))
    }

    /// Record an order's delivery date against the capacity counter.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` when the increment fails.
    #[instrument(skip(self), fields(shop = %shop, date = %date))]
    pub async fn record_order(&self, shop: &ShopDomain, date: DeliveryDate) -> Result<()> {
        DailyCountRepository::new(self.state.pool())
            .increment(shop, date)
            .await?;
        Ok(())
    }

    /// Drop everything stored for a shop (app uninstall).
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` when any delete fails.
    #[instrument(skip(self), fields(shop = %shop))]
    pub async fn purge_shop(&self, shop: &ShopDomain) -> Result<()> {
        let pool = self.state.pool();
        SettingsRepository::new(pool).delete(shop).await?;
        BlackoutRepository::new(pool).delete_all(shop).await?;
        OverrideRepository::new(pool).delete_all(shop).await?;
        DailyCountRepository::new(pool).delete_all(shop).await?;
        crate::db::AddOnRepository::new(pool).delete_all(shop).await?;

        // Cached overrides for the shop are now stale; the cache has no
        // per-shop index, so drop it wholesale. Uninstalls are rare.
        self.state.override_cache().invalidate_all();
        Ok(())
    }
}
