//! Shop-level delivery settings.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::cutoff::CutoffTime;

/// Per-shop delivery configuration.
///
/// One row per shop; created lazily. When a shop has never saved settings,
/// [`ShopSettings::default`] supplies the documented defaults (cutoff 14:00,
/// capacity 50, 30 days ahead, weekends disabled, UTC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopSettings {
    /// Local time after which same-day ordering closes.
    pub cutoff_time: CutoffTime,
    /// Maximum orders per calendar date before it is fully booked.
    pub daily_capacity: u32,
    /// How many days past the start date customers may schedule.
    pub max_days_ahead: u32,
    /// Whether Saturday and Sunday deliveries are offered.
    pub allow_weekend_delivery: bool,
    /// IANA timezone the shop operates in.
    pub timezone: Tz,
    /// Whether the storefront widget also renders on the cart page.
    pub show_on_cart_page: bool,
}

impl Default for ShopSettings {
    fn default() -> Self {
        Self {
            cutoff_time: CutoffTime::default(),
            daily_capacity: 50,
            max_days_ahead: 30,
            allow_weekend_delivery: false,
            timezone: Tz::UTC,
            show_on_cart_page: false,
        }
    }
}

impl ShopSettings {
    /// Apply a partial update, keeping current values for absent fields.
    #[must_use]
    pub fn apply(mut self, update: ShopSettingsUpdate) -> Self {
        if let Some(v) = update.cutoff_time {
            self.cutoff_time = v;
        }
        if let Some(v) = update.daily_capacity {
            self.daily_capacity = v;
        }
        if let Some(v) = update.max_days_ahead {
            self.max_days_ahead = v;
        }
        if let Some(v) = update.allow_weekend_delivery {
            self.allow_weekend_delivery = v;
        }
        if let Some(v) = update.timezone {
            self.timezone = v;
        }
        if let Some(v) = update.show_on_cart_page {
            self.show_on_cart_page = v;
        }
        self
    }
}

/// A partial settings update with explicit optional fields.
///
/// Validated at the route boundary; fields left unset keep the stored value
/// (or the default when no row exists yet).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ShopSettingsUpdate {
    pub cutoff_time: Option<CutoffTime>,
    pub daily_capacity: Option<u32>,
    pub max_days_ahead: Option<u32>,
    pub allow_weekend_delivery: Option<bool>,
    pub timezone: Option<Tz>,
    pub show_on_cart_page: Option<bool>,
}
