//! Effective parameter resolution.

use chrono_tz::Tz;

use crate::types::{CutoffTime, ProductOverride, ShopSettings};

/// The effective rule parameters for one availability or validation call.
///
/// Product override fields win over shop settings field by field; a cutoff
/// hour override replaces the parsed `HH:MM` shop cutoff. Resolved once per
/// call and shared by every per-day check, so the range scan and the
/// single-date validator always work from identical thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRules {
    /// Minutes since local midnight after which same-day ordering closes.
    pub cutoff_minutes: u32,
    /// Days past the start date the scan window extends.
    pub max_days_ahead: u32,
    /// Booked-count threshold at which a date is fully booked.
    pub daily_capacity: u32,
    /// Whether Saturday and Sunday are schedulable.
    pub allow_weekend_delivery: bool,
    /// The shop's IANA timezone.
    pub timezone: Tz,
}

impl ResolvedRules {
    /// Resolve shop settings and an optional product override.
    #[must_use]
    pub fn resolve(settings: &ShopSettings, overrides: Option<&ProductOverride>) -> Self {
        let cutoff_minutes = overrides
            .and_then(|o| o.cutoff_hours)
            .map_or_else(|| settings.cutoff_time.minutes(), |h| {
                CutoffTime::from_hour(h).minutes()
            });
        Self {
            cutoff_minutes,
            max_days_ahead: overrides
                .and_then(|o| o.max_days_ahead)
                .unwrap_or(settings.max_days_ahead),
            daily_capacity: overrides
                .and_then(|o| o.daily_capacity)
                .unwrap_or(settings.daily_capacity),
            allow_weekend_delivery: settings.allow_weekend_delivery,
            timezone: settings.timezone,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn no_override_uses_settings() {
        let settings = ShopSettings::default();
        let rules = ResolvedRules::resolve(&settings, None);
        assert_eq!(rules.cutoff_minutes, 14 * 60);
        assert_eq!(rules.max_days_ahead, 30);
        assert_eq!(rules.daily_capacity, 50);
        assert!(!rules.allow_weekend_delivery);
        assert_eq!(rules.timezone, Tz::UTC);
    }

    #[test]
    fn override_fields_win_individually() {
        let settings = ShopSettings::default();
        let overrides = ProductOverride {
            cutoff_hours: Some(10),
            daily_capacity: Some(5),
            ..ProductOverride::default()
        };
        let rules = ResolvedRules::resolve(&settings, Some(&overrides));
        assert_eq!(rules.cutoff_minutes, 10 * 60);
        assert_eq!(rules.daily_capacity, 5);
        // Unset override field falls back
        assert_eq!(rules.max_days_ahead, 30);
    }

    #[test]
    fn empty_override_changes_nothing() {
        let settings = ShopSettings::default();
        assert_eq!(
            ResolvedRules::resolve(&settings, Some(&ProductOverride::default())),
            ResolvedRules::resolve(&settings, None)
        );
    }
}
