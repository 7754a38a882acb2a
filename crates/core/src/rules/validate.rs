//! Checkout-time re-validation of a single date.

use chrono::{DateTime, Utc};

use crate::types::{BlackoutEntry, DateValidation, DeliveryDate, ExclusionReason};

use super::availability::day_exclusion;
use super::capacity::CapacityLookup;
use super::clock::{days_between, local_date, minutes_since_midnight};
use super::resolve::ResolvedRules;

/// Re-check a customer-submitted date against the full rule set.
///
/// Runs at order time to reject stale or tampered selections. The checks
/// run in a fixed order, which decides the single reported reason when a
/// date violates several rules at once:
///
/// 1. today + past cutoff
/// 2. blackout
/// 3. weekend (when disabled)
/// 4. capacity
/// 5. range bounds (beyond the window, or in the past)
///
/// Steps 2-4 are [`day_exclusion`], the same evaluator the range scan uses,
/// so a date the engine lists as available always validates and vice versa.
/// The range bounds exist only here: the scan never proposes an
/// out-of-window date, but a checkout payload can claim one. The upper
/// bound covers the same window the engine scans: past the cutoff the scan
/// starts tomorrow, so the last scanned date sits one day beyond
/// `today + max_days_ahead` and must still validate.
pub fn validate_date<C: CapacityLookup>(
    rules: &ResolvedRules,
    candidate: DeliveryDate,
    now: DateTime<Utc>,
    blackouts: &[BlackoutEntry],
    capacity: &C,
) -> DateValidation {
    let tz = rules.timezone;
    let today = local_date(now, tz);
    let minutes_now = minutes_since_midnight(now, tz);
    let past_cutoff = minutes_now >= rules.cutoff_minutes;

    if candidate == today && past_cutoff {
        return DateValidation::rejected(ExclusionReason::CutoffPassed);
    }

    if let Some(reason) = day_exclusion(candidate, rules, blackouts, capacity) {
        return DateValidation::rejected(reason);
    }

    let days_diff = days_between(today, candidate);
    let window_end = i64::from(rules.max_days_ahead) + i64::from(past_cutoff);
    if days_diff > window_end {
        return DateValidation::rejected(ExclusionReason::BeyondMaxDays);
    }
    if days_diff < 0 {
        return DateValidation::rejected(ExclusionReason::InPast);
    }

    DateValidation::ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use crate::types::{BlackoutDate, ShopSettings};

    use super::super::availability::compute_availability;
    use super::*;

    fn date(s: &str) -> DeliveryDate {
        DeliveryDate::parse(s).unwrap()
    }

    fn instant(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn rules(settings: &ShopSettings) -> ResolvedRules {
        ResolvedRules::resolve(settings, None)
    }

    fn no_counts() -> BTreeMap<DeliveryDate, u32> {
        BTreeMap::new()
    }

    #[test]
    fn accepts_open_weekday_in_window() {
        let settings = ShopSettings::default();
        let verdict = validate_date(
            &rules(&settings),
            date("2024-06-05"),
            instant("2024-06-03T10:00:00Z"),
            &[],
            &no_counts(),
        );
        assert_eq!(verdict, DateValidation::ok());
    }

    #[test]
    fn rejects_today_after_cutoff() {
        let settings = ShopSettings::default();
        let verdict = validate_date(
            &rules(&settings),
            date("2024-06-03"),
            instant("2024-06-03T15:00:00Z"),
            &[],
            &no_counts(),
        );
        assert_eq!(
            verdict,
            DateValidation::rejected(ExclusionReason::CutoffPassed)
        );
    }

    #[test]
    fn accepts_today_before_cutoff() {
        let settings = ShopSettings::default();
        let verdict = validate_date(
            &rules(&settings),
            date("2024-06-03"),
            instant("2024-06-03T13:59:00Z"),
            &[],
            &no_counts(),
        );
        assert_eq!(verdict, DateValidation::ok());
    }

    #[test]
    fn rejects_blackout() {
        let settings = ShopSettings::default();
        let blackouts = [BlackoutEntry::one_off(date("2024-06-05"))];
        let verdict = validate_date(
            &rules(&settings),
            date("2024-06-05"),
            instant("2024-06-03T10:00:00Z"),
            &blackouts,
            &no_counts(),
        );
        assert_eq!(verdict, DateValidation::rejected(ExclusionReason::Blackout));
    }

    #[test]
    fn rejects_weekend_when_disabled() {
        let settings = ShopSettings::default();
        let verdict = validate_date(
            &rules(&settings),
            date("2024-06-08"),
            instant("2024-06-03T10:00:00Z"),
            &[],
            &no_counts(),
        );
        assert_eq!(
            verdict,
            DateValidation::rejected(ExclusionReason::WeekendDisabled)
        );
    }

    #[test]
    fn rejects_fully_booked() {
        let settings = ShopSettings {
            daily_capacity: 2,
            ..ShopSettings::default()
        };
        let counts = BTreeMap::from([(date("2024-06-05"), 2)]);
        let verdict = validate_date(
            &rules(&settings),
            date("2024-06-05"),
            instant("2024-06-03T10:00:00Z"),
            &[],
            &counts,
        );
        assert_eq!(
            verdict,
            DateValidation::rejected(ExclusionReason::FullyBooked)
        );
    }

    #[test]
    fn rejects_beyond_window() {
        // days ahead = 5 > allowed 3; weekends enabled so the range rule is
        // the one that fires for the Saturday candidate
        let settings = ShopSettings {
            max_days_ahead: 3,
            allow_weekend_delivery: true,
            ..ShopSettings::default()
        };
        let verdict = validate_date(
            &rules(&settings),
            date("2024-06-08"),
            instant("2024-06-03T10:00:00Z"),
            &[],
            &no_counts(),
        );
        assert_eq!(
            verdict,
            DateValidation::rejected(ExclusionReason::BeyondMaxDays)
        );
    }

    #[test]
    fn past_cutoff_window_extends_one_day() {
        // After the cutoff the scan runs tomorrow..=tomorrow+max, so the
        // last offered date is today+max+1 and must still validate
        let settings = ShopSettings {
            max_days_ahead: 3,
            ..ShopSettings::default()
        };
        let now = instant("2024-06-03T15:00:00Z");
        let verdict = validate_date(&rules(&settings), date("2024-06-07"), now, &[], &no_counts());
        assert_eq!(verdict, DateValidation::ok());

        let verdict = validate_date(&rules(&settings), date("2024-06-10"), now, &[], &no_counts());
        assert_eq!(
            verdict,
            DateValidation::rejected(ExclusionReason::BeyondMaxDays)
        );
    }

    #[test]
    fn rejects_past_dates() {
        let settings = ShopSettings {
            allow_weekend_delivery: true,
            ..ShopSettings::default()
        };
        let verdict = validate_date(
            &rules(&settings),
            date("2024-06-01"),
            instant("2024-06-03T10:00:00Z"),
            &[],
            &no_counts(),
        );
        assert_eq!(verdict, DateValidation::rejected(ExclusionReason::InPast));
    }

    #[test]
    fn precedence_blackout_before_weekend_before_range() {
        // A blacked-out Saturday beyond the window reports the blackout
        let settings = ShopSettings {
            max_days_ahead: 3,
            ..ShopSettings::default()
        };
        let blackouts = [BlackoutEntry::annual(BlackoutDate::parse("06-08").unwrap())];
        let verdict = validate_date(
            &rules(&settings),
            date("2024-06-08"),
            instant("2024-06-03T10:00:00Z"),
            &blackouts,
            &no_counts(),
        );
        assert_eq!(verdict, DateValidation::rejected(ExclusionReason::Blackout));
    }

    #[test]
    fn validator_agrees_with_engine_across_the_window() {
        // Consistency: every verdict the engine produces must be reproduced
        // by the validator, reason included, for the same snapshot
        let settings = ShopSettings {
            daily_capacity: 1,
            max_days_ahead: 9,
            ..ShopSettings::default()
        };
        let rules = rules(&settings);
        let blackouts = [
            BlackoutEntry::one_off(date("2024-06-05")),
            BlackoutEntry::annual(BlackoutDate::parse("06-07").unwrap()),
        ];
        let counts = BTreeMap::from([(date("2024-06-06"), 1)]);

        for now in ["2024-06-03T10:00:00Z", "2024-06-03T15:00:00Z"] {
            let now = instant(now);
            let result = compute_availability(&rules, now, &blackouts, &counts);

            for d in &result.available_dates {
                let verdict = validate_date(&rules, *d, now, &blackouts, &counts);
                assert!(verdict.valid, "engine listed {d} but validator rejected");
            }
            for (d, reason) in &result.excluded_reasons {
                let verdict = validate_date(&rules, *d, now, &blackouts, &counts);
                assert_eq!(
                    verdict.reason,
                    Some(*reason),
                    "engine and validator disagree on {d}"
                );
            }
        }
    }
}
