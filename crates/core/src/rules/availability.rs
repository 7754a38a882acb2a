//! The day-by-day range scan.

use chrono::{DateTime, Utc};

use crate::types::{AvailabilityResult, BlackoutEntry, DeliveryDate, ExclusionReason};

use super::blackout;
use super::capacity::CapacityLookup;
use super::clock::{add_calendar_days, is_weekend, local_date, minutes_since_midnight};
use super::resolve::ResolvedRules;

/// The shared per-day rule evaluator.
///
/// Applies the fixed precedence blackout → weekend → capacity and returns
/// the first matching exclusion, or `None` when the date is open. Both the
/// range scan and the single-date validator call this; it is the single
/// place a day's verdict is decided.
pub fn day_exclusion<C: CapacityLookup>(
    date: DeliveryDate,
    rules: &ResolvedRules,
    blackouts: &[BlackoutEntry],
    capacity: &C,
) -> Option<ExclusionReason> {
    if blackout::is_blacked_out(date, blackouts) {
        return Some(ExclusionReason::Blackout);
    }
    if !rules.allow_weekend_delivery && is_weekend(date, rules.timezone) {
        return Some(ExclusionReason::WeekendDisabled);
    }
    if capacity.count_for(date) >= rules.daily_capacity {
        return Some(ExclusionReason::FullyBooked);
    }
    None
}

/// Scan the upcoming window and partition it into available and excluded
/// dates.
///
/// The scan covers `max_days_ahead + 1` consecutive local calendar days.
/// Before the cutoff it starts today; after, it starts tomorrow and today is
/// recorded as excluded with the cutoff reason. Each excluded date carries
/// exactly one reason, and `next_valid_date` is the first available date in
/// scan order.
pub fn compute_availability<C: CapacityLookup>(
    rules: &ResolvedRules,
    now: DateTime<Utc>,
    blackouts: &[BlackoutEntry],
    capacity: &C,
) -> AvailabilityResult {
    let tz = rules.timezone;
    let today = local_date(now, tz);
    let minutes_now = minutes_since_midnight(now, tz);

    let mut result = AvailabilityResult::default();

    let start = if minutes_now >= rules.cutoff_minutes {
        result.excluded_dates.insert(today);
        result
            .excluded_reasons
            .insert(today, ExclusionReason::CutoffPassed);
        add_calendar_days(today, 1, tz)
    } else {
        today
    };

    let mut current = start;
    for _ in 0..=rules.max_days_ahead {
        match day_exclusion(current, rules, blackouts, capacity) {
            Some(reason) => {
                result.excluded_dates.insert(current);
                result.excluded_reasons.insert(current, reason);
            }
            None => {
                if result.next_valid_date.is_none() {
                    result.next_valid_date = Some(current);
                }
                result.available_dates.push(current);
            }
        }
        current = add_calendar_days(current, 1, tz);
    }

    result
}
