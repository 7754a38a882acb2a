//! Timezone-aware calendar arithmetic.
//!
//! Everything here is pure given its inputs: the caller supplies the current
//! instant, so tests can pin "now" anywhere they like. Calendar-day
//! arithmetic anchors at the date's local midpoint and reinterprets the
//! shifted instant in the shop's zone, instead of shifting a midnight-based
//! instant by raw milliseconds; noon sits far enough from both midnights
//! that no daylight-saving shift can move the result onto a neighboring
//! day.

use chrono::{DateTime, Datelike, NaiveTime, TimeZone, Timelike, Utc, Weekday};
use chrono_tz::Tz;

use crate::types::DeliveryDate;

/// The date's local noon as an instant in the shop's zone.
///
/// DST transitions happen in the small hours, so local noon is never
/// skipped or ambiguous; the UTC fallback is unreachable for real zones
/// but keeps the function total.
fn local_noon(date: DeliveryDate, tz: Tz) -> DateTime<Tz> {
    let noon = NaiveTime::from_hms_opt(12, 0, 0).expect("12:00:00 is a valid wall-clock time");
    let naive = date.as_naive().and_time(noon);
    tz.from_local_datetime(&naive)
        .earliest()
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive).with_timezone(&tz))
}

/// The shop-local calendar date containing `instant`.
#[must_use]
pub fn local_date(instant: DateTime<Utc>, tz: Tz) -> DeliveryDate {
    DeliveryDate::new(instant.with_timezone(&tz).date_naive())
}

/// Shop-local wall-clock minute of day, in `[0, 1439]`.
#[must_use]
pub fn minutes_since_midnight(instant: DateTime<Utc>, tz: Tz) -> u32 {
    let local = instant.with_timezone(&tz).time();
    local.hour() * 60 + local.minute()
}

/// Advance `date` by exactly `days` local calendar days.
///
/// Exact across daylight-saving transitions: the anchor starts at local
/// noon, and alternating transitions keep the shifted instant within an
/// hour of noon however many boundaries the span crosses.
#[must_use]
pub fn add_calendar_days(date: DeliveryDate, days: i64, tz: Tz) -> DeliveryDate {
    let shifted = local_noon(date, tz) + chrono::Duration::days(days);
    DeliveryDate::new(shifted.date_naive())
}

/// True iff the date's local weekday is Saturday or Sunday.
#[must_use]
pub fn is_weekend(date: DeliveryDate, tz: Tz) -> bool {
    matches!(
        local_noon(date, tz).weekday(),
        Weekday::Sat | Weekday::Sun
    )
}

/// Whole calendar days from `from` to `to` (negative when `to` is earlier).
#[must_use]
pub fn days_between(from: DeliveryDate, to: DeliveryDate) -> i64 {
    to.as_naive().signed_duration_since(from.as_naive()).num_days()
}
