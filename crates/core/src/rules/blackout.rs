//! Blackout date matching.

use crate::types::{BlackoutDate, BlackoutEntry, DeliveryDate};

/// Whether any blackout entry excludes `date`.
///
/// Non-recurring entries match on the exact calendar date; recurring entries
/// match on the month-day component regardless of year. A non-recurring
/// entry stored as a bare month-day can never match. Entry order is
/// irrelevant; the first match short-circuits.
#[must_use]
pub fn is_blacked_out(date: DeliveryDate, entries: &[BlackoutEntry]) -> bool {
    let month_day = date.month_day();
    entries.iter().any(|entry| {
        if entry.recurring {
            entry.date.month_day() == month_day
        } else {
            matches!(entry.date, BlackoutDate::Full(full) if full == date)
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn date(s: &str) -> DeliveryDate {
        DeliveryDate::parse(s).unwrap()
    }

    fn one_off(s: &str) -> BlackoutEntry {
        BlackoutEntry::one_off(date(s))
    }

    fn annual(s: &str) -> BlackoutEntry {
        BlackoutEntry::annual(BlackoutDate::parse(s).unwrap())
    }

    #[test]
    fn empty_list_matches_nothing() {
        assert!(!is_blacked_out(date("2024-06-03"), &[]));
    }

    #[test]
    fn one_off_matches_exact_date_only() {
        let entries = [one_off("2024-06-05")];
        assert!(is_blacked_out(date("2024-06-05"), &entries));
        assert!(!is_blacked_out(date("2024-06-06"), &entries));
        assert!(!is_blacked_out(date("2025-06-05"), &entries));
    }

    #[test]
    fn recurring_matches_every_year() {
        // Stored with a year, but the year is ignored
        let entries = [annual("2020-12-25")];
        assert!(is_blacked_out(date("2024-12-25"), &entries));
        assert!(is_blacked_out(date("2031-12-25"), &entries));
        assert!(!is_blacked_out(date("2024-12-24"), &entries));
    }

    #[test]
    fn recurring_matches_bare_month_day_form() {
        let entries = [annual("12-25")];
        assert!(is_blacked_out(date("2024-12-25"), &entries));
        assert!(is_blacked_out(date("1999-12-25"), &entries));
    }

    #[test]
    fn non_recurring_month_day_never_matches() {
        let entries = [BlackoutEntry {
            date: BlackoutDate::parse("12-25").unwrap(),
            recurring: false,
            label: None,
        }];
        assert!(!is_blacked_out(date("2024-12-25"), &entries));
    }

    #[test]
    fn leap_day_recurring_fires_only_in_leap_years() {
        // Known edge: matching is literal month-day equality, so a Feb 29
        // entry matches nothing in a non-leap year (Feb 28 and Mar 1 both
        // pass) and matches Feb 29 in leap years.
        let entries = [annual("2024-02-29")];
        assert!(is_blacked_out(date("2028-02-29"), &entries));
        assert!(!is_blacked_out(date("2025-02-28"), &entries));
        assert!(!is_blacked_out(date("2025-03-01"), &entries));
    }

    #[test]
    fn any_entry_in_list_can_match() {
        let entries = [one_off("2024-06-05"), annual("01-01"), one_off("2024-07-04")];
        assert!(is_blacked_out(date("2024-07-04"), &entries));
        assert!(is_blacked_out(date("2030-01-01"), &entries));
        assert!(!is_blacked_out(date("2024-06-06"), &entries));
    }
}
