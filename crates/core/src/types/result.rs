//! Engine and validator outcomes.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Serialize, Serializer};

use super::date::DeliveryDate;

/// Why a date failed availability.
///
/// Exactly one reason is attached per excluded date, chosen by the fixed
/// rule precedence. The `Display` strings are the wire format consumed by
/// the storefront widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExclusionReason {
    /// Same-day ordering has closed.
    CutoffPassed,
    /// A one-off or recurring blackout entry matches.
    Blackout,
    /// The date is a Saturday or Sunday and weekends are disabled.
    WeekendDisabled,
    /// The booked count has reached the daily capacity.
    FullyBooked,
    /// The date lies past the maximum scheduling window.
    BeyondMaxDays,
    /// The date is before today.
    InPast,
}

impl ExclusionReason {
    /// The human-readable reason string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CutoffPassed => "Ordering window closed for today",
            Self::Blackout => "Blackout date",
            Self::WeekendDisabled => "Weekend delivery disabled",
            Self::FullyBooked => "This date is fully booked",
            Self::BeyondMaxDays => "Date is beyond the maximum allowed days ahead",
            Self::InPast => "Date is in the past",
        }
    }
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ExclusionReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// The result of a range scan.
///
/// Every date in the scanned window appears in exactly one of
/// `available_dates` / `excluded_dates`; `next_valid_date` is the earliest
/// available date when any exists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResult {
    /// Dates open for scheduling, in scan order (earliest first).
    pub available_dates: Vec<DeliveryDate>,
    /// Dates refused by some rule.
    pub excluded_dates: BTreeSet<DeliveryDate>,
    /// The earliest available date, if the window contains one.
    pub next_valid_date: Option<DeliveryDate>,
    /// One reason per excluded date.
    pub excluded_reasons: BTreeMap<DeliveryDate, ExclusionReason>,
}

/// The verdict on a single customer-submitted date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateValidation {
    /// Whether the date may be scheduled.
    pub valid: bool,
    /// The single rejection reason when invalid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<ExclusionReason>,
}

impl DateValidation {
    /// An accepting verdict.
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    /// A rejecting verdict with its reason.
    #[must_use]
    pub const fn rejected(reason: ExclusionReason) -> Self {
        Self {
            valid: false,
            reason: Some(reason),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn reason_strings_are_stable() {
        assert_eq!(
            ExclusionReason::CutoffPassed.to_string(),
            "Ordering window closed for today"
        );
        assert_eq!(ExclusionReason::Blackout.to_string(), "Blackout date");
        assert_eq!(
            ExclusionReason::WeekendDisabled.to_string(),
            "Weekend delivery disabled"
        );
        assert_eq!(
            ExclusionReason::FullyBooked.to_string(),
            "This date is fully booked"
        );
        assert_eq!(
            ExclusionReason::BeyondMaxDays.to_string(),
            "Date is beyond the maximum allowed days ahead"
        );
        assert_eq!(ExclusionReason::InPast.to_string(), "Date is in the past");
    }

    #[test]
    fn validation_serializes_without_reason_when_valid() {
        let json = serde_json::to_string(&DateValidation::ok()).unwrap();
        assert_eq!(json, r#"{"valid":true}"#);

        let json =
            serde_json::to_string(&DateValidation::rejected(ExclusionReason::Blackout)).unwrap();
        assert_eq!(json, r#"{"valid":false,"reason":"Blackout date"}"#);
    }

    #[test]
    fn result_serializes_reasons_as_date_keyed_map() {
        let mut result = AvailabilityResult::default();
        let date = DeliveryDate::parse("2024-06-08").unwrap();
        result.excluded_dates.insert(date);
        result
            .excluded_reasons
            .insert(date, ExclusionReason::WeekendDisabled);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json["excludedReasons"]["2024-06-08"],
            "Weekend delivery disabled"
        );
        assert_eq!(json["nextValidDate"], serde_json::Value::Null);
        assert_eq!(json["excludedDates"][0], "2024-06-08");
    }
}
