//! Calendar dates as they appear on the wire.
//!
//! Delivery dates are always exchanged as `YYYY-MM-DD` strings interpreted in
//! the shop's configured timezone. The wrapper parses strictly at the
//! boundary so the rules engine never sees a malformed date.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Error parsing a calendar date or month-day string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateParseError {
    /// Not a valid `YYYY-MM-DD` calendar date.
    #[error("invalid calendar date (expected YYYY-MM-DD): {0}")]
    InvalidDate(String),

    /// Not a valid `MM-DD` month-day.
    #[error("invalid month-day (expected MM-DD): {0}")]
    InvalidMonthDay(String),
}

/// A calendar date in the shop's timezone.
///
/// Serializes as a `YYYY-MM-DD` string, which is also the storage and wire
/// format. Ordering is calendar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeliveryDate(NaiveDate);

impl DeliveryDate {
    /// Wrap an existing calendar date.
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Parse a strict `YYYY-MM-DD` string.
    ///
    /// # Errors
    ///
    /// Returns `DateParseError::InvalidDate` if the string is not a real
    /// calendar date in that format.
    pub fn parse(s: &str) -> Result<Self, DateParseError> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self)
            .map_err(|_| DateParseError::InvalidDate(s.to_owned()))
    }

    /// The underlying `chrono` date.
    #[must_use]
    pub const fn as_naive(&self) -> NaiveDate {
        self.0
    }

    /// The month-day component, used for recurring blackout matching.
    #[must_use]
    pub fn month_day(&self) -> MonthDay {
        MonthDay {
            month: self.0.month(),
            day: self.0.day(),
        }
    }
}

impl fmt::Display for DeliveryDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for DeliveryDate {
    type Err = DateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<NaiveDate> for DeliveryDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl Serialize for DeliveryDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DeliveryDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for DeliveryDate {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for DeliveryDate {
    fn decode(
        value: sqlx::postgres::PgValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::parse(&s)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for DeliveryDate {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.to_string(), buf)
    }
}

/// A year-independent month-day pair, e.g. `12-25`.
///
/// Recurring blackout entries match on this component alone. Matching is
/// literal: a stored `02-29` matches Feb 29 and therefore only fires in leap
/// years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthDay {
    month: u32,
    day: u32,
}

impl MonthDay {
    /// Parse a strict `MM-DD` string.
    ///
    /// The day is range-checked against 1-31 but not against the month's
    /// actual length; matching is by literal equality.
    ///
    /// # Errors
    ///
    /// Returns `DateParseError::InvalidMonthDay` for anything else.
    pub fn parse(s: &str) -> Result<Self, DateParseError> {
        let err = || DateParseError::InvalidMonthDay(s.to_owned());
        let (m, d) = s.split_once('-').ok_or_else(err)?;
        if m.len() != 2 || d.len() != 2 {
            return Err(err());
        }
        let month: u32 = m.parse().map_err(|_| err())?;
        let day: u32 = d.parse().map_err(|_| err())?;
        if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return Err(err());
        }
        Ok(Self { month, day })
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_date() {
        let d = DeliveryDate::parse("2024-06-03").unwrap();
        assert_eq!(d.to_string(), "2024-06-03");
    }

    #[test]
    fn rejects_malformed_dates() {
        assert!(DeliveryDate::parse("2024-6-3").is_err());
        assert!(DeliveryDate::parse("2024-13-01").is_err());
        assert!(DeliveryDate::parse("2024-02-30").is_err());
        assert!(DeliveryDate::parse("not-a-date").is_err());
        assert!(DeliveryDate::parse("").is_err());
    }

    #[test]
    fn leap_day_parses_only_in_leap_years() {
        assert!(DeliveryDate::parse("2024-02-29").is_ok());
        assert!(DeliveryDate::parse("2023-02-29").is_err());
    }

    #[test]
    fn month_day_component() {
        let d = DeliveryDate::parse("2024-12-25").unwrap();
        assert_eq!(d.month_day(), MonthDay::parse("12-25").unwrap());
    }

    #[test]
    fn month_day_rejects_out_of_range() {
        assert!(MonthDay::parse("00-10").is_err());
        assert!(MonthDay::parse("13-01").is_err());
        assert!(MonthDay::parse("12-32").is_err());
        assert!(MonthDay::parse("1-05").is_err());
    }

    #[test]
    fn serde_round_trip_as_string() {
        let d = DeliveryDate::parse("2024-06-03").unwrap();
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, "\"2024-06-03\"");
        let back: DeliveryDate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
    }

    #[test]
    fn ordering_is_calendar_order() {
        let a = DeliveryDate::parse("2024-06-03").unwrap();
        let b = DeliveryDate::parse("2024-06-04").unwrap();
        assert!(a < b);
    }
}
