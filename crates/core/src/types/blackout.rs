//! Blackout date entries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::date::{DateParseError, DeliveryDate, MonthDay};

/// The date field of a blackout entry.
///
/// One-off entries store a full calendar date. Recurring entries may be
/// stored as either a full `YYYY-MM-DD` (year ignored) or a bare `MM-DD`;
/// matching always reduces to the month-day component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlackoutDate {
    /// A full calendar date.
    Full(DeliveryDate),
    /// A year-independent month-day.
    MonthDay(MonthDay),
}

impl BlackoutDate {
    /// Parse either a `YYYY-MM-DD` date or an `MM-DD` month-day.
    ///
    /// # Errors
    ///
    /// Returns `DateParseError` when the string is neither form.
    pub fn parse(s: &str) -> Result<Self, DateParseError> {
        if let Ok(date) = DeliveryDate::parse(s) {
            return Ok(Self::Full(date));
        }
        MonthDay::parse(s).map(Self::MonthDay).map_err(|_| {
            DateParseError::InvalidDate(s.to_owned())
        })
    }

    /// The month-day component used for recurring matching.
    #[must_use]
    pub fn month_day(&self) -> MonthDay {
        match self {
            Self::Full(date) => date.month_day(),
            Self::MonthDay(md) => *md,
        }
    }
}

impl fmt::Display for BlackoutDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full(date) => date.fmt(f),
            Self::MonthDay(md) => md.fmt(f),
        }
    }
}

impl FromStr for BlackoutDate {
    type Err = DateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for BlackoutDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BlackoutDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for BlackoutDate {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for BlackoutDate {
    fn decode(
        value: sqlx::postgres::PgValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::parse(&s)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for BlackoutDate {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.to_string(), buf)
    }
}

/// A date on which delivery is refused, one-off or annually recurring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlackoutEntry {
    /// The excluded date (or month-day for recurring entries).
    pub date: BlackoutDate,
    /// Whether the entry repeats every year on its month-day.
    pub recurring: bool,
    /// Optional shop-owner note, e.g. "Christmas Day".
    pub label: Option<String>,
}

impl BlackoutEntry {
    /// A one-off blackout on a specific date.
    #[must_use]
    pub const fn one_off(date: DeliveryDate) -> Self {
        Self {
            date: BlackoutDate::Full(date),
            recurring: false,
            label: None,
        }
    }

    /// An annually recurring blackout.
    #[must_use]
    pub const fn annual(date: BlackoutDate) -> Self {
        Self {
            date,
            recurring: true,
            label: None,
        }
    }
}
