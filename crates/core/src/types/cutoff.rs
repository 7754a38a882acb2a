//! Same-day ordering cutoff time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Error parsing a cutoff time string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid cutoff time (expected HH:MM): {0}")]
pub struct CutoffParseError(String);

/// Local wall-clock time after which same-day ordering closes.
///
/// Stored and serialized as `HH:MM`; compared as minutes since midnight.
/// Product overrides supply a whole hour (0-23) instead of a full `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CutoffTime(u32);

impl CutoffTime {
    /// Parse a strict `HH:MM` string (24-hour clock).
    ///
    /// # Errors
    ///
    /// Returns `CutoffParseError` if the string is not a valid wall-clock
    /// time.
    pub fn parse(s: &str) -> Result<Self, CutoffParseError> {
        let err = || CutoffParseError(s.to_owned());
        let (h, m) = s.split_once(':').ok_or_else(err)?;
        if h.len() != 2 || m.len() != 2 {
            return Err(err());
        }
        let hours: u32 = h.parse().map_err(|_| err())?;
        let minutes: u32 = m.parse().map_err(|_| err())?;
        if hours > 23 || minutes > 59 {
            return Err(err());
        }
        Ok(Self(hours * 60 + minutes))
    }

    /// Cutoff at the top of a local hour, for product overrides (0-23).
    ///
    /// Hours above 23 saturate to 23:00.
    #[must_use]
    pub const fn from_hour(hour: u8) -> Self {
        let h = if hour > 23 { 23 } else { hour as u32 };
        Self(h * 60)
    }

    /// Minutes since local midnight, in `[0, 1439]`.
    #[must_use]
    pub const fn minutes(&self) -> u32 {
        self.0
    }
}

impl Default for CutoffTime {
    /// The documented default cutoff of 14:00.
    fn default() -> Self {
        Self(14 * 60)
    }
}

impl fmt::Display for CutoffTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl FromStr for CutoffTime {
    type Err = CutoffParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for CutoffTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CutoffTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for CutoffTime {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for CutoffTime {
    fn decode(
        value: sqlx::postgres::PgValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::parse(&s)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for CutoffTime {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.to_string(), buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_times() {
        assert_eq!(CutoffTime::parse("14:00").unwrap().minutes(), 840);
        assert_eq!(CutoffTime::parse("00:00").unwrap().minutes(), 0);
        assert_eq!(CutoffTime::parse("23:59").unwrap().minutes(), 1439);
    }

    #[test]
    fn rejects_malformed_times() {
        assert!(CutoffTime::parse("24:00").is_err());
        assert!(CutoffTime::parse("14:60").is_err());
        assert!(CutoffTime::parse("14").is_err());
        assert!(CutoffTime::parse("2:00").is_err());
        assert!(CutoffTime::parse("").is_err());
    }

    #[test]
    fn from_hour_is_top_of_hour() {
        assert_eq!(CutoffTime::from_hour(14).minutes(), 840);
        assert_eq!(CutoffTime::from_hour(0).minutes(), 0);
    }

    #[test]
    fn display_round_trips() {
        let c = CutoffTime::parse("09:30").unwrap();
        assert_eq!(c.to_string(), "09:30");
        assert_eq!(CutoffTime::parse(&c.to_string()).unwrap(), c);
    }

    #[test]
    fn default_is_two_pm() {
        assert_eq!(CutoffTime::default().to_string(), "14:00");
    }
}
