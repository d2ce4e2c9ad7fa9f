//! Calendar-date value type keying every daily record.
//!
//! All date math (next day, day differences, retention windows) goes through
//! [`Day`] instead of slicing ISO strings, so timezone and month-boundary
//! edge cases live in one place.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, Local, NaiveDate};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Wire format for dates, e.g. `2025-03-01`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One calendar day. Ordering is calendar ordering; serializes as the
/// ISO `YYYY-MM-DD` string (it doubles as a JSON map key in weekly stats).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Day(NaiveDate);

impl Day {
    pub fn new(date: NaiveDate) -> Self {
        Day(date)
    }

    /// Today according to the local clock.
    pub fn today() -> Self {
        Day(Local::now().date_naive())
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Day)
    }

    /// The following calendar day.
    pub fn next(self) -> Self {
        Day(self.0 + Duration::days(1))
    }

    /// The preceding calendar day.
    pub fn prev(self) -> Self {
        Day(self.0 - Duration::days(1))
    }

    pub fn minus_days(self, days: u32) -> Self {
        Day(self.0 - Duration::days(i64::from(days)))
    }

    /// Signed whole days from `self` to `other`; positive when `other` is later.
    pub fn days_until(self, other: Day) -> i64 {
        other.0.signed_duration_since(self.0).num_days()
    }

    /// Whether `self` falls within the `window` days ending at `today`,
    /// `today` inclusive. Days after `today` are never within the window.
    pub fn within_last(self, today: Day, window: u32) -> bool {
        let behind = self.days_until(today);
        (0..i64::from(window)).contains(&behind)
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl FromStr for Day {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, DATE_FORMAT).map(Day)
    }
}

impl Serialize for Day {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Day {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> Day {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_display_roundtrip() {
        assert_eq!(day("2025-03-01").to_string(), "2025-03-01");
        assert!("03/01/2025".parse::<Day>().is_err());
        assert!("2025-13-01".parse::<Day>().is_err());
    }

    #[test]
    fn test_next_crosses_boundaries() {
        assert_eq!(day("2025-01-31").next(), day("2025-02-01"));
        assert_eq!(day("2024-12-31").next(), day("2025-01-01"));
        assert_eq!(day("2024-02-28").next(), day("2024-02-29"));
        assert_eq!(day("2025-03-01").prev(), day("2025-02-28"));
    }

    #[test]
    fn test_days_until_is_signed() {
        assert_eq!(day("2025-03-01").days_until(day("2025-03-05")), 4);
        assert_eq!(day("2025-03-05").days_until(day("2025-03-01")), -4);
        assert_eq!(day("2025-03-05").days_until(day("2025-03-05")), 0);
    }

    #[test]
    fn test_within_last_window_edges() {
        let today = day("2025-03-10");
        assert!(today.within_last(today, 7));
        assert!(day("2025-03-04").within_last(today, 7));
        assert!(!day("2025-03-03").within_last(today, 7));
        assert!(!day("2025-03-11").within_last(today, 7));
    }

    #[test]
    fn test_ordering_is_calendar_order() {
        assert!(day("2025-02-28") < day("2025-03-01"));
        assert_eq!(day("2025-03-10").minus_days(7), day("2025-03-03"));
    }

    #[test]
    fn test_serde_as_iso_string() {
        let d = day("2025-03-01");
        assert_eq!(serde_json::to_string(&d).unwrap(), "\"2025-03-01\"");
        assert_eq!(serde_json::from_str::<Day>("\"2025-03-01\"").unwrap(), d);
    }
}
