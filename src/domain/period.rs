//! Period Range
//!
//! A contiguous date range one menu is planned for (usually a week). Its key
//! (`start__end`) scopes every per-period storage document.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const KEY_SEPARATOR: &str = "__";
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PeriodRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// One week starting at `start`.
    pub fn week_of(start: NaiveDate) -> Self {
        Self {
            start,
            end: start + chrono::Duration::days(6),
        }
    }

    /// Storage key for this range: `YYYY-MM-DD__YYYY-MM-DD`.
    pub fn key(&self) -> String {
        format!(
            "{}{}{}",
            self.start.format(DATE_FORMAT),
            KEY_SEPARATOR,
            self.end.format(DATE_FORMAT)
        )
    }

    /// Parse a range key back. Returns `None` for malformed keys.
    pub fn parse_key(key: &str) -> Option<Self> {
        let (start, end) = key.split_once(KEY_SEPARATOR)?;
        let start = NaiveDate::parse_from_str(start, DATE_FORMAT).ok()?;
        let end = NaiveDate::parse_from_str(end, DATE_FORMAT).ok()?;
        Some(Self { start, end })
    }

    /// Dates of the range in order, inclusive.
    pub fn dates(&self) -> Vec<NaiveDate> {
        let mut dates = Vec::new();
        let mut day = self.start;
        while day <= self.end {
            dates.push(day);
            day += chrono::Duration::days(1);
        }
        dates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_round_trip() {
        let range = PeriodRange::week_of(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(range.key(), "2024-01-01__2024-01-07");
        assert_eq!(PeriodRange::parse_key(&range.key()), Some(range));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(PeriodRange::parse_key("").is_none());
        assert!(PeriodRange::parse_key("2024-01-01").is_none());
        assert!(PeriodRange::parse_key("2024-01-01__not-a-date").is_none());
    }

    #[test]
    fn test_dates_inclusive() {
        let range = PeriodRange::week_of(NaiveDate::from_ymd_opt(2024, 2, 26).unwrap());
        let dates = range.dates();
        assert_eq!(dates.len(), 7);
        assert_eq!(dates[6], NaiveDate::from_ymd_opt(2024, 3, 3).unwrap());
    }
}
