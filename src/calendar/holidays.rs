// Holiday dates excluded from the business calendar

use crate::error::{AnalysisError, Result};
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::BTreeSet;

/// Ordered set of non-working calendar dates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidaySet {
    dates: BTreeSet<NaiveDate>,
}

impl HolidaySet {
    /// Create an empty holiday set (weekends are still non-working)
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `YYYY-MM-DD` strings into a holiday set
    ///
    /// # Example
    /// ```
    /// use dynbottle::calendar::HolidaySet;
    ///
    /// let holidays = HolidaySet::parse_strs(&["2021-09-20", "2021-09-21"]).unwrap();
    /// assert_eq!(holidays.len(), 2);
    /// ```
    pub fn parse_strs<S: AsRef<str>>(values: &[S]) -> Result<Self> {
        values
            .iter()
            .map(|value| parse_date(value.as_ref()))
            .collect::<Result<BTreeSet<_>>>()
            .map(|dates| Self { dates })
    }

    /// Parse a comma-separated list such as `2021-09-20,2021-09-21`
    ///
    /// Blank entries are skipped, so an empty string yields an empty set.
    pub fn parse_list(list: &str) -> Result<Self> {
        let entries: Vec<&str> = list
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .collect();
        Self::parse_strs(&entries)
    }

    pub fn insert(&mut self, date: NaiveDate) -> bool {
        self.dates.insert(date)
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        self.dates.contains(date)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Dates in ascending order
    pub fn iter(&self) -> impl Iterator<Item = &NaiveDate> {
        self.dates.iter()
    }

    /// Monday-Friday and not a holiday
    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !self.contains(&date)
    }
}

impl FromIterator<NaiveDate> for HolidaySet {
    fn from_iter<I: IntoIterator<Item = NaiveDate>>(iter: I) -> Self {
        Self {
            dates: iter.into_iter().collect(),
        }
    }
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| {
        AnalysisError::InvalidConfig(format!("invalid holiday date '{}': {}", value, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        let holidays = HolidaySet::parse_list("2021-10-04, 2021-09-20,,2021-10-11").unwrap();
        let dates: Vec<String> = holidays.iter().map(|d| d.to_string()).collect();
        assert_eq!(dates, vec!["2021-09-20", "2021-10-04", "2021-10-11"]);
    }

    #[test]
    fn test_parse_list_empty() {
        assert!(HolidaySet::parse_list("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = HolidaySet::parse_strs(&["2021-13-45"]).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidConfig(_)));
    }

    #[test]
    fn test_business_day() {
        let holidays = HolidaySet::parse_strs(&["2021-09-20"]).unwrap();
        // Monday holiday
        assert!(!holidays.is_business_day(NaiveDate::from_ymd_opt(2021, 9, 20).unwrap()));
        // Saturday
        assert!(!holidays.is_business_day(NaiveDate::from_ymd_opt(2021, 9, 18).unwrap()));
        // Ordinary Tuesday two weeks later
        assert!(holidays.is_business_day(NaiveDate::from_ymd_opt(2021, 10, 5).unwrap()));
    }
}
