//! # Date Index
//!
//! Navigation index over the distinct dates of the archive, bucketed by
//! month, newest first. This is a presentation helper layered on top of
//! [`ArchiveEngine::distinct_dates`](crate::engine::ArchiveEngine::distinct_dates).
//!
//! ```rust
//! use archive_core::dates::DateIndex;
//!
//! let index = DateIndex::build(["2024/04/30", "2024/05/02", "2024/05/01"]);
//! assert_eq!(index.months[0].key, "2024/05");
//! assert_eq!(index.months[0].dates, ["2024/05/02", "2024/05/01"]);
//! ```

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::engine::ArchiveEngine;
use crate::record::Encounter;

const DATE_FORMAT: &str = "%Y/%m/%d";

/// One month of dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthBucket {
    /// `YYYY/MM`, or the raw prefix for dates that do not parse
    pub key: String,
    /// Human readable heading, e.g. `2024年5月`
    pub label: String,
    /// Dates in this month, newest first
    pub dates: Vec<String>,
}

/// Distinct dates grouped into months.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DateIndex {
    pub months: Vec<MonthBucket>,
}

impl DateIndex {
    /// Bucket `dates` by month. Duplicates are collapsed.
    pub fn build<'a, I>(dates: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut buckets: BTreeMap<String, (String, Vec<String>)> = BTreeMap::new();
        for date in dates {
            let (key, label) = month_of(date);
            let entry = buckets.entry(key).or_insert_with(|| (label, Vec::new()));
            if !entry.1.iter().any(|d| d == date) {
                entry.1.push(date.to_string());
            }
        }

        let months = buckets
            .into_iter()
            .rev()
            .map(|(key, (label, mut dates))| {
                dates.sort_unstable_by(|a, b| b.cmp(a));
                MonthBucket { key, label, dates }
            })
            .collect();

        DateIndex { months }
    }

    /// Index over every date in `records`.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a Encounter>,
    {
        DateIndex::build(ArchiveEngine::distinct_dates(records))
    }

    /// Total number of distinct dates
    pub fn date_count(&self) -> usize {
        self.months.iter().map(|m| m.dates.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }
}

/// Month key and heading for a date.
fn month_of(date: &str) -> (String, String) {
    match NaiveDate::parse_from_str(date, DATE_FORMAT) {
        Ok(parsed) => (
            parsed.format("%Y/%m").to_string(),
            parsed.format("%Y年%-m月").to_string(),
        ),
        Err(_) => {
            let key = date.rsplit_once('/').map(|(prefix, _)| prefix).unwrap_or(date);
            (key.to_string(), key.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_months_newest_first() {
        let index = DateIndex::build(["2023/12/31", "2024/01/02", "2024/01/15", "2024/01/02"]);
        let keys: Vec<&str> = index.months.iter().map(|m| m.key.as_str()).collect();
        assert_eq!(keys, ["2024/01", "2023/12"]);
        assert_eq!(index.months[0].dates, ["2024/01/15", "2024/01/02"]);
        assert_eq!(index.months[0].label, "2024年1月");
        assert_eq!(index.date_count(), 3);
    }

    #[test]
    fn test_unparseable_dates_bucket_by_prefix() {
        let index = DateIndex::build(["2024/05/??", "someday"]);
        let keys: Vec<&str> = index.months.iter().map(|m| m.key.as_str()).collect();
        assert!(keys.contains(&"2024/05"));
        assert!(keys.contains(&"someday"));
    }

    #[test]
    fn test_from_records() {
        let records = vec![
            Encounter::new("2024/05/01", "いん", "A"),
            Encounter::new("2024/05/01", "にこ", "B"),
            Encounter::new("2024/06/01", "にこ", "C"),
        ];
        let index = DateIndex::from_records(&records);
        assert_eq!(index.months.len(), 2);
        assert_eq!(index.date_count(), 2);
    }

    #[test]
    fn test_empty() {
        let index = DateIndex::build(Vec::<&str>::new());
        assert!(index.is_empty());
        assert_eq!(index.date_count(), 0);
    }
}
