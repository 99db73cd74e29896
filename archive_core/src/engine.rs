//! # Filter / Sort Engine
//!
//! Pure functions from the full record set to the rows a viewer sees.
//! Nothing here mutates a record or fails: an empty set yields empty
//! results and an absent latest date.
//!
//! ## Ordering
//!
//! Rows are shown newest first. Dates are `YYYY/MM/DD` strings, so plain
//! string comparison is chronological. Rows sharing a date follow the
//! birth order; members outside it go last. Remaining ties keep their
//! input order.
//!
//! ## Example
//!
//! ```rust
//! use archive_core::criteria::FilterCriteria;
//! use archive_core::engine::ArchiveEngine;
//! use archive_core::record::Encounter;
//!
//! let records = vec![
//!     Encounter::new("2024/05/01", "いん", "A"),
//!     Encounter::new("2024/05/02", "にこ", "B"),
//!     Encounter::new("2024/05/02", "いん", "C"),
//! ];
//!
//! let engine = ArchiveEngine::default();
//! let names: Vec<&str> = engine
//!     .visible(&records, &FilterCriteria::default())
//!     .iter()
//!     .map(|e| e.resident_name.as_str())
//!     .collect();
//! assert_eq!(names, ["B", "C", "A"]);
//! assert_eq!(ArchiveEngine::latest_date(&records), Some("2024/05/02"));
//! ```

use std::cmp::Reverse;
use std::collections::BTreeSet;

use serde::Serialize;

use crate::criteria::FilterCriteria;
use crate::members::BirthOrder;
use crate::record::Encounter;

/// Encounters of one member on one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberGroup<'a> {
    pub member: &'a str,
    pub encounters: Vec<&'a Encounter>,
}

/// Number of encounters recorded for a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberCount<'a> {
    pub member: &'a str,
    pub count: usize,
}

/// Row filter/sort engine parameterised by a birth order.
#[derive(Debug, Clone, Default)]
pub struct ArchiveEngine {
    birth_order: BirthOrder,
}

impl ArchiveEngine {
    pub fn new(birth_order: BirthOrder) -> Self {
        ArchiveEngine { birth_order }
    }

    pub fn birth_order(&self) -> &BirthOrder {
        &self.birth_order
    }

    /// Keep the records matching every criterion.
    ///
    /// Input order is preserved, but ordering is [`sort`](Self::sort)'s job.
    pub fn filter<'a, I>(&self, records: I, criteria: &FilterCriteria) -> Vec<&'a Encounter>
    where
        I: IntoIterator<Item = &'a Encounter>,
    {
        if criteria.is_match_all() {
            return records.into_iter().collect();
        }
        let resident_query = criteria.resident_query.to_lowercase();
        let attribute_query = criteria.attribute_query.to_lowercase();
        let keyword = criteria.keyword.to_lowercase();

        records
            .into_iter()
            .filter(|e| exact(&criteria.member, &e.family_member))
            .filter(|e| exact(&criteria.season, &e.season))
            .filter(|e| exact(&criteria.platform, &e.platform))
            .filter(|e| resident_query.is_empty() || e.resident_haystack().contains(&resident_query))
            .filter(|e| attribute_query.is_empty() || e.attribute_haystack().contains(&attribute_query))
            .filter(|e| keyword.is_empty() || e.keyword_haystack().contains(&keyword))
            .collect()
    }

    /// Order records newest date first, then by birth order (stable).
    pub fn sort<'a, I>(&self, records: I) -> Vec<&'a Encounter>
    where
        I: IntoIterator<Item = &'a Encounter>,
    {
        let mut sorted: Vec<&'a Encounter> = records.into_iter().collect();
        // sort_by_key is stable, so equal keys keep input order
        sorted.sort_by_key(|e: &&'a Encounter| {
            let e: &'a Encounter = *e;
            (Reverse(e.date.as_str()), self.birth_order.rank(&e.family_member))
        });
        sorted
    }

    /// Filtered rows in display order.
    pub fn visible<'a, I>(&self, records: I, criteria: &FilterCriteria) -> Vec<&'a Encounter>
    where
        I: IntoIterator<Item = &'a Encounter>,
    {
        self.sort(self.filter(records, criteria))
    }

    /// Most recent date in the set. Call this on the unfiltered records.
    pub fn latest_date<'a, I>(records: I) -> Option<&'a str>
    where
        I: IntoIterator<Item = &'a Encounter>,
    {
        records.into_iter().map(|e| e.date.as_str()).max()
    }

    /// Unique dates present in the set.
    pub fn distinct_dates<'a, I>(records: I) -> BTreeSet<&'a str>
    where
        I: IntoIterator<Item = &'a Encounter>,
    {
        records.into_iter().map(|e| e.date.as_str()).collect()
    }

    /// Partition the records of `date` by member.
    ///
    /// Known members come in birth order, members outside it follow in
    /// order of first appearance. Members with no encounters that day get
    /// no group at all.
    pub fn group_by_member<'a, I>(&self, records: I, date: &str) -> Vec<MemberGroup<'a>>
    where
        I: IntoIterator<Item = &'a Encounter>,
    {
        let mut groups: Vec<MemberGroup<'a>> = Vec::new();
        for e in records.into_iter().filter(|e| e.date == date) {
            match groups.iter_mut().find(|g| g.member == e.family_member) {
                Some(group) => group.encounters.push(e),
                None => groups.push(MemberGroup {
                    member: e.family_member.as_str(),
                    encounters: vec![e],
                }),
            }
        }

        groups.sort_by_key(|g| self.birth_order.rank(g.member));
        groups
    }

    /// Encounter counts per member: the full birth order, then unknown
    /// members in first-appearance order.
    pub fn member_counts<'a, I>(&'a self, records: I) -> Vec<MemberCount<'a>>
    where
        I: IntoIterator<Item = &'a Encounter>,
    {
        let mut counts: Vec<MemberCount<'a>> = self
            .birth_order
            .names()
            .map(|member| MemberCount { member, count: 0 })
            .collect();

        for e in records {
            match counts.iter_mut().find(|c| c.member == e.family_member) {
                Some(c) => c.count += 1,
                None => counts.push(MemberCount {
                    member: e.family_member.as_str(),
                    count: 1,
                }),
            }
        }
        counts
    }
}

fn exact(wanted: &Option<String>, actual: &str) -> bool {
    wanted.as_deref().map_or(true, |w| w == actual)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names<'a>(rows: &[&'a Encounter]) -> Vec<&'a str> {
        rows.iter().map(|e| e.resident_name.as_str()).collect()
    }

    fn sample() -> Vec<Encounter> {
        vec![
            Encounter::new("2024/05/01", "いん", "Alpha")
                .with_handle("al_p")
                .with_attribute("Knight", "ないと")
                .with_season("S1")
                .with_platform("YouTube"),
            Encounter::new("2024/05/02", "にこ", "Beta")
                .with_name_phonetic("べーた")
                .with_season("S1")
                .with_platform("Twitch"),
            Encounter::new("2024/05/02", "いん", "Gamma")
                .with_attribute("Merchant", "")
                .with_season("S2")
                .with_platform("YouTube"),
            Encounter::new("2024/04/30", "ゲスト", "Delta")
                .with_location("Harbor")
                .with_season("S1")
                .with_platform("YouTube"),
            Encounter::new("2024/05/02", "ゲスト", "Epsilon").with_season("S2"),
        ]
    }

    #[test]
    fn test_sort_scenario() {
        let records = vec![
            Encounter::new("2024/05/01", "いん", "A"),
            Encounter::new("2024/05/02", "にこ", "B"),
            Encounter::new("2024/05/02", "いん", "C"),
        ];
        let engine = ArchiveEngine::default();
        assert_eq!(names(&engine.sort(&records)), ["B", "C", "A"]);
    }

    #[test]
    fn test_sort_unknown_member_last_within_date() {
        let records = sample();
        let engine = ArchiveEngine::default();
        let sorted = engine.sort(&records);
        assert_eq!(names(&sorted), ["Beta", "Gamma", "Epsilon", "Alpha", "Delta"]);
    }

    #[test]
    fn test_sort_is_stable_and_idempotent() {
        let records = vec![
            Encounter::new("2024/05/02", "いん", "first"),
            Encounter::new("2024/05/02", "いん", "second"),
            Encounter::new("2024/05/02", "x", "unknown1"),
            Encounter::new("2024/05/02", "y", "unknown2"),
            Encounter::new("2024/05/02", "にこ", "nico"),
        ];
        let engine = ArchiveEngine::default();
        let once = engine.sort(&records);
        assert_eq!(names(&once), ["nico", "first", "second", "unknown1", "unknown2"]);

        let twice = engine.sort(once.iter().copied());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_sort_dates_descending() {
        let records = sample();
        let engine = ArchiveEngine::default();
        let sorted = engine.sort(&records);
        for pair in sorted.windows(2) {
            assert!(pair[0].date >= pair[1].date);
        }
    }

    #[test]
    fn test_injected_birth_order() {
        let records = vec![
            Encounter::new("2024/05/02", "にこ", "B"),
            Encounter::new("2024/05/02", "いん", "C"),
        ];
        let engine = ArchiveEngine::new(BirthOrder::from_names(["いん", "にこ"]).unwrap());
        assert_eq!(names(&engine.sort(&records)), ["C", "B"]);
    }

    #[test]
    fn test_filter_resident_query_case_insensitive() {
        let records = vec![
            Encounter::new("2024/05/01", "いん", "Alpha"),
            Encounter::new("2024/05/01", "いん", "Beta"),
        ];
        let engine = ArchiveEngine::default();
        let criteria = FilterCriteria::default().with_resident_query("AL");
        assert_eq!(names(&engine.filter(&records, &criteria)), ["Alpha"]);

        let criteria = FilterCriteria::default().with_resident_query("alp");
        assert_eq!(names(&engine.filter(&records, &criteria)), ["Alpha"]);

        // Plain substring: "Beta" ends in an "a" too
        let criteria = FilterCriteria::default().with_resident_query("A");
        assert_eq!(names(&engine.filter(&records, &criteria)), ["Alpha", "Beta"]);
    }

    #[test]
    fn test_filter_resident_query_matches_phonetic_and_handle() {
        let records = sample();
        let engine = ArchiveEngine::default();

        let by_phonetic = FilterCriteria::default().with_resident_query("べー");
        assert_eq!(names(&engine.filter(&records, &by_phonetic)), ["Beta"]);

        let by_handle = FilterCriteria::default().with_resident_query("AL_P");
        assert_eq!(names(&engine.filter(&records, &by_handle)), ["Alpha"]);
    }

    #[test]
    fn test_filter_attribute_query() {
        let records = sample();
        let engine = ArchiveEngine::default();

        let criteria = FilterCriteria::default().with_attribute_query("merch");
        assert_eq!(names(&engine.filter(&records, &criteria)), ["Gamma"]);

        let criteria = FilterCriteria::default().with_attribute_query("ないと");
        assert_eq!(names(&engine.filter(&records, &criteria)), ["Alpha"]);
    }

    #[test]
    fn test_filter_exact_fields_combine() {
        let records = sample();
        let engine = ArchiveEngine::default();

        let criteria = FilterCriteria::default().with_member("いん");
        assert_eq!(names(&engine.filter(&records, &criteria)), ["Alpha", "Gamma"]);

        let criteria = criteria.with_season("S2");
        assert_eq!(names(&engine.filter(&records, &criteria)), ["Gamma"]);

        let criteria = criteria.with_platform("Twitch");
        assert!(engine.filter(&records, &criteria).is_empty());
    }

    #[test]
    fn test_filter_exact_match_is_not_substring() {
        let records = sample();
        let engine = ArchiveEngine::default();
        let criteria = FilterCriteria::default().with_platform("You");
        assert!(engine.filter(&records, &criteria).is_empty());
    }

    #[test]
    fn test_filter_keyword_searches_location() {
        let records = sample();
        let engine = ArchiveEngine::default();
        let criteria = FilterCriteria::default().with_keyword("harb");
        assert_eq!(names(&engine.filter(&records, &criteria)), ["Delta"]);
    }

    #[test]
    fn test_filter_match_all_returns_everything() {
        let records = sample();
        let engine = ArchiveEngine::default();
        let all = engine.filter(&records, &FilterCriteria::default());
        assert_eq!(all.len(), records.len());
        assert!(records.iter().zip(&all).all(|(a, b)| std::ptr::eq(a, *b)));
    }

    #[test]
    fn test_filter_result_is_subset() {
        let records = sample();
        let engine = ArchiveEngine::default();
        let criteria_list = [
            FilterCriteria::default().with_member("にこ"),
            FilterCriteria::default().with_season("S1").with_resident_query("e"),
            FilterCriteria::default().with_platform("YouTube").with_attribute_query("k"),
            FilterCriteria::default().with_keyword("nothing matches this"),
        ];
        for criteria in &criteria_list {
            for row in engine.filter(&records, criteria) {
                assert!(records.iter().any(|r| std::ptr::eq(r, row)));
            }
        }
    }

    #[test]
    fn test_empty_record_set() {
        let records: Vec<Encounter> = Vec::new();
        let engine = ArchiveEngine::default();
        assert_eq!(ArchiveEngine::latest_date(&records), None);
        assert!(ArchiveEngine::distinct_dates(&records).is_empty());
        assert!(engine.filter(&records, &FilterCriteria::default()).is_empty());
        assert!(engine.sort(&records).is_empty());
        assert!(engine.group_by_member(&records, "2024/05/01").is_empty());
    }

    #[test]
    fn test_latest_date_uses_full_set() {
        let records = sample();
        let engine = ArchiveEngine::default();
        assert_eq!(ArchiveEngine::latest_date(&records), Some("2024/05/02"));

        let filtered = engine.filter(&records, &FilterCriteria::default().with_member("ゲスト").with_season("S1"));
        assert_eq!(ArchiveEngine::latest_date(filtered), Some("2024/04/30"));
        assert_eq!(ArchiveEngine::latest_date(&records), Some("2024/05/02"));
    }

    #[test]
    fn test_distinct_dates() {
        let records = sample();
        let dates: Vec<&str> = ArchiveEngine::distinct_dates(&records).into_iter().collect();
        assert_eq!(dates, ["2024/04/30", "2024/05/01", "2024/05/02"]);
    }

    #[test]
    fn test_group_by_member_partitions_day() {
        let mut records = sample();
        records.push(Encounter::new("2024/05/02", "にこ", "Zeta"));
        let engine = ArchiveEngine::default();

        let groups = engine.group_by_member(&records, "2024/05/02");
        let members: Vec<&str> = groups.iter().map(|g| g.member).collect();
        assert_eq!(members, ["にこ", "いん", "ゲスト"]);
        assert_eq!(names(&groups[0].encounters), ["Beta", "Zeta"]);

        let grouped: usize = groups.iter().map(|g| g.encounters.len()).sum();
        let day = records.iter().filter(|e| e.date == "2024/05/02").count();
        assert_eq!(grouped, day);
        assert!(groups.iter().all(|g| !g.encounters.is_empty()));
    }

    #[test]
    fn test_group_by_member_unknown_date() {
        let records = sample();
        let engine = ArchiveEngine::default();
        assert!(engine.group_by_member(&records, "1999/01/01").is_empty());
    }

    #[test]
    fn test_member_counts() {
        let records = sample();
        let engine = ArchiveEngine::new(BirthOrder::from_names(["にこ", "いん", "みう"]).unwrap());
        let counts = engine.member_counts(&records);
        let flat: Vec<(&str, usize)> = counts.iter().map(|c| (c.member, c.count)).collect();
        assert_eq!(flat, [("にこ", 1), ("いん", 2), ("みう", 0), ("ゲスト", 2)]);
    }
}
