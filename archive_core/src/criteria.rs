//! # Filter Criteria
//!
//! The small flat structure the view passes to the engine. Exact-match
//! fields use `None` as "match all"; text queries use the empty string.
//!
//! ```rust
//! use archive_core::criteria::FilterCriteria;
//!
//! let criteria = FilterCriteria::default()
//!     .with_member("にこ")
//!     .with_resident_query("alpha");
//! assert!(!criteria.is_match_all());
//! ```

use serde::{Deserialize, Serialize};

/// Label the view uses for "every member" in its member picker
pub const WILDCARD_LABEL: &str = "全員";

/// Filter values chosen by the viewer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Exact family member, `None` for all
    pub member: Option<String>,
    /// Exact season label, `None` for all
    pub season: Option<String>,
    /// Exact platform, `None` for all
    pub platform: Option<String>,
    /// Substring of resident name, reading, or handle
    pub resident_query: String,
    /// Substring of attribute or its reading
    pub attribute_query: String,
    /// Substring of resident, handle, location, note, or attribute
    pub keyword: String,
}

impl FilterCriteria {
    pub fn with_member(mut self, member: impl Into<String>) -> Self {
        self.member = Some(member.into());
        self
    }

    pub fn with_season(mut self, season: impl Into<String>) -> Self {
        self.season = Some(season.into());
        self
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    pub fn with_resident_query(mut self, query: impl Into<String>) -> Self {
        self.resident_query = query.into();
        self
    }

    pub fn with_attribute_query(mut self, query: impl Into<String>) -> Self {
        self.attribute_query = query.into();
        self
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = keyword.into();
        self
    }

    /// True when no field narrows the result
    pub fn is_match_all(&self) -> bool {
        self.member.is_none()
            && self.season.is_none()
            && self.platform.is_none()
            && self.resident_query.is_empty()
            && self.attribute_query.is_empty()
            && self.keyword.is_empty()
    }
}

/// Map a picker value to an exact-match filter.
///
/// Empty input, `wildcard`, and `all` (any case) all mean "match all".
pub fn choice(value: &str, wildcard: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || value == wildcard || value.eq_ignore_ascii_case("all") {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_all() {
        assert!(FilterCriteria::default().is_match_all());
        assert!(!FilterCriteria::default().with_keyword("x").is_match_all());
    }

    #[test]
    fn test_choice_wildcards() {
        assert_eq!(choice("全員", WILDCARD_LABEL), None);
        assert_eq!(choice("ALL", WILDCARD_LABEL), None);
        assert_eq!(choice("  ", WILDCARD_LABEL), None);
        assert_eq!(choice(" にこ ", WILDCARD_LABEL), Some("にこ".to_string()));
    }

    #[test]
    fn test_partial_json() {
        let c: FilterCriteria = serde_json::from_str(r#"{"member":"いん"}"#).unwrap();
        assert_eq!(c.member.as_deref(), Some("いん"));
        assert!(c.resident_query.is_empty());
    }
}
