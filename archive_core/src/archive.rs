//! # Archive Snapshot
//!
//! The record set from one successful feed load. It is created once and
//! replaced wholesale on reload; nothing updates it in place.
//!
//! ```rust
//! use archive_core::archive::Archive;
//! use archive_core::record::Encounter;
//!
//! let archive = Archive::new("feed.csv", vec![
//!     Encounter::new("2024/05/01", "いん", "A"),
//!     Encounter::new("2024/05/02", "にこ", "B"),
//! ]);
//! assert_eq!(archive.latest_date(), Some("2024/05/02"));
//! ```

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::dates::DateIndex;
use crate::engine::ArchiveEngine;
use crate::record::Encounter;

/// Loaded encounters plus where and when they came from.
#[derive(Debug, Clone, Serialize)]
pub struct Archive {
    /// Feed location the records were read from
    pub source: String,
    /// When the feed was loaded
    pub loaded_at: DateTime<Utc>,
    records: Vec<Encounter>,
}

impl Archive {
    pub fn new(source: impl Into<String>, records: Vec<Encounter>) -> Self {
        Archive {
            source: source.into(),
            loaded_at: Utc::now(),
            records,
        }
    }

    /// All records, in feed order
    pub fn records(&self) -> &[Encounter] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Latest date over the whole archive, ignoring any view filter
    pub fn latest_date(&self) -> Option<&str> {
        ArchiveEngine::latest_date(&self.records)
    }

    pub fn distinct_dates(&self) -> BTreeSet<&str> {
        ArchiveEngine::distinct_dates(&self.records)
    }

    pub fn date_index(&self) -> DateIndex {
        DateIndex::from_records(&self.records)
    }
}
