//! # archive_core - Encounter Archive Engine
//!
//! `archive_core` powers the Koyomi encounter archive: a read-only browser
//! over a published spreadsheet export that records which family member met
//! which resident, when, and where.
//!
//! ## Design Philosophy
//!
//! - **Read-only**: the feed is owned elsewhere; a reload replaces everything
//! - **Pure engine**: filtering, sorting and grouping never fail or mutate
//! - **Injected cast**: the birth order is a value, not a constant
//! - **Rich Errors**: loading and configuration errors are structured
//!
//! ## Quick Start
//!
//! ```rust
//! use archive_core::{ArchiveEngine, Encounter, FilterCriteria};
//!
//! let records = vec![
//!     Encounter::new("2024/05/01", "いん", "Alpha"),
//!     Encounter::new("2024/05/02", "にこ", "Beta"),
//! ];
//!
//! let engine = ArchiveEngine::default();
//! let criteria = FilterCriteria::default().with_member("にこ");
//! let visible = engine.visible(&records, &criteria);
//! assert_eq!(visible.len(), 1);
//! ```
//!
//! ## Modules
//!
//! - [`record`] - Encounter rows and their column headers
//! - [`members`] - Birth order and member colours
//! - [`criteria`] - Filter criteria
//! - [`engine`] - Filter, sort, facets and grouping
//! - [`dates`] - Month-bucketed date index
//! - [`feed`] - Fetching and parsing the CSV feed
//! - [`archive`] - Loaded snapshot
//! - [`config`] - TOML configuration
//! - [`errors`] - Structured error types

pub mod archive;
pub mod config;
pub mod criteria;
pub mod dates;
pub mod engine;
pub mod errors;
pub mod feed;
pub mod members;
pub mod record;

// Re-export commonly used types at crate root for convenience
pub use archive::Archive;
pub use config::{Config, Settings};
pub use criteria::FilterCriteria;
pub use engine::{ArchiveEngine, MemberGroup};
pub use errors::{ArchiveError, ArchiveResult};
pub use feed::{FeedLoader, FeedSource};
pub use members::{BirthOrder, Member};
pub use record::Encounter;
