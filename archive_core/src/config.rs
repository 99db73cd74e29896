//! # Configuration
//!
//! Optional TOML file (`koyomi.toml` by default). Every key may be omitted:
//!
//! ```toml
//! feed = "https://docs.google.com/spreadsheets/d/e/.../pub?output=csv"
//! user_agent = "koyomi-archive/0.1"
//! timeout_secs = 20
//! unknown_location = "不明"
//! wildcard = "全員"
//!
//! [[members]]
//! name = "にこ"
//! color = "#e7609e"
//! ```
//!
//! A `members` list replaces the default birth order entirely.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::criteria::WILDCARD_LABEL;
use crate::errors::{ArchiveError, ArchiveResult};
use crate::members::{BirthOrder, Member};
use crate::record::UNKNOWN_LOCATION;

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "koyomi.toml";

/// Published spreadsheet export the archive reads by default
pub const DEFAULT_FEED: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vS22_uNTvQLLzkEE8BDuWMt-q4_Se9PfzC8MWJ-Z9C05PXYg5Ak0Mf5-SE5WMbZYus34xGHOLKMvULA/pub?output=csv";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Resolved settings used by the loader and the view.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Feed URL or local path
    pub feed: String,
    /// User agent for feed requests
    pub user_agent: String,
    /// Feed request timeout
    pub timeout: Duration,
    /// Shown in place of an empty location
    pub unknown_location: String,
    /// Picker label meaning "every member"
    pub wildcard: String,
    pub birth_order: BirthOrder,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            feed: DEFAULT_FEED.to_string(),
            user_agent: format!("koyomi-archive/{}", env!("CARGO_PKG_VERSION")),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            unknown_location: UNKNOWN_LOCATION.to_string(),
            wildcard: WILDCARD_LABEL.to_string(),
            birth_order: BirthOrder::default(),
        }
    }
}

impl Settings {
    /// Apply a config file on top of the defaults.
    pub fn from_config(config: Config) -> ArchiveResult<Self> {
        let defaults = Settings::default();
        let birth_order = match config.members {
            Some(members) => BirthOrder::new(members)?,
            None => defaults.birth_order,
        };

        if config.timeout_secs == Some(0) {
            return Err(ArchiveError::config("timeout_secs must be greater than zero"));
        }

        Ok(Settings {
            feed: config.feed.unwrap_or(defaults.feed),
            user_agent: config.user_agent.unwrap_or(defaults.user_agent),
            timeout: config.timeout_secs.map(Duration::from_secs).unwrap_or(defaults.timeout),
            unknown_location: config.unknown_location.unwrap_or(defaults.unknown_location),
            wildcard: config.wildcard.unwrap_or(defaults.wildcard),
            birth_order,
        })
    }

    /// Replace the feed location (command line / environment override).
    pub fn with_feed(mut self, feed: impl Into<String>) -> Self {
        self.feed = feed.into();
        self
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub feed: Option<String>,
    pub user_agent: Option<String>,
    pub timeout_secs: Option<u64>,
    pub unknown_location: Option<String>,
    pub wildcard: Option<String>,
    pub members: Option<Vec<Member>>,
}

impl Config {
    /// Parse config text.
    pub fn parse(text: &str) -> ArchiveResult<Self> {
        toml::from_str(text).map_err(|e| ArchiveError::config(e.to_string()))
    }

    /// Read and parse a config file.
    pub fn load(path: &Path) -> ArchiveResult<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| ArchiveError::io("read config", path.display().to_string(), e.to_string()))?;
        Config::parse(&text).map_err(|e| match e {
            ArchiveError::Config { reason } => {
                ArchiveError::config(format!("{}: {}", path.display(), reason))
            }
            other => other,
        })
    }

    /// Load `explicit` if given (it must exist), otherwise `koyomi.toml` in
    /// the working directory when present, otherwise defaults.
    pub fn discover(explicit: Option<&Path>) -> ArchiveResult<Self> {
        if let Some(path) = explicit {
            debug!(path = %path.display(), "loading config");
            return Config::load(path);
        }

        let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            debug!(path = %fallback.display(), "loading config from working directory");
            Config::load(&fallback)
        } else {
            debug!("no config file, using defaults");
            Ok(Config::default())
        }
    }
}
