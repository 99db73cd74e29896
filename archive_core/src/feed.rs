//! # Feed Loader
//!
//! Fetches the published spreadsheet export and parses it into
//! [`Encounter`] rows. The feed may be an `http(s)://` URL or a local CSV
//! file, which is handy for offline use and tests.
//!
//! The first line must be a header row. Headers map onto record fields (see
//! [`crate::record`]); extra columns are ignored and missing ones become
//! empty strings. Blank lines and rows whose every cell is empty are
//! skipped.
//!
//! ## Example
//!
//! ```rust
//! use archive_core::feed::parse_csv;
//!
//! let text = "日付,暦家キャラ,住民キャラ,住民プレイヤー\n2024/05/01,いん,Alpha,alpha_p\n";
//! let rows = parse_csv(text).unwrap();
//! assert_eq!(rows[0].family_member, "いん");
//! assert_eq!(rows[0].location, "");
//! ```

use std::fmt;
use std::path::PathBuf;

use reqwest::Client;
use tracing::{debug, info};

use crate::archive::Archive;
use crate::config::Settings;
use crate::errors::{ArchiveError, ArchiveResult};
use crate::record::Encounter;

/// Where the feed comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    /// Remote export fetched over HTTP(S)
    Url(String),
    /// Local CSV file
    File(PathBuf),
}

impl FeedSource {
    /// Classify a feed location. `http://` and `https://` are URLs,
    /// `file://` and anything else are paths.
    pub fn parse(location: &str) -> Self {
        let location = location.trim();
        if location.starts_with("http://") || location.starts_with("https://") {
            FeedSource::Url(location.to_string())
        } else if let Some(path) = location.strip_prefix("file://") {
            FeedSource::File(PathBuf::from(path))
        } else {
            FeedSource::File(PathBuf::from(location))
        }
    }
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedSource::Url(url) => write!(f, "{}", url),
            FeedSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Parse CSV feed text into encounters.
pub fn parse_csv(text: &str) -> ArchiveResult<Vec<Encounter>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers().map_err(parse_error)?.clone();
    let mut records = Vec::new();
    let mut skipped = 0usize;
    for row in reader.records() {
        let mut row = row.map_err(parse_error)?;
        // Exports drop trailing empty cells
        while row.len() < headers.len() {
            row.push_field("");
        }
        let encounter: Encounter = row.deserialize(Some(&headers)).map_err(parse_error)?;
        if encounter.is_blank() {
            skipped += 1;
        } else {
            records.push(encounter);
        }
    }

    if skipped > 0 {
        debug!(skipped, "skipped blank rows");
    }
    Ok(records)
}

fn parse_error(e: csv::Error) -> ArchiveError {
    ArchiveError::Parse {
        line: e.position().map(|p| p.line()).unwrap_or(0),
        reason: e.to_string(),
    }
}

/// Loads the feed into a fresh [`Archive`].
#[derive(Debug, Clone)]
pub struct FeedLoader {
    client: Client,
}

impl FeedLoader {
    /// Build a loader using the user agent and timeout from `settings`.
    pub fn new(settings: &Settings) -> ArchiveResult<Self> {
        let client = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(settings.timeout)
            .build()
            .map_err(|e| ArchiveError::fetch(settings.feed.as_str(), format!("Failed to create HTTP client: {}", e)))?;
        Ok(FeedLoader { client })
    }

    /// Retrieve the raw feed text.
    pub async fn fetch_text(&self, source: &FeedSource) -> ArchiveResult<String> {
        match source {
            FeedSource::Url(url) => {
                let response = self
                    .client
                    .get(url)
                    .send()
                    .await
                    .map_err(|e| ArchiveError::fetch(url.as_str(), e.to_string()))?;

                let status = response.status();
                if !status.is_success() {
                    return Err(ArchiveError::HttpStatus {
                        feed: url.clone(),
                        status: status.as_u16(),
                    });
                }

                response
                    .text()
                    .await
                    .map_err(|e| ArchiveError::fetch(url.as_str(), e.to_string()))
            }
            FeedSource::File(path) => tokio::fs::read_to_string(path)
                .await
                .map_err(|e| ArchiveError::io("read feed", path.display().to_string(), e.to_string())),
        }
    }

    /// Fetch and parse the feed. An empty feed is an error.
    pub async fn load(&self, source: &FeedSource) -> ArchiveResult<Archive> {
        info!(feed = %source, "fetching feed");
        let text = self.fetch_text(source).await?;
        debug!(bytes = text.len(), "feed received");

        let records = parse_csv(&text)?;
        if records.is_empty() {
            return Err(ArchiveError::EmptyFeed {
                feed: source.to_string(),
            });
        }

        info!(rows = records.len(), "feed loaded");
        Ok(Archive::new(source.to_string(), records))
    }
}
