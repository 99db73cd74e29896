//! # Error Types
//!
//! Structured error types for archive_core. The engine itself never fails;
//! every variant here belongs to loading the feed or reading configuration.
//!
//! ## Example
//!
//! ```rust
//! use archive_core::errors::{ArchiveError, ArchiveResult};
//!
//! fn validate_limit(limit: usize) -> ArchiveResult<()> {
//!     if limit == 0 {
//!         return Err(ArchiveError::InvalidInput {
//!             field: "limit".to_string(),
//!             value: limit.to_string(),
//!             reason: "Limit must be positive".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for archive_core operations
pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// Structured error type for feed and configuration operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum ArchiveError {
    /// The feed could not be reached (DNS, TLS, timeout, ...)
    #[error("Failed to fetch feed from '{feed}': {reason}")]
    Fetch { feed: String, reason: String },

    /// The feed host answered with a non-success status
    #[error("Feed '{feed}' returned HTTP {status}")]
    HttpStatus { feed: String, status: u16 },

    /// Local file I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    Io {
        operation: String,
        path: String,
        reason: String,
    },

    /// The feed text is not valid CSV
    #[error("Feed parse error at line {line}: {reason}")]
    Parse { line: u64, reason: String },

    /// The feed parsed successfully but contained no rows
    #[error("Feed '{feed}' contains no encounters")]
    EmptyFeed { feed: String },

    /// Configuration file is malformed
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    /// A user-supplied value is invalid
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },
}

impl ArchiveError {
    /// Create a Fetch error
    pub fn fetch(feed: impl Into<String>, reason: impl Into<String>) -> Self {
        ArchiveError::Fetch {
            feed: feed.into(),
            reason: reason.into(),
        }
    }

    /// Create an Io error
    pub fn io(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        ArchiveError::Io {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a Config error
    pub fn config(reason: impl Into<String>) -> Self {
        ArchiveError::Config {
            reason: reason.into(),
        }
    }

    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        ArchiveError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Check if retrying the same load could succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ArchiveError::Fetch { .. } | ArchiveError::HttpStatus { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ArchiveError::Fetch { .. } => "FETCH_FAILED",
            ArchiveError::HttpStatus { .. } => "HTTP_STATUS",
            ArchiveError::Io { .. } => "IO_ERROR",
            ArchiveError::Parse { .. } => "PARSE_ERROR",
            ArchiveError::EmptyFeed { .. } => "EMPTY_FEED",
            ArchiveError::Config { .. } => "CONFIG_ERROR",
            ArchiveError::InvalidInput { .. } => "INVALID_INPUT",
        }
    }
}
