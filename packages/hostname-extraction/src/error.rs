//! Typed errors for the hostname extraction library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can tell
//! bad input apart from infrastructure failures.

use thiserror::Error;

/// Errors that can occur while ingesting, extracting, or merging a scan export.
///
/// Per-row extraction misses are never reported here; they degrade to
/// [`ExtractedHostname::Unmatched`](crate::types::row::ExtractedHostname) or are
/// skipped, depending on [`MissPolicy`](crate::types::config::MissPolicy).
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Staged file is missing, not readable, or failed to open
    #[error("{filename} - {reason}")]
    UnreadableInput { filename: String, reason: String },

    /// Input is not UTF-8 text, not CSV, or lacks a required column
    #[error("invalid file format: {reason}")]
    InvalidFormat { reason: String },

    /// Persistent store unreachable or a statement failed
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Writing the result table failed
    #[error("output error: {0}")]
    Output(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ExtractionError {
    pub fn unreadable(filename: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnreadableInput {
            filename: filename.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_format(reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            reason: reason.into(),
        }
    }

    /// True for errors caused by the uploaded file rather than the backend.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::UnreadableInput { .. } | Self::InvalidFormat { .. }
        )
    }
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;
