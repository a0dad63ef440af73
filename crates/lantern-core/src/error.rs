//! Error types for lantern-core.
//!
//! Per Iron Lotus Framework: All errors are explicit, no panics allowed.
//! The pipeline is best-effort, so most of these never cross the public
//! ingestion and persistence entry points; they are logged and dropped there.

use std::path::PathBuf;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, LanternError>;

/// Comprehensive error type for the debugger pipeline.
#[derive(Debug, thiserror::Error)]
pub enum LanternError {
    /// Broadcast payload did not match the category's item shape.
    #[error("decode failure: {0}")]
    Decode(String),

    /// Durable file could not be read or parsed.
    #[error("persistence read failure at {}: {reason}", path.display())]
    PersistenceRead {
        /// File that was being read.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// Durable file could not be serialized or written.
    #[error("persistence write failure at {}: {reason}", path.display())]
    PersistenceWrite {
        /// File that was being written.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Positional lookup outside the indexable structure.
    #[error("invalid index: section {section}, item {item}")]
    InvalidIndex {
        /// Section index.
        section: usize,
        /// Item index within the section.
        item: usize,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl LanternError {
    /// Creates a decode error.
    #[must_use]
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a persistence read error.
    #[must_use]
    pub fn persistence_read(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::PersistenceRead {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Creates a persistence write error.
    #[must_use]
    pub fn persistence_write(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::PersistenceWrite {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns true if this error came from durable storage.
    #[must_use]
    pub const fn is_persistence(&self) -> bool {
        matches!(
            self,
            Self::PersistenceRead { .. } | Self::PersistenceWrite { .. }
        )
    }
}

impl From<serde_json::Error> for LanternError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
