//! Test error types.

/// Result type alias for test operations.
pub type Result<T> = std::result::Result<T, TestError>;

/// Testing errors.
#[derive(Debug, thiserror::Error)]
pub enum TestError {
    /// Harness error.
    #[error("harness error: {0}")]
    Harness(String),

    /// No matching notification arrived in time.
    #[error("timeout after {0:?}")]
    Timeout(std::time::Duration),

    /// The notification channel closed.
    #[error("notification channel closed")]
    ChannelClosed,

    /// Pipeline error.
    #[error("lantern error: {0}")]
    Lantern(#[from] lantern_core::LanternError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TestError {
    /// Creates a harness error.
    #[must_use]
    pub fn harness(msg: impl Into<String>) -> Self {
        Self::Harness(msg.into())
    }
}
