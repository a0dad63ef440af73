//! Pipeline configuration.
//!
//! Per Iron Lotus Framework: Configuration is validated at load time (Poka-Yoke),
//! with sensible defaults and clear error messages.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{LanternError, Result};

/// Default delay of the coalesced count refresh.
pub const DEFAULT_REFRESH_DELAY: Duration = Duration::from_millis(500);

/// Default capacity of the notification channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Directory under the documents area that holds persisted stores.
const STORAGE_SUBDIR: &str = "lantern";

/// Pipeline configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanternConfig {
    /// Directory for persisted category stores.
    ///
    /// `None` resolves to the platform documents directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,

    /// Flags file. `None` keeps flags in memory only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags_file: Option<PathBuf>,

    /// Delay of the coalesced count refresh (e.g. `"500ms"`).
    #[serde(default = "default_refresh_delay", with = "humantime_duration")]
    pub refresh_delay: Duration,

    /// Capacity of the notification broadcast channel.
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

fn default_refresh_delay() -> Duration {
    DEFAULT_REFRESH_DELAY
}

fn default_event_capacity() -> usize {
    DEFAULT_EVENT_CAPACITY
}

impl Default for LanternConfig {
    fn default() -> Self {
        Self {
            storage_dir: None,
            flags_file: None,
            refresh_delay: default_refresh_delay(),
            event_capacity: default_event_capacity(),
        }
    }
}

impl LanternConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the storage directory.
    #[must_use]
    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = Some(dir.into());
        self
    }

    /// Sets the flags file.
    #[must_use]
    pub fn with_flags_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.flags_file = Some(path.into());
        self
    }

    /// Sets the count-refresh delay.
    #[must_use]
    pub const fn with_refresh_delay(mut self, delay: Duration) -> Self {
        self.refresh_delay = delay;
        self
    }

    /// Sets the notification channel capacity.
    #[must_use]
    pub const fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Resolves the storage directory.
    ///
    /// Without an explicit directory this is the platform documents
    /// directory, or the local data directory on hosts that have none.
    ///
    /// # Errors
    /// Returns an error if no directory is configured and the platform
    /// has neither.
    pub fn resolve_storage_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.storage_dir {
            return Ok(dir.clone());
        }
        platform_storage_dir(dirs_next::document_dir(), dirs_next::data_local_dir())
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<()> {
        if self.event_capacity == 0 {
            return Err(LanternError::config("event_capacity must be > 0"));
        }
        if let Some(dir) = &self.storage_dir {
            if dir.as_os_str().is_empty() {
                return Err(LanternError::config("storage_dir cannot be empty"));
            }
        }
        Ok(())
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| LanternError::config(format!("failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| LanternError::config(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}

fn platform_storage_dir(
    documents: Option<PathBuf>,
    data_local: Option<PathBuf>,
) -> Result<PathBuf> {
    documents
        .or(data_local)
        .map(|dir| dir.join(STORAGE_SUBDIR))
        .ok_or_else(|| LanternError::config("no documents or local data directory"))
}

mod humantime_duration {
    use super::{Deserialize, Deserializer, Duration, Serializer};

    pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&humantime::format_duration(*value).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        humantime::parse_duration(&text).map_err(serde::de::Error::custom)
    }
}
