//! Process-wide configuration flags behind an injected store.
//!
//! Flags are read from anywhere (settings entries, the aggregator's save
//! path) and written from the settings surface. Each get/set is atomic on
//! its own; there is no multi-flag transaction.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{LanternError, Result};

/// A boolean configuration flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Flag {
    /// Whether diagnostic data is written to durable storage.
    StoreAnalytics,
    /// Whether the overlay bubble pulses.
    BubblePulse,
    /// Whether item icons animate in the bubble.
    ItemIconAnimation,
}

impl Flag {
    /// Every flag.
    pub const ALL: [Self; 3] = [Self::StoreAnalytics, Self::BubblePulse, Self::ItemIconAnimation];

    /// Documented default value.
    #[must_use]
    pub const fn default_value(&self) -> bool {
        match self {
            Self::StoreAnalytics | Self::BubblePulse | Self::ItemIconAnimation => true,
        }
    }

    /// Stable key used in the flags file.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::StoreAnalytics => "store-analytics",
            Self::BubblePulse => "bubble-pulse",
            Self::ItemIconAnimation => "item-icon-animation",
        }
    }
}

/// Get/set access to configuration flags.
///
/// Passed explicitly to the aggregator and the settings registry.
pub trait ConfigStore: Send + Sync {
    /// Returns the current value of a flag.
    fn get(&self, flag: Flag) -> bool;

    /// Sets a flag.
    fn set(&self, flag: Flag, value: bool);

    /// Restores every flag to its documented default.
    fn reset_to_defaults(&self) {
        for flag in Flag::ALL {
            self.set(flag, flag.default_value());
        }
    }
}

fn default_values() -> BTreeMap<Flag, bool> {
    Flag::ALL.into_iter().map(|f| (f, f.default_value())).collect()
}

// =============================================================================
// MemoryConfigStore
// =============================================================================

/// In-memory flag store.
#[derive(Debug)]
pub struct MemoryConfigStore {
    values: RwLock<BTreeMap<Flag, bool>>,
}

impl MemoryConfigStore {
    /// Creates a store holding the documented defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: RwLock::new(default_values()),
        }
    }

    /// Sets a flag, builder style.
    #[must_use]
    pub fn with(self, flag: Flag, value: bool) -> Self {
        self.values.write().insert(flag, value);
        self
    }
}

impl Default for MemoryConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn get(&self, flag: Flag) -> bool {
        self.values
            .read()
            .get(&flag)
            .copied()
            .unwrap_or_else(|| flag.default_value())
    }

    fn set(&self, flag: Flag, value: bool) {
        self.values.write().insert(flag, value);
    }
}

// =============================================================================
// TomlConfigStore
// =============================================================================

/// On-disk layout of the flags file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct FlagsFile {
    #[serde(default)]
    flags: BTreeMap<String, bool>,
}

/// Flag store that writes through to a TOML file.
///
/// Reads and writes are best-effort: an unreadable file yields the
/// defaults, a failed write is logged and the in-memory value still wins.
#[derive(Debug)]
pub struct TomlConfigStore {
    path: PathBuf,
    values: RwLock<BTreeMap<Flag, bool>>,
}

impl TomlConfigStore {
    /// Opens the flags file at `path`, falling back to defaults.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match Self::read(&path) {
            Ok(values) => values,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "using default flags");
                default_values()
            }
        };
        Self {
            path,
            values: RwLock::new(values),
        }
    }

    /// Returns the path of the flags file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(path: &Path) -> Result<BTreeMap<Flag, bool>> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| LanternError::persistence_read(path, e))?;
        let file: FlagsFile =
            toml::from_str(&content).map_err(|e| LanternError::persistence_read(path, e))?;

        let mut values = default_values();
        for flag in Flag::ALL {
            if let Some(value) = file.flags.get(flag.key()) {
                values.insert(flag, *value);
            }
        }
        Ok(values)
    }

    fn write(&self, values: &BTreeMap<Flag, bool>) -> Result<()> {
        let file = FlagsFile {
            flags: values
                .iter()
                .map(|(flag, value)| (flag.key().to_string(), *value))
                .collect(),
        };
        let content = toml::to_string(&file)
            .map_err(|e| LanternError::persistence_write(&self.path, e))?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, content)
            .map_err(|e| LanternError::persistence_write(&self.path, e))
    }
}

impl ConfigStore for TomlConfigStore {
    fn get(&self, flag: Flag) -> bool {
        self.values
            .read()
            .get(&flag)
            .copied()
            .unwrap_or_else(|| flag.default_value())
    }

    fn set(&self, flag: Flag, value: bool) {
        let mut values = self.values.write();
        values.insert(flag, value);
        if let Err(e) = self.write(&values) {
            tracing::warn!(flag = flag.key(), error = %e, "failed to persist flag");
        }
    }
}
