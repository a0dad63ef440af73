//! Debugger test harness.
//!
//! # Toyota Way: Built-in Quality (品質の作り込み)
//! Quality cannot be inspected in; it must be built in.
//!
//! The harness owns storage and flags across "process restarts": every
//! [`DebuggerTestHarness::start`] builds a fresh [`Debugger`] over the same
//! storage, the way a relaunched application would find it.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use lantern_core::{
    Category, CategoryCount, ConfigStore, JsonFileStore, LanternConfig, MemoryConfigStore, Payload,
    PersistenceAdapter,
};
use lantern_observe::DebuggerEvent;
use lantern_present::{Debugger, HostMetadata};
use tempfile::TempDir;
use tokio::sync::broadcast;

use crate::chaos::{FaultConfig, FaultyPersistence, MemoryPersistence};
use crate::error::{Result, TestError};

/// Where persisted documents go.
#[derive(Debug)]
enum Storage {
    Memory(MemoryPersistence),
    Disk(TempDir),
}

/// Test harness for debugger lifecycle testing.
pub struct DebuggerTestHarness {
    storage: Storage,
    flags: Arc<dyn ConfigStore>,
    refresh_delay: Duration,
    faults: FaultConfig,
    host: HostMetadata,
}

impl DebuggerTestHarness {
    /// Creates a new test harness builder.
    #[must_use]
    pub fn builder() -> DebuggerTestHarnessBuilder {
        DebuggerTestHarnessBuilder::default()
    }

    /// Creates a harness with in-memory storage and a zero refresh delay.
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage: Storage::Memory(MemoryPersistence::new()),
            flags: Arc::new(MemoryConfigStore::new()),
            refresh_delay: Duration::ZERO,
            faults: FaultConfig::default(),
            host: HostMetadata::default(),
        }
    }

    /// Starts a debugger over the harness storage.
    ///
    /// Call it again after dropping the previous debugger to simulate a
    /// process restart.
    #[must_use]
    pub fn start(&self) -> Debugger {
        let mut config = LanternConfig::new().with_refresh_delay(self.refresh_delay);
        if let Some(dir) = self.storage_dir() {
            config = config.with_storage_dir(dir);
        }

        let persistence: Arc<dyn PersistenceAdapter> = match &self.storage {
            Storage::Memory(memory) => {
                Arc::new(FaultyPersistence::new(memory.clone(), self.faults))
            }
            Storage::Disk(dir) => Arc::new(FaultyPersistence::new(
                JsonFileStore::new(dir.path()),
                self.faults,
            )),
        };

        Debugger::with_parts(config, Arc::clone(&self.flags), persistence, self.host.clone())
    }

    /// Returns the flag store shared by every started debugger.
    #[must_use]
    pub fn flags(&self) -> &Arc<dyn ConfigStore> {
        &self.flags
    }

    /// Returns the storage directory when storage is on disk.
    #[must_use]
    pub fn storage_dir(&self) -> Option<&Path> {
        match &self.storage {
            Storage::Disk(dir) => Some(dir.path()),
            Storage::Memory(_) => None,
        }
    }

    /// Writes `content` verbatim as the persisted document for `category`.
    ///
    /// # Errors
    /// Returns a harness error when storage is in memory, or an I/O error
    /// if the file cannot be written.
    pub fn write_raw_document(&self, category: Category, content: &str) -> Result<PathBuf> {
        let dir = self
            .storage_dir()
            .ok_or_else(|| TestError::harness("raw documents need on-disk storage"))?;
        let path = JsonFileStore::new(dir).path_for(category);
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Returns the in-memory storage when storage is in memory.
    #[must_use]
    pub fn memory(&self) -> Option<&MemoryPersistence> {
        match &self.storage {
            Storage::Memory(memory) => Some(memory),
            Storage::Disk(_) => None,
        }
    }
}

impl Default for DebuggerTestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for test harness.
#[derive(Debug, Default)]
pub struct DebuggerTestHarnessBuilder {
    on_disk: bool,
    refresh_delay: Option<Duration>,
    faults: FaultConfig,
    host: Option<HostMetadata>,
}

impl DebuggerTestHarnessBuilder {
    /// Persists to JSON files in a temporary directory.
    #[must_use]
    pub const fn on_disk(mut self) -> Self {
        self.on_disk = true;
        self
    }

    /// Sets the refresh delay. Defaults to zero.
    #[must_use]
    pub const fn with_refresh_delay(mut self, delay: Duration) -> Self {
        self.refresh_delay = Some(delay);
        self
    }

    /// Injects persistence faults.
    #[must_use]
    pub const fn with_faults(mut self, faults: FaultConfig) -> Self {
        self.faults = faults;
        self
    }

    /// Sets host metadata.
    #[must_use]
    pub fn with_host(mut self, host: HostMetadata) -> Self {
        self.host = Some(host);
        self
    }

    /// Builds the test harness.
    ///
    /// # Errors
    /// Returns an error if the temporary directory cannot be created.
    pub fn build(self) -> Result<DebuggerTestHarness> {
        let storage = if self.on_disk {
            Storage::Disk(tempfile::tempdir()?)
        } else {
            Storage::Memory(MemoryPersistence::new())
        };

        Ok(DebuggerTestHarness {
            storage,
            flags: Arc::new(MemoryConfigStore::new()),
            refresh_delay: self.refresh_delay.unwrap_or(Duration::ZERO),
            faults: self.faults,
            host: self.host.unwrap_or_default(),
        })
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Builds an analytics payload.
#[must_use]
pub fn analytics_payload(event_name: &str, created_at: Option<&str>) -> Payload {
    let mut payload = Payload::new();
    payload.insert("eventName".into(), event_name.into());
    if let Some(ts) = created_at {
        payload.insert("createdAt".into(), ts.into());
    }
    payload
}

/// Waits for the next count refresh, skipping other events.
///
/// # Errors
/// Returns [`TestError::Timeout`] if none arrives within `timeout`, or
/// [`TestError::ChannelClosed`] if the aggregator is gone.
pub async fn next_counts(
    events: &mut broadcast::Receiver<DebuggerEvent>,
    timeout: Duration,
) -> Result<Vec<CategoryCount>> {
    let wait = async {
        loop {
            match events.recv().await {
                Ok(DebuggerEvent::CountsRefreshed(counts)) => return Ok(counts),
                Ok(DebuggerEvent::ItemAppended { .. }) => {}
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "test receiver lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return Err(TestError::ChannelClosed),
            }
        }
    };

    tokio::time::timeout(timeout, wait)
        .await
        .map_err(|_| TestError::Timeout(timeout))?
}

/// Drains every pending event without waiting.
#[must_use]
pub fn drain(events: &mut broadcast::Receiver<DebuggerEvent>) -> Vec<DebuggerEvent> {
    std::iter::from_fn(|| events.try_recv().ok()).collect()
}
