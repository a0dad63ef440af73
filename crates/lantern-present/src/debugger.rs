//! Composition root: wires configuration, flags, bus, aggregator and
//! settings, and exposes the host-facing surface.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use lantern_core::{
    ConfigStore, JsonFileStore, LanternConfig, MemoryConfigStore, Payload, PersistenceAdapter,
    Result, TomlConfigStore,
};
use lantern_observe::{DebuggerData, DebuggerEvent, EventBus, Topic};
use tokio::sync::broadcast;

use crate::list::{ListPresenter, ListSurface};
use crate::settings::{HostMetadata, SettingsRegistry};

/// In-process debugger.
///
/// Owns the event bus the host broadcasts on and the aggregator listening
/// to it. The overlay starts disabled.
pub struct Debugger {
    config: LanternConfig,
    flags: Arc<dyn ConfigStore>,
    bus: EventBus,
    data: Arc<DebuggerData>,
    settings: SettingsRegistry,
    enabled: AtomicBool,
}

impl Debugger {
    /// Builds a debugger from configuration.
    ///
    /// Flags live in `flags_file` when set, in memory otherwise. Category
    /// stores persist as JSON documents in the storage directory, which
    /// defaults to the documents directory and falls back to the local
    /// data directory.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or no storage
    /// directory can be resolved.
    pub fn new(config: LanternConfig) -> Result<Self> {
        config.validate()?;
        let storage_dir = config.resolve_storage_dir()?;

        let flags: Arc<dyn ConfigStore> = match &config.flags_file {
            Some(path) => Arc::new(TomlConfigStore::open(path)),
            None => Arc::new(MemoryConfigStore::new()),
        };
        let persistence = Arc::new(JsonFileStore::new(&storage_dir));

        tracing::info!(storage_dir = %storage_dir.display(), "debugger starting");
        Ok(Self::with_parts(config, flags, persistence, HostMetadata::default()))
    }

    /// Builds a debugger from explicit collaborators.
    #[must_use]
    pub fn with_parts(
        config: LanternConfig,
        flags: Arc<dyn ConfigStore>,
        persistence: Arc<dyn PersistenceAdapter>,
        host: HostMetadata,
    ) -> Self {
        let bus = EventBus::new();
        let data = Arc::new(DebuggerData::new(&config, Arc::clone(&flags), persistence));
        data.attach(&bus);
        let settings = SettingsRegistry::new(Arc::clone(&flags), Arc::clone(&data), host);

        Self {
            config,
            flags,
            bus,
            data,
            settings,
            enabled: AtomicBool::new(false),
        }
    }

    /// Replaces the host metadata shown in settings.
    #[must_use]
    pub fn with_host(mut self, host: HostMetadata) -> Self {
        self.settings =
            SettingsRegistry::new(Arc::clone(&self.flags), Arc::clone(&self.data), host);
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &LanternConfig {
        &self.config
    }

    /// Returns the flag store.
    #[must_use]
    pub fn flags(&self) -> &Arc<dyn ConfigStore> {
        &self.flags
    }

    /// Returns the event bus the host broadcasts on.
    #[must_use]
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Returns the aggregator.
    #[must_use]
    pub fn data(&self) -> &Arc<DebuggerData> {
        &self.data
    }

    /// Returns the settings registry.
    #[must_use]
    pub fn settings(&self) -> &SettingsRegistry {
        &self.settings
    }

    /// Broadcasts `payload` on the topic named `topic`.
    ///
    /// Returns false if the topic name is unknown.
    pub fn emit(&self, topic: &str, payload: &Payload) -> bool {
        self.bus.emit_named(topic, payload)
    }

    /// Broadcasts `payload` on `topic`.
    pub fn emit_topic(&self, topic: Topic, payload: &Payload) {
        self.bus.emit(topic, payload);
    }

    /// Subscribes to aggregator notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DebuggerEvent> {
        self.data.subscribe()
    }

    /// Creates a list presenter over `surface`.
    #[must_use]
    pub fn presenter<S: ListSurface>(&self, surface: S) -> ListPresenter<S> {
        ListPresenter::new(Arc::clone(&self.data), surface)
    }

    /// Host moved to the background.
    pub fn on_app_backgrounded(&self) {
        tracing::debug!("app backgrounded");
        self.data.save();
    }

    /// Host is about to terminate.
    pub fn on_app_terminating(&self) {
        tracing::debug!("app terminating");
        self.bus.emit(Topic::AppWillTerminate, &Payload::new());
    }

    /// Returns true if the overlay is enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Enables or disables the overlay.
    pub fn set_enabled(&self, enabled: bool) {
        if self.enabled.swap(enabled, Ordering::SeqCst) != enabled {
            tracing::info!(enabled, "overlay toggled");
        }
    }
}

impl std::fmt::Debug for Debugger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debugger")
            .field("config", &self.config)
            .field("data", &self.data)
            .field("enabled", &self.is_enabled())
            .finish_non_exhaustive()
    }
}

impl Drop for Debugger {
    fn drop(&mut self) {
        self.data.detach();
    }
}
