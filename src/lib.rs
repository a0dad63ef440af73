//! Lantern: In-Process Debugging Overlay Pipeline
//!
//! Collects diagnostic events broadcast by a host application, keeps them
//! in time-ordered per-category stores, persists them across restarts and
//! presents them through a filterable list and a settings catalogue.
//!
//! # Quick Start
//!
//! ```rust
//! use lantern::prelude::*;
//!
//! let dir = std::env::temp_dir().join("lantern-quick-start");
//! let debugger = Debugger::new(LanternConfig::new().with_storage_dir(&dir))?;
//!
//! let mut payload = Payload::new();
//! payload.insert("eventName".into(), "checkout".into());
//! debugger.emit_topic(Topic::AnalyticsReceived, &payload);
//!
//! debugger.on_app_backgrounded();
//! # Ok::<(), LanternError>(())
//! ```

pub use lantern_core as core;
pub use lantern_observe as observe;
pub use lantern_present as present;

/// Prelude module for common imports.
pub mod prelude {
    pub use lantern_core::{
        AnalyticsItem, Category, CategoryCount, CategoryStore, ConfigStore, DiagnosticItem, Flag,
        JsonFileStore, LanternConfig, LanternError, MemoryConfigStore, Payload,
        PersistenceAdapter, TomlConfigStore,
    };
    pub use lantern_observe::{DebuggerData, DebuggerEvent, EventBus, Subscription, Topic};
    pub use lantern_present::{
        ConfirmOption, ConfirmationPrompt, ConfirmationRequest, Debugger, HostMetadata,
        ListPresenter, ListSurface, SettingsRegistry,
    };
}
