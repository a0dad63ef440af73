// Iron Lotus: Allow unwrap/expect in tests for clear failure messages
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! # lantern-core
//!
//! Core data primitives for the Lantern in-process debugger pipeline.
//!
//! This crate provides the pieces with no asynchronous behaviour:
//!
//! - [`DiagnosticItem`] and [`AnalyticsItem`]: typed records decoded from
//!   broadcast payloads
//! - [`CategoryStore`]: the time-ordered item sequence for one [`Category`]
//! - [`PersistenceAdapter`] / [`JsonFileStore`]: durable JSON documents
//! - [`ConfigStore`]: injected get/set access to process-wide [`Flag`]s
//! - [`LanternConfig`]: validated pipeline configuration
//!
//! ## Iron Lotus Framework
//!
//! - **Jidoka**: Explicit errors, no panics; the debugger never takes the
//!   host application down with it
//! - **Poka-Yoke**: Configuration validated at load time
//!
//! ## Example
//!
//! ```rust
//! use lantern_core::{decode, Category, CategoryStore, Decoded, Payload};
//!
//! let mut payload = Payload::new();
//! payload.insert("eventName".into(), "launch".into());
//!
//! let mut store = CategoryStore::new(Category::Analytics);
//! if let Ok(Decoded::Item(item)) = decode(Category::Analytics, &payload) {
//!     store.ingest(item);
//! }
//! assert_eq!(store.len(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod flags;
pub mod item;
pub mod persist;
pub mod store;
pub mod types;

pub use config::{DEFAULT_EVENT_CAPACITY, DEFAULT_REFRESH_DELAY, LanternConfig};
pub use error::{LanternError, Result};
pub use flags::{ConfigStore, Flag, MemoryConfigStore, TomlConfigStore};
pub use item::{
    AnalyticsItem, Decoded, DiagnosticItem, Payload, TIMESTAMP_FORMAT, Timestamp, decode,
    timestamp,
};
pub use persist::{JsonFileStore, PersistenceAdapter};
pub use store::CategoryStore;
pub use types::{Category, CategoryCount};
