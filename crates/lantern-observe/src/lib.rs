// Iron Lotus: Allow unwrap/expect in tests for clear failure messages
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! # lantern-observe
//!
//! Event plumbing for the Lantern debugger pipeline.
//!
//! This crate provides:
//! - **Event bus**: named broadcast topics with cancellable subscriptions
//! - **Aggregator**: [`DebuggerData`] owns every category store and turns
//!   broadcasts into sorted, persisted, announced items
//! - **Debounce**: last-write-wins coalescing of the count refresh
//!
//! ## Iron Lotus Framework
//!
//! - **Jidoka** (自働化): Failures stop at the aggregator, never the host
//! - **Heijunka** (平準化): Bursts of ingestion level out into one refresh
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use lantern_core::{Category, JsonFileStore, LanternConfig, MemoryConfigStore, Payload};
//! use lantern_observe::{DebuggerData, EventBus, Topic};
//!
//! let dir = std::env::temp_dir().join("lantern-doc");
//! let data = Arc::new(DebuggerData::new(
//!     &LanternConfig::new().with_storage_dir(&dir),
//!     Arc::new(MemoryConfigStore::new()),
//!     Arc::new(JsonFileStore::new(&dir)),
//! ));
//!
//! let bus = EventBus::new();
//! data.attach(&bus);
//!
//! let mut payload = Payload::new();
//! payload.insert("eventName".into(), "launch".into());
//! bus.emit(Topic::AnalyticsReceived, &payload);
//!
//! assert!(!data.query(Category::Analytics).is_empty());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod aggregator;
pub mod bus;
pub mod debounce;
pub mod events;

pub use aggregator::DebuggerData;
pub use bus::{EventBus, Subscription, SubscriptionId, Topic};
pub use debounce::Debouncer;
pub use events::DebuggerEvent;
