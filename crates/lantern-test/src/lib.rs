// Iron Lotus: Allow unwrap/expect in tests for clear failure messages
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! # lantern-test
//!
//! Testing infrastructure for the Lantern debugger pipeline.
//!
//! This crate provides:
//! - **Test harness**: storage and flags that survive simulated restarts
//! - **Fault injection**: persistence adapters that fail on demand
//! - **Test doubles**: a recording list surface and a scripted prompt
//! - **Falsification tests**: scenario tests under `tests/`
//!
//! ## Iron Lotus Framework
//!
//! - **Built-in Quality** (品質の作り込み): Quality cannot be inspected in
//! - **Popperian Falsification**: Tests designed to refute claims
//!
//! ## Example
//!
//! ```rust
//! use lantern_core::Category;
//! use lantern_test::{DebuggerTestHarness, analytics_payload};
//!
//! let harness = DebuggerTestHarness::new();
//! let debugger = harness.start();
//! debugger.emit("analytics-received", &analytics_payload("launch", None));
//! debugger.on_app_backgrounded();
//! drop(debugger);
//!
//! let restarted = harness.start();
//! assert_eq!(restarted.data().query(Category::Analytics).len(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod chaos;
pub mod doubles;
pub mod error;
pub mod harness;

pub use chaos::{FaultConfig, FaultyPersistence, MemoryPersistence};
pub use doubles::{RecordingSurface, ScriptedPrompt, SurfaceLog};
pub use error::{Result, TestError};
pub use harness::{
    DebuggerTestHarness, DebuggerTestHarnessBuilder, analytics_payload, drain, next_counts,
};

/// Installs a `tracing` subscriber for tests, filtered by `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
