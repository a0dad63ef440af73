//! Last-write-wins debounce.
//!
//! Every [`Debouncer::schedule`] takes a new ticket. A pending action only
//! runs if its ticket is still the latest when its timer fires; older timers
//! wake up and do nothing. Actions should read state at fire time so the
//! surviving one reflects everything scheduled before it.
//!
//! Timers run on the tokio runtime captured at construction, so callers on
//! plain threads still get coalescing. With no runtime anywhere, each timer
//! sleeps on its own thread.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::runtime::Handle;

/// Coalesces delayed actions to the most recently scheduled one.
#[derive(Debug, Clone)]
pub struct Debouncer {
    latest: Arc<AtomicU64>,
    runtime: Option<Handle>,
}

impl Debouncer {
    /// Creates a debouncer with nothing pending.
    ///
    /// Captures the current tokio runtime, if any, for its timers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            latest: Arc::new(AtomicU64::new(0)),
            runtime: Handle::try_current().ok(),
        }
    }

    /// Runs timers on `runtime` instead of the one captured at construction.
    #[must_use]
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Returns true if timers run on a tokio runtime.
    #[must_use]
    pub const fn has_runtime(&self) -> bool {
        self.runtime.is_some()
    }

    /// Schedules `action` to run after `delay`, superseding anything pending.
    ///
    /// A zero delay runs the action inline.
    pub fn schedule<F>(&self, delay: Duration, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;

        if delay.is_zero() {
            action();
            return;
        }

        let latest = Arc::clone(&self.latest);
        let fire = move || {
            if latest.load(Ordering::SeqCst) == ticket {
                action();
            } else {
                tracing::trace!(ticket, "debounced action superseded");
            }
        };

        if let Some(runtime) = self.runtime.clone().or_else(|| Handle::try_current().ok()) {
            runtime.spawn(async move {
                tokio::time::sleep(delay).await;
                fire();
            });
            return;
        }

        let spawned = std::thread::Builder::new()
            .name("lantern-debounce".into())
            .spawn(move || {
                std::thread::sleep(delay);
                fire();
            });
        if let Err(e) = spawned {
            tracing::warn!(ticket, error = %e, "failed to start debounce timer");
        }
    }

    /// Drops whatever is pending without scheduling anything new.
    pub fn cancel(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }

    /// Returns the latest ticket handed out.
    #[must_use]
    pub fn latest_ticket(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new()
    }
}
