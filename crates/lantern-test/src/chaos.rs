//! Fault injection for persistence resilience testing.
//!
//! # Toyota Way: Jidoka (自働化)
//! The pipeline must keep running when storage misbehaves. These adapters
//! make storage misbehave on demand.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use lantern_core::{Category, CategoryStore, LanternError, PersistenceAdapter, Result};
use parking_lot::RwLock;

/// Which persistence operations fail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FaultConfig {
    /// Every load fails.
    pub fail_reads: bool,
    /// Every store fails.
    pub fail_writes: bool,
    /// Every discard fails.
    pub fail_discards: bool,
}

impl FaultConfig {
    /// Fails loads only.
    #[must_use]
    pub const fn reads() -> Self {
        Self {
            fail_reads: true,
            fail_writes: false,
            fail_discards: false,
        }
    }

    /// Fails stores only.
    #[must_use]
    pub const fn writes() -> Self {
        Self {
            fail_reads: false,
            fail_writes: true,
            fail_discards: false,
        }
    }

    /// Fails everything.
    #[must_use]
    pub const fn everything() -> Self {
        Self {
            fail_reads: true,
            fail_writes: true,
            fail_discards: true,
        }
    }
}

/// In-memory persistence that outlives the aggregator using it.
///
/// Clones share the same documents, so a clone handed to a second
/// aggregator behaves like storage surviving a restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryPersistence {
    documents: Arc<RwLock<BTreeMap<Category, CategoryStore>>>,
    writes: Arc<AtomicUsize>,
}

impl MemoryPersistence {
    /// Creates empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if a document exists for `category`.
    #[must_use]
    pub fn contains(&self, category: Category) -> bool {
        self.documents.read().contains_key(&category)
    }

    /// Returns the number of successful stores.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl PersistenceAdapter for MemoryPersistence {
    fn load(&self, category: Category) -> Result<Option<CategoryStore>> {
        Ok(self.documents.read().get(&category).cloned())
    }

    fn store(&self, store: &CategoryStore) -> Result<()> {
        self.documents.write().insert(store.category(), store.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn discard(&self, category: Category) -> Result<()> {
        self.documents.write().remove(&category);
        Ok(())
    }
}

/// Wraps an adapter and fails the operations named by a [`FaultConfig`].
#[derive(Debug)]
pub struct FaultyPersistence<P> {
    inner: P,
    faults: FaultConfig,
    injected: AtomicUsize,
}

impl<P: PersistenceAdapter> FaultyPersistence<P> {
    /// Wraps `inner`.
    #[must_use]
    pub const fn new(inner: P, faults: FaultConfig) -> Self {
        Self {
            inner,
            faults,
            injected: AtomicUsize::new(0),
        }
    }

    /// Returns the number of faults injected so far.
    #[must_use]
    pub fn injected(&self) -> usize {
        self.injected.load(Ordering::SeqCst)
    }

    fn inject(&self, category: Category, write: bool) -> LanternError {
        self.injected.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(category = %category, write, "injecting persistence fault");
        let path = format!("faulty/{category}");
        if write {
            LanternError::persistence_write(path, "injected fault")
        } else {
            LanternError::persistence_read(path, "injected fault")
        }
    }
}

impl<P: PersistenceAdapter> PersistenceAdapter for FaultyPersistence<P> {
    fn load(&self, category: Category) -> Result<Option<CategoryStore>> {
        if self.faults.fail_reads {
            return Err(self.inject(category, false));
        }
        self.inner.load(category)
    }

    fn store(&self, store: &CategoryStore) -> Result<()> {
        if self.faults.fail_writes {
            return Err(self.inject(store.category(), true));
        }
        self.inner.store(store)
    }

    fn discard(&self, category: Category) -> Result<()> {
        if self.faults.fail_discards {
            return Err(self.inject(category, true));
        }
        self.inner.discard(category)
    }
}
