//! Aggregator: owns every category store and orchestrates
//! ingest, sort, persist and notify.
//!
//! # Toyota Way: Jidoka
//! No failure in here reaches the host application. Undecodable payloads
//! are dropped, unreadable documents start empty, failed writes are logged.

use std::collections::BTreeMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use lantern_core::{
    Category, CategoryCount, CategoryStore, ConfigStore, Decoded, Flag, LanternConfig, Payload,
    PersistenceAdapter, Result, decode,
};
use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::bus::{EventBus, Subscription, Topic};
use crate::debounce::Debouncer;
use crate::events::DebuggerEvent;

type Stores = Arc<RwLock<BTreeMap<Category, CategoryStore>>>;

/// Owner of all category stores.
///
/// Ingestion is serialized per store by the write lock; queries take the
/// read lock and return a copy, so callers never observe a half-sorted
/// sequence.
pub struct DebuggerData {
    stores: Stores,
    flags: Arc<dyn ConfigStore>,
    persistence: Arc<dyn PersistenceAdapter>,
    event_tx: broadcast::Sender<DebuggerEvent>,
    debouncer: Debouncer,
    refresh_delay: Duration,
    subscriptions: Mutex<Vec<Subscription>>,
}

impl DebuggerData {
    /// Creates the aggregator, rehydrating every category from `persistence`.
    ///
    /// A category whose document is missing or unreadable starts empty.
    #[must_use]
    pub fn new(
        config: &LanternConfig,
        flags: Arc<dyn ConfigStore>,
        persistence: Arc<dyn PersistenceAdapter>,
    ) -> Self {
        let stores = Category::ALL
            .into_iter()
            .map(|category| (category, rehydrate(persistence.as_ref(), category)))
            .collect();
        let (event_tx, _) = broadcast::channel(config.event_capacity.max(1));

        Self {
            stores: Arc::new(RwLock::new(stores)),
            flags,
            persistence,
            event_tx,
            debouncer: Debouncer::new(),
            refresh_delay: config.refresh_delay,
            subscriptions: Mutex::new(Vec::new()),
        }
    }

    // =========================================================================
    // Bus wiring
    // =========================================================================

    /// Subscribes to every data topic and the terminate topic on `bus`.
    ///
    /// Handlers hold a weak reference, so the bus never keeps the
    /// aggregator alive. Attaching again replaces the previous wiring.
    pub fn attach(self: &Arc<Self>, bus: &EventBus) {
        let mut subscriptions = Vec::with_capacity(Topic::ALL.len());

        for topic in Topic::ALL {
            let weak: Weak<Self> = Arc::downgrade(self);
            let subscription = match topic.category() {
                Some(category) => bus.subscribe(topic, move |payload| {
                    if let Some(data) = weak.upgrade() {
                        data.ingest(category, payload);
                    }
                }),
                None => bus.subscribe(topic, move |_| {
                    if let Some(data) = weak.upgrade() {
                        data.save();
                    }
                }),
            };
            subscriptions.push(subscription);
        }

        *self.subscriptions.lock() = subscriptions;
        tracing::debug!(topics = Topic::ALL.len(), "aggregator attached to bus");
    }

    /// Cancels every bus subscription.
    pub fn detach(&self) {
        let dropped = std::mem::take(&mut *self.subscriptions.lock());
        if !dropped.is_empty() {
            tracing::debug!(topics = dropped.len(), "aggregator detached from bus");
        }
    }

    /// Returns true while subscribed to a bus.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.subscriptions.lock().iter().any(Subscription::is_active)
    }

    /// Subscribes to notification events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DebuggerEvent> {
        self.event_tx.subscribe()
    }

    // =========================================================================
    // Ingestion and queries
    // =========================================================================

    /// Decodes `payload` into `category` and appends it.
    ///
    /// Returns true if an item was appended. Undecodable payloads and
    /// reserved categories return false and leave every store untouched.
    pub fn ingest(&self, category: Category, payload: &Payload) -> bool {
        let item = match decode(category, payload) {
            Ok(Decoded::Item(item)) => item,
            Ok(Decoded::Reserved) => {
                tracing::trace!(category = %category, "no ingestion for reserved category");
                return false;
            }
            Err(e) => {
                tracing::debug!(category = %category, error = %e, "dropping payload");
                return false;
            }
        };

        let count = {
            let mut stores = self.stores.write();
            let store = stores
                .entry(category)
                .or_insert_with(|| CategoryStore::new(category));
            store.ingest(item);
            store.len()
        };

        tracing::trace!(category = %category, count, "item appended");
        let _ = self.event_tx.send(DebuggerEvent::ItemAppended { category });
        self.refresh();
        true
    }

    /// Returns a copy of the store for `category`.
    #[must_use]
    pub fn query(&self, category: Category) -> CategoryStore {
        self.stores
            .read()
            .get(&category)
            .cloned()
            .unwrap_or_else(|| CategoryStore::new(category))
    }

    /// Returns `{category, count}` for every category, in category order.
    #[must_use]
    pub fn counts(&self) -> Vec<CategoryCount> {
        counts_of(&self.stores.read())
    }

    /// Returns the item count per category.
    #[must_use]
    pub fn category_counts(&self) -> BTreeMap<Category, usize> {
        self.counts()
            .into_iter()
            .map(|c| (c.category, c.count))
            .collect()
    }

    /// Clears one category. Nothing is persisted until the next save.
    pub fn remove_all_in(&self, category: Category) {
        if let Some(store) = self.stores.write().get_mut(&category) {
            store.remove_all();
        }
        tracing::info!(category = %category, "category cleared");
        self.refresh();
    }

    /// Clears every category. Nothing is persisted until the next save.
    pub fn remove_all(&self) {
        for store in self.stores.write().values_mut() {
            store.remove_all();
        }
        tracing::info!("all categories cleared");
        self.refresh();
    }

    // =========================================================================
    // Notification
    // =========================================================================

    /// Schedules a count refresh after the configured delay.
    pub fn refresh(&self) {
        self.refresh_with_delay(self.refresh_delay);
    }

    /// Schedules a count refresh after `delay`, superseding any pending one.
    ///
    /// Counts are read when the refresh fires, not when it is scheduled.
    pub fn refresh_with_delay(&self, delay: Duration) {
        let stores = Arc::clone(&self.stores);
        let event_tx = self.event_tx.clone();
        self.debouncer.schedule(delay, move || {
            let counts = counts_of(&stores.read());
            tracing::trace!(categories = counts.len(), "counts refreshed");
            let _ = event_tx.send(DebuggerEvent::CountsRefreshed(counts));
        });
    }

    /// Returns the configured refresh delay.
    #[must_use]
    pub const fn refresh_delay(&self) -> Duration {
        self.refresh_delay
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Returns true if saved data is retained across restarts.
    #[must_use]
    pub fn is_retention_enabled(&self) -> bool {
        self.flags.get(Flag::StoreAnalytics)
    }

    /// Returns the injected flag store.
    #[must_use]
    pub fn flags(&self) -> &Arc<dyn ConfigStore> {
        &self.flags
    }

    /// Writes every store to durable storage when retention is on.
    ///
    /// With retention off the persisted documents are discarded instead,
    /// so the next start is empty. A count refresh follows either way.
    pub fn save(&self) {
        let snapshot = self.snapshot();
        write_snapshot(self.persistence.as_ref(), self.is_retention_enabled(), &snapshot);
        self.refresh();
    }

    /// Like [`save`](Self::save), but writes on the blocking thread pool.
    ///
    /// Stores are copied before returning, so later ingestion is not
    /// part of this save. Without a tokio runtime the write happens inline
    /// and `None` is returned.
    pub fn save_in_background(&self) -> Option<JoinHandle<()>> {
        let snapshot = self.snapshot();
        let retain = self.is_retention_enabled();

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let persistence = Arc::clone(&self.persistence);
                Some(runtime.spawn_blocking(move || {
                    write_snapshot(persistence.as_ref(), retain, &snapshot);
                }))
            }
            Err(_) => {
                write_snapshot(self.persistence.as_ref(), retain, &snapshot);
                None
            }
        };

        self.refresh();
        handle
    }

    /// Renders every store as one pretty JSON object keyed by category.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn export_json(&self) -> Result<String> {
        let stores = self.stores.read();
        let mut root = serde_json::Map::new();
        for (category, store) in stores.iter() {
            let mut document = serde_json::Map::new();
            document.insert("items".into(), serde_json::to_value(store.items())?);
            root.insert(category.as_str().to_string(), document.into());
        }
        Ok(serde_json::to_string_pretty(&root)?)
    }

    fn snapshot(&self) -> Vec<CategoryStore> {
        self.stores.read().values().cloned().collect()
    }
}

impl std::fmt::Debug for DebuggerData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebuggerData")
            .field("counts", &self.category_counts())
            .field("refresh_delay", &self.refresh_delay)
            .field("attached", &self.is_attached())
            .finish_non_exhaustive()
    }
}

impl Drop for DebuggerData {
    fn drop(&mut self) {
        self.debouncer.cancel();
    }
}

fn rehydrate(persistence: &dyn PersistenceAdapter, category: Category) -> CategoryStore {
    match persistence.load(category) {
        Ok(Some(store)) => {
            tracing::info!(category = %category, count = store.len(), "rehydrated category");
            store
        }
        Ok(None) => CategoryStore::new(category),
        Err(e) => {
            tracing::warn!(category = %category, error = %e, "starting with empty store");
            CategoryStore::new(category)
        }
    }
}

fn write_snapshot(persistence: &dyn PersistenceAdapter, retain: bool, snapshot: &[CategoryStore]) {
    for store in snapshot {
        let category = store.category();
        let result = if retain {
            persistence.store(store)
        } else {
            persistence.discard(category)
        };
        match result {
            Ok(()) if retain => {
                tracing::info!(category = %category, count = store.len(), "saved category");
            }
            Ok(()) => {
                tracing::debug!(category = %category, "retention off, discarded document");
            }
            Err(e) => {
                tracing::warn!(category = %category, error = %e, "save failed");
            }
        }
    }
}

fn counts_of(stores: &BTreeMap<Category, CategoryStore>) -> Vec<CategoryCount> {
    Category::ALL
        .into_iter()
        .map(|category| {
            CategoryCount::new(category, stores.get(&category).map_or(0, CategoryStore::len))
        })
        .collect()
}
