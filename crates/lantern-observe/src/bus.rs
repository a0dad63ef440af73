//! Event bus: named broadcast topics with explicit, cancellable subscriptions.
//!
//! The host application owns the bus and hands it to the aggregator. A
//! handler runs synchronously on the emitting thread, in registration order,
//! so events on one topic are processed in broadcast order.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use lantern_core::{Category, LanternError, Payload};
use parking_lot::RwLock;

// =============================================================================
// Topic
// =============================================================================

/// A named broadcast topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// An analytics call was made.
    AnalyticsReceived,
    /// An error was reported.
    ErrorReceived,
    /// Network activity happened.
    NetworkReceived,
    /// A log line was written.
    LogReceived,
    /// A UI-test hook fired.
    UiTestReceived,
    /// The application is about to terminate. Carries no data.
    AppWillTerminate,
}

impl Topic {
    /// Every topic the aggregator listens to.
    pub const ALL: [Self; 6] = [
        Self::AnalyticsReceived,
        Self::ErrorReceived,
        Self::NetworkReceived,
        Self::LogReceived,
        Self::UiTestReceived,
        Self::AppWillTerminate,
    ];

    /// Returns the wire name of this topic.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AnalyticsReceived => "analytics-received",
            Self::ErrorReceived => "error-received",
            Self::NetworkReceived => "network-received",
            Self::LogReceived => "log-received",
            Self::UiTestReceived => "ui-test-received",
            Self::AppWillTerminate => "app-will-terminate",
        }
    }

    /// Returns the category a data topic feeds, or `None` for lifecycle topics.
    #[must_use]
    pub const fn category(&self) -> Option<Category> {
        match self {
            Self::AnalyticsReceived => Some(Category::Analytics),
            Self::ErrorReceived => Some(Category::Error),
            Self::NetworkReceived => Some(Category::Network),
            Self::LogReceived => Some(Category::Log),
            Self::UiTestReceived => Some(Category::UiTest),
            Self::AppWillTerminate => None,
        }
    }

    /// Returns the data topic that feeds `category`.
    #[must_use]
    pub const fn for_category(category: Category) -> Self {
        match category {
            Category::Analytics => Self::AnalyticsReceived,
            Category::Error => Self::ErrorReceived,
            Category::Network => Self::NetworkReceived,
            Category::Log => Self::LogReceived,
            Category::UiTest => Self::UiTestReceived,
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Topic {
    type Err = LanternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| LanternError::config(format!("unknown topic: {s}")))
    }
}

// =============================================================================
// EventBus
// =============================================================================

/// Unique identifier of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(uuid::Uuid);

impl SubscriptionId {
    fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

type Handler = Arc<dyn Fn(&Payload) + Send + Sync>;

#[derive(Default)]
struct BusInner {
    handlers: RwLock<HashMap<Topic, Vec<(SubscriptionId, Handler)>>>,
}

impl BusInner {
    fn remove(&self, topic: Topic, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.write();
        let Some(list) = handlers.get_mut(&topic) else {
            return false;
        };
        let before = list.len();
        list.retain(|(sid, _)| *sid != id);
        before != list.len()
    }
}

/// Publish/subscribe hub for host broadcasts.
///
/// Cloning yields another handle to the same bus.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Arc<BusInner>,
}

impl EventBus {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `topic`.
    ///
    /// The handler stays registered until the returned [`Subscription`] is
    /// cancelled or dropped.
    pub fn subscribe<F>(&self, topic: Topic, handler: F) -> Subscription
    where
        F: Fn(&Payload) + Send + Sync + 'static,
    {
        let id = SubscriptionId::new();
        self.inner
            .handlers
            .write()
            .entry(topic)
            .or_default()
            .push((id, Arc::new(handler)));

        tracing::debug!(topic = %topic, id = %id, "subscribed");

        Subscription {
            id,
            topic,
            bus: Arc::downgrade(&self.inner),
        }
    }

    /// Broadcasts `payload` on `topic`.
    ///
    /// Handlers are invoked outside the registry lock, so a handler may
    /// subscribe or cancel without deadlocking.
    pub fn emit(&self, topic: Topic, payload: &Payload) {
        let handlers: Vec<Handler> = self
            .inner
            .handlers
            .read()
            .get(&topic)
            .map(|list| list.iter().map(|(_, h)| Arc::clone(h)).collect())
            .unwrap_or_default();

        tracing::trace!(topic = %topic, handlers = handlers.len(), "emit");

        for handler in handlers {
            handler(payload);
        }
    }

    /// Broadcasts on a topic given by its wire name.
    ///
    /// Returns false, and drops the payload, if the name is unknown.
    pub fn emit_named(&self, name: &str, payload: &Payload) -> bool {
        match name.parse::<Topic>() {
            Ok(topic) => {
                self.emit(topic, payload);
                true
            }
            Err(_) => {
                tracing::debug!(topic = name, "dropping broadcast on unknown topic");
                false
            }
        }
    }

    /// Returns the number of handlers registered for `topic`.
    #[must_use]
    pub fn handler_count(&self, topic: Topic) -> usize {
        self.inner.handlers.read().get(&topic).map_or(0, Vec::len)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let handlers = self.inner.handlers.read();
        let counts: HashMap<&str, usize> =
            handlers.iter().map(|(t, l)| (t.as_str(), l.len())).collect();
        f.debug_struct("EventBus").field("handlers", &counts).finish()
    }
}

// =============================================================================
// Subscription
// =============================================================================

/// Handle to a registered handler. Dropping it unregisters the handler.
#[must_use = "dropping a Subscription unregisters its handler"]
#[derive(Debug)]
pub struct Subscription {
    id: SubscriptionId,
    topic: Topic,
    bus: Weak<BusInner>,
}

impl Subscription {
    /// Returns the subscription ID.
    pub const fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Returns the subscribed topic.
    pub const fn topic(&self) -> Topic {
        self.topic
    }

    /// Returns true while the handler is still registered.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.bus.upgrade().is_some_and(|bus| {
            bus.handlers
                .read()
                .get(&self.topic)
                .is_some_and(|list| list.iter().any(|(id, _)| *id == self.id))
        })
    }

    /// Unregisters the handler now.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            if bus.remove(self.topic, self.id) {
                tracing::debug!(topic = %self.topic, id = %self.id, "unsubscribed");
            }
        }
    }
}
