//! Filtered list presenter.
//!
//! Shows the full store of one category on a [`ListSurface`]. Every filter
//! change re-renders, even to the same category, and there is no diffing:
//! the data source and the delegate always receive the whole store.

use std::sync::Arc;
use std::time::Duration;

use lantern_core::{Category, CategoryStore};
use lantern_observe::{DebuggerData, DebuggerEvent};
use tokio::sync::broadcast;

/// Estimated height of one list row.
pub const ESTIMATED_ROW_HEIGHT: f32 = 75.0;

/// Returns the item template registered for a category's rows.
///
/// Reserved categories have no template yet.
#[must_use]
pub const fn item_template(category: Category) -> Option<&'static str> {
    match category {
        Category::Analytics => Some("AnalyticsCell"),
        Category::Error | Category::Network | Category::Log | Category::UiTest => None,
    }
}

/// Rendering surface driven by the presenter.
pub trait ListSurface: Send {
    /// Registers a row template by identifier.
    fn register_item_template(&mut self, identifier: &str);

    /// Sets the estimated row height.
    fn set_estimated_row_height(&mut self, height: f32);

    /// Replaces the data source contents.
    fn update_data_source(&mut self, store: &CategoryStore);

    /// Replaces the contents seen by the secondary observer.
    fn update_delegate(&mut self, store: &CategoryStore);

    /// Marks `filter` as the active filter.
    fn highlight_filter(&mut self, filter: Category);
}

/// Presenter lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenterState {
    /// Surface not loaded yet. The filter is kept for the first render.
    Unloaded {
        /// Filter to show once loaded.
        filter: Category,
    },
    /// Surface loaded and showing `filter`.
    Loaded {
        /// Active filter.
        filter: Category,
    },
}

impl PresenterState {
    /// Returns the current filter.
    #[must_use]
    pub const fn filter(&self) -> Category {
        match self {
            Self::Unloaded { filter } | Self::Loaded { filter } => *filter,
        }
    }

    /// Returns true once loaded.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}

/// Presents one category of the aggregator on a surface.
pub struct ListPresenter<S> {
    data: Arc<DebuggerData>,
    surface: S,
    state: PresenterState,
}

impl<S: ListSurface> ListPresenter<S> {
    /// Creates an unloaded presenter with the analytics filter.
    #[must_use]
    pub fn new(data: Arc<DebuggerData>, surface: S) -> Self {
        Self {
            data,
            surface,
            state: PresenterState::Unloaded {
                filter: Category::default(),
            },
        }
    }

    /// Sets the initial filter.
    #[must_use]
    pub fn with_filter(mut self, filter: Category) -> Self {
        self.set_filter(filter);
        self
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn state(&self) -> PresenterState {
        self.state
    }

    /// Returns the current filter.
    #[must_use]
    pub const fn current_filter(&self) -> Category {
        self.state.filter()
    }

    /// Returns the surface.
    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Loads the surface: registers templates, renders, and asks for an
    /// immediate count refresh. Loading twice does nothing.
    pub fn on_load(&mut self) {
        let PresenterState::Unloaded { filter } = self.state else {
            tracing::debug!("presenter already loaded");
            return;
        };

        for template in Category::ALL.into_iter().filter_map(item_template) {
            self.surface.register_item_template(template);
        }
        self.surface.set_estimated_row_height(ESTIMATED_ROW_HEIGHT);

        self.state = PresenterState::Loaded { filter };
        self.render();
        self.surface.highlight_filter(filter);
        self.data.refresh_with_delay(Duration::ZERO);

        tracing::debug!(filter = %filter, "presenter loaded");
    }

    /// Switches the filter and re-renders, even if it did not change.
    pub fn set_filter(&mut self, filter: Category) {
        self.state = match self.state {
            PresenterState::Unloaded { .. } => PresenterState::Unloaded { filter },
            PresenterState::Loaded { .. } => PresenterState::Loaded { filter },
        };
        self.render();
    }

    /// Reacts to an aggregator event.
    ///
    /// Returns true if the surface was re-rendered.
    pub fn handle_event(&mut self, event: &DebuggerEvent) -> bool {
        match event {
            DebuggerEvent::ItemAppended { category }
                if self.state.is_loaded() && *category == self.current_filter() =>
            {
                self.render();
                true
            }
            _ => false,
        }
    }

    /// Follows aggregator events until the channel closes.
    ///
    /// After falling behind the presenter re-renders once, since the
    /// missed events can no longer be inspected.
    pub async fn follow(&mut self, events: &mut broadcast::Receiver<DebuggerEvent>) {
        loop {
            match events.recv().await {
                Ok(event) => {
                    self.handle_event(&event);
                }
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "presenter lagged behind events");
                    self.render();
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }

    /// Consumes the presenter, returning the surface.
    #[must_use]
    pub fn into_surface(self) -> S {
        self.surface
    }

    fn render(&mut self) {
        if !self.state.is_loaded() {
            return;
        }
        let store = self.data.query(self.current_filter());
        self.surface.update_data_source(&store);
        self.surface.update_delegate(&store);
        tracing::trace!(filter = %self.current_filter(), count = store.len(), "rendered");
    }
}

impl<S> std::fmt::Debug for ListPresenter<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListPresenter")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
