//! Notifications produced by the aggregator for the presentation layer.

use lantern_core::{Category, CategoryCount};

/// Event broadcast by [`DebuggerData`](crate::DebuggerData).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebuggerEvent {
    /// An item was appended to a category. Sent immediately, once per item.
    ItemAppended {
        /// Category that grew.
        category: Category,
    },
    /// Coalesced per-category counts. Sent after the refresh delay.
    CountsRefreshed(Vec<CategoryCount>),
}

impl DebuggerEvent {
    /// Returns the counts carried by a refresh, if this is one.
    #[must_use]
    pub fn counts(&self) -> Option<&[CategoryCount]> {
        match self {
            Self::CountsRefreshed(counts) => Some(counts),
            Self::ItemAppended { .. } => None,
        }
    }

    /// Returns the count for `category` carried by a refresh.
    #[must_use]
    pub fn count_for(&self, category: Category) -> Option<usize> {
        self.counts()?
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.count)
    }
}
