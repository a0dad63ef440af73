//! Category store: the ordered item sequence for one category.
//!
//! # Invariant
//! After every ingestion the sequence is sorted ascending by `createdAt`.
//! An absent timestamp compares as "now" at sort time, so untimed items
//! sort after every item with an earlier real timestamp. The sort is stable:
//! items with equal keys keep their arrival order.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::item::{DiagnosticItem, Timestamp};
use crate::types::Category;

/// Ordered collection of items for one category.
///
/// Duplicates are allowed; no identity is enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStore {
    category: Category,
    items: Vec<DiagnosticItem>,
}

impl CategoryStore {
    /// Creates an empty store.
    #[must_use]
    pub const fn new(category: Category) -> Self {
        Self {
            category,
            items: Vec::new(),
        }
    }

    /// Creates a store from previously persisted items.
    ///
    /// Items that belong to another category are discarded.
    #[must_use]
    pub fn from_items(category: Category, items: Vec<DiagnosticItem>) -> Self {
        let items = items
            .into_iter()
            .filter(|item| item.category() == category)
            .collect();
        Self { category, items }
    }

    /// Returns the category this store holds.
    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    /// Appends an item at the end, without re-sorting.
    pub fn append(&mut self, item: DiagnosticItem) {
        self.items.push(item);
    }

    /// Appends an item and restores the ordering invariant.
    pub fn ingest(&mut self, item: DiagnosticItem) {
        self.append(item);
        self.sort();
    }

    /// Sorts ascending by creation time, untimed items as "now".
    pub fn sort(&mut self) {
        let now: Timestamp = Utc::now().fixed_offset();
        self.items.sort_by_key(|item| item.created_at().unwrap_or(now));
    }

    /// Removes every item.
    pub fn remove_all(&mut self) {
        self.items.clear();
    }

    /// Returns the number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the store holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the items in order.
    #[must_use]
    pub fn items(&self) -> &[DiagnosticItem] {
        &self.items
    }

    /// Returns the item at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&DiagnosticItem> {
        self.items.get(index)
    }

    /// Returns an iterator over the items in order.
    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticItem> {
        self.items.iter()
    }

    /// Consumes the store, returning its items.
    #[must_use]
    pub fn into_items(self) -> Vec<DiagnosticItem> {
        self.items
    }
}
