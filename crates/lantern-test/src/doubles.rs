//! Recording test doubles for the presentation-side traits.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use lantern_core::{Category, CategoryStore};
use lantern_present::{ConfirmOption, ConfirmationPrompt, ConfirmationRequest, ListSurface};
use parking_lot::Mutex;

/// Everything a [`RecordingSurface`] was asked to do.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceLog {
    /// Registered item templates.
    pub templates: Vec<String>,
    /// Last estimated row height.
    pub row_height: Option<f32>,
    /// Item titles pushed to the data source, one entry per render.
    pub data_source: Vec<Vec<String>>,
    /// Item counts pushed to the delegate, one entry per render.
    pub delegate: Vec<usize>,
    /// Highlighted filters.
    pub highlighted: Vec<Category>,
}

impl SurfaceLog {
    /// Number of renders.
    #[must_use]
    pub fn renders(&self) -> usize {
        self.data_source.len()
    }

    /// Titles of the most recent render.
    #[must_use]
    pub fn last_titles(&self) -> Option<&[String]> {
        self.data_source.last().map(Vec::as_slice)
    }
}

/// List surface that records every call.
///
/// Clones share the log, so a test keeps one clone while the presenter
/// owns the other.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    log: Arc<Mutex<SurfaceLog>>,
}

impl RecordingSurface {
    /// Creates an empty recording surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the log.
    #[must_use]
    pub fn log(&self) -> SurfaceLog {
        self.log.lock().clone()
    }
}

impl ListSurface for RecordingSurface {
    fn register_item_template(&mut self, identifier: &str) {
        self.log.lock().templates.push(identifier.to_string());
    }

    fn set_estimated_row_height(&mut self, height: f32) {
        self.log.lock().row_height = Some(height);
    }

    fn update_data_source(&mut self, store: &CategoryStore) {
        let titles = store.iter().map(|i| i.title().to_string()).collect();
        self.log.lock().data_source.push(titles);
    }

    fn update_delegate(&mut self, store: &CategoryStore) {
        self.log.lock().delegate.push(store.len());
    }

    fn highlight_filter(&mut self, filter: Category) {
        self.log.lock().highlighted.push(filter);
    }
}

/// Confirmation prompt that answers from a script.
///
/// Once the script runs out every request is answered with
/// [`ConfirmOption::No`].
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: Mutex<VecDeque<ConfirmOption>>,
    asked: Mutex<Vec<ConfirmationRequest>>,
}

impl ScriptedPrompt {
    /// Creates a prompt answering with `answers`, in order.
    #[must_use]
    pub fn new(answers: impl IntoIterator<Item = ConfirmOption>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            asked: Mutex::new(Vec::new()),
        }
    }

    /// Returns every request shown so far.
    #[must_use]
    pub fn asked(&self) -> Vec<ConfirmationRequest> {
        self.asked.lock().clone()
    }
}

#[async_trait]
impl ConfirmationPrompt for ScriptedPrompt {
    async fn confirm(&self, request: &ConfirmationRequest) -> ConfirmOption {
        self.asked.lock().push(request.clone());
        self.answers.lock().pop_front().unwrap_or(ConfirmOption::No)
    }
}
