//! Confirmation channel for destructive settings actions.
//!
//! Actionable settings never mutate state on their own. They produce a
//! [`ConfirmationRequest`]; the presentation layer answers it through a
//! [`ConfirmationPrompt`], and only [`ConfirmOption::Yes`] proceeds.

use async_trait::async_trait;

/// A destructive action reachable from the settings surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingAction {
    /// Restore every flag to its documented default.
    ResetAll,
    /// Clear every category.
    RemoveData,
    /// Clear the analytics category.
    RemoveAnalytics,
}

impl SettingAction {
    /// Question shown before the action runs.
    #[must_use]
    pub const fn confirmation_title(&self) -> &'static str {
        match self {
            Self::ResetAll => "Reset to default settings?",
            Self::RemoveData => "Would you like to remove all data?",
            Self::RemoveAnalytics => "Would you like to remove analytics data?",
        }
    }
}

/// Answer to a confirmation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfirmOption {
    /// Proceed with the action.
    Yes,
    /// Leave everything as it is.
    No,
}

impl ConfirmOption {
    /// Label shown for this option.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }

    /// Returns true if the action should run.
    #[must_use]
    pub const fn proceeds(&self) -> bool {
        matches!(self, Self::Yes)
    }
}

/// A pending confirmation, emitted by an actionable settings entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationRequest {
    /// Action that runs on [`ConfirmOption::Yes`].
    pub action: SettingAction,
    /// Question to show.
    pub title: String,
    /// Options to offer, in display order.
    pub options: Vec<ConfirmOption>,
}

impl ConfirmationRequest {
    /// Creates the request for `action`.
    #[must_use]
    pub fn new(action: SettingAction) -> Self {
        Self {
            action,
            title: action.confirmation_title().to_string(),
            options: vec![ConfirmOption::Yes, ConfirmOption::No],
        }
    }
}

/// Presentation-layer hook that asks the user to confirm an action.
#[async_trait]
pub trait ConfirmationPrompt: Send + Sync {
    /// Shows `request` and resolves with the chosen option.
    async fn confirm(&self, request: &ConfirmationRequest) -> ConfirmOption;
}
