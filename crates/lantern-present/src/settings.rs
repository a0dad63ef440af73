//! Settings registry: a fixed two-level catalogue of toggles and actions.
//!
//! Sections and their entries never change after construction. Titles and
//! toggle states are computed on every lookup from the flag store and the
//! host metadata, so a lookup always reflects current values.

use std::sync::Arc;

use lantern_core::{Category, ConfigStore, Flag, LanternError, Result};
use lantern_observe::DebuggerData;

use crate::confirm::{ConfirmOption, ConfirmationPrompt, ConfirmationRequest, SettingAction};

// =============================================================================
// Kinds
// =============================================================================

/// What a settings entry shows or does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKind {
    /// Device descriptor (read-only).
    Device,
    /// App version and build (read-only).
    Version,
    /// Retention toggle.
    StoreAnalytics,
    /// Bubble pulse animation toggle.
    BubblePulse,
    /// Item icon animation toggle.
    ItemIconAnimation,
    /// Restore flag defaults.
    ResetAll,
    /// Clear every category.
    RemoveData,
    /// Clear analytics.
    RemoveAnalytics,
}

impl SettingKind {
    /// Flag backing this entry's toggle.
    #[must_use]
    pub const fn flag(&self) -> Option<Flag> {
        match self {
            Self::StoreAnalytics => Some(Flag::StoreAnalytics),
            Self::BubblePulse => Some(Flag::BubblePulse),
            Self::ItemIconAnimation => Some(Flag::ItemIconAnimation),
            Self::Device
            | Self::Version
            | Self::ResetAll
            | Self::RemoveData
            | Self::RemoveAnalytics => None,
        }
    }

    /// Action triggered by selecting this entry.
    #[must_use]
    pub const fn action(&self) -> Option<SettingAction> {
        match self {
            Self::ResetAll => Some(SettingAction::ResetAll),
            Self::RemoveData => Some(SettingAction::RemoveData),
            Self::RemoveAnalytics => Some(SettingAction::RemoveAnalytics),
            Self::Device
            | Self::Version
            | Self::StoreAnalytics
            | Self::BubblePulse
            | Self::ItemIconAnimation => None,
        }
    }

    /// Returns the display title.
    #[must_use]
    pub fn title(&self, host: &HostMetadata) -> String {
        match self {
            Self::Device => format!("Device {}", host.device),
            Self::Version => format!("Version {}({})", host.version, host.build),
            Self::StoreAnalytics => "Save Analytics Information".to_string(),
            Self::BubblePulse => "Enable Bubble Pulse Animation".to_string(),
            Self::ItemIconAnimation => "Enable Bubble Emoji Animation".to_string(),
            Self::ResetAll => "Restore to Default Settings".to_string(),
            Self::RemoveData => "Delete Cached Data".to_string(),
            Self::RemoveAnalytics => "Delete Analytics Data".to_string(),
        }
    }
}

/// A group of entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    /// Host application information.
    Information,
    /// Data retention.
    Data,
    /// Overlay animations.
    Animation,
    /// Destructive actions.
    Settings,
}

impl SectionKind {
    /// Every section, in display order.
    pub const ALL: [Self; 4] = [Self::Information, Self::Data, Self::Animation, Self::Settings];

    /// Section header.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Information => "App Information",
            Self::Data => "Data",
            Self::Animation => "Animation",
            Self::Settings => "Settings",
        }
    }

    /// Entries of this section, in display order.
    #[must_use]
    pub const fn entries(&self) -> &'static [SettingKind] {
        match self {
            Self::Information => &[SettingKind::Version, SettingKind::Device],
            Self::Data => &[SettingKind::StoreAnalytics],
            Self::Animation => &[SettingKind::BubblePulse, SettingKind::ItemIconAnimation],
            Self::Settings => &[
                SettingKind::ResetAll,
                SettingKind::RemoveData,
                SettingKind::RemoveAnalytics,
            ],
        }
    }
}

// =============================================================================
// Entries
// =============================================================================

/// Host application details shown in the information section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostMetadata {
    /// Marketing version, e.g. `2.3.0`.
    pub version: String,
    /// Build number.
    pub build: String,
    /// Device descriptor.
    pub device: String,
}

impl HostMetadata {
    /// Creates host metadata.
    #[must_use]
    pub fn new(
        version: impl Into<String>,
        build: impl Into<String>,
        device: impl Into<String>,
    ) -> Self {
        Self {
            version: version.into(),
            build: build.into(),
            device: device.into(),
        }
    }
}

/// A settings entry as it should be displayed right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingEntry {
    /// Entry kind.
    pub kind: SettingKind,
    /// Display title.
    pub title: String,
    /// Current toggle state. Always false for entries without a toggle.
    pub is_on: bool,
    /// Whether the entry shows a toggle.
    pub has_toggle: bool,
    /// Whether selecting the entry asks for confirmation.
    pub is_actionable: bool,
    /// Whether a separator is drawn below the entry.
    pub is_separator_visible: bool,
}

// =============================================================================
// SettingsRegistry
// =============================================================================

/// Indexable settings catalogue backed by the flag store.
pub struct SettingsRegistry {
    flags: Arc<dyn ConfigStore>,
    data: Arc<DebuggerData>,
    host: HostMetadata,
}

impl SettingsRegistry {
    /// Creates the registry.
    #[must_use]
    pub fn new(flags: Arc<dyn ConfigStore>, data: Arc<DebuggerData>, host: HostMetadata) -> Self {
        Self { flags, data, host }
    }

    /// Returns the host metadata.
    #[must_use]
    pub fn host(&self) -> &HostMetadata {
        &self.host
    }

    /// Number of sections.
    #[must_use]
    pub fn number_of_sections(&self) -> usize {
        SectionKind::ALL.len()
    }

    /// Number of entries in `section`, zero if it does not exist.
    #[must_use]
    pub fn number_of_items(&self, section: usize) -> usize {
        SectionKind::ALL.get(section).map_or(0, |s| s.entries().len())
    }

    /// Returns the section at `section`.
    #[must_use]
    pub fn section(&self, section: usize) -> Option<SectionKind> {
        SectionKind::ALL.get(section).copied()
    }

    /// Returns the entry at a position, with live title and toggle state.
    ///
    /// # Errors
    /// Returns [`LanternError::InvalidIndex`] for a position outside the grid.
    pub fn entry(&self, section: usize, item: usize) -> Result<SettingEntry> {
        let kind = self.kind_at(section, item)?;
        Ok(SettingEntry {
            kind,
            title: kind.title(&self.host),
            is_on: kind.flag().is_some_and(|flag| self.flags.get(flag)),
            has_toggle: kind.flag().is_some(),
            is_actionable: kind.action().is_some(),
            is_separator_visible: true,
        })
    }

    /// Sets the toggle at a position.
    ///
    /// Returns false, without touching any flag, if the entry has no toggle.
    ///
    /// # Errors
    /// Returns [`LanternError::InvalidIndex`] for a position outside the grid.
    pub fn set_toggle(&self, section: usize, item: usize, on: bool) -> Result<bool> {
        let Some(flag) = self.kind_at(section, item)?.flag() else {
            return Ok(false);
        };
        self.flags.set(flag, on);
        tracing::info!(flag = flag.key(), on, "setting toggled");
        Ok(true)
    }

    /// Selects the entry at a position.
    ///
    /// Actionable entries return the confirmation they need; nothing is
    /// changed until the request is resolved.
    ///
    /// # Errors
    /// Returns [`LanternError::InvalidIndex`] for a position outside the grid.
    pub fn activate(&self, section: usize, item: usize) -> Result<Option<ConfirmationRequest>> {
        Ok(self
            .kind_at(section, item)?
            .action()
            .map(ConfirmationRequest::new))
    }

    /// Applies the answer to a confirmation request.
    ///
    /// Returns true if the action ran.
    pub fn resolve(&self, request: &ConfirmationRequest, choice: ConfirmOption) -> bool {
        if !choice.proceeds() {
            tracing::debug!(action = ?request.action, "action cancelled");
            return false;
        }

        match request.action {
            SettingAction::ResetAll => self.flags.reset_to_defaults(),
            SettingAction::RemoveData => self.data.remove_all(),
            SettingAction::RemoveAnalytics => self.data.remove_all_in(Category::Analytics),
        }
        tracing::info!(action = ?request.action, "action confirmed");
        true
    }

    /// Selects an entry and, if it needs confirmation, asks `prompt`.
    ///
    /// Returns true if an action ran.
    ///
    /// # Errors
    /// Returns [`LanternError::InvalidIndex`] for a position outside the grid.
    pub async fn select(
        &self,
        section: usize,
        item: usize,
        prompt: &dyn ConfirmationPrompt,
    ) -> Result<bool> {
        let Some(request) = self.activate(section, item)? else {
            return Ok(false);
        };
        let choice = prompt.confirm(&request).await;
        Ok(self.resolve(&request, choice))
    }

    fn kind_at(&self, section: usize, item: usize) -> Result<SettingKind> {
        SectionKind::ALL
            .get(section)
            .and_then(|s| s.entries().get(item))
            .copied()
            .ok_or(LanternError::InvalidIndex { section, item })
    }
}

impl std::fmt::Debug for SettingsRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsRegistry")
            .field("host", &self.host)
            .finish_non_exhaustive()
    }
}
