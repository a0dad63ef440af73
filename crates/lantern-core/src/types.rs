//! Core types shared by every pipeline stage.
//!
//! Per Iron Lotus Framework: a closed set of categories, explicit about
//! which ones are live and which are reserved for future item types.

use serde::{Deserialize, Serialize};

use crate::error::LanternError;

/// One diagnostic channel.
///
/// Only [`Category::Analytics`] decodes and retains items today. The other
/// variants are reserved: their topics are subscribed, their stores exist,
/// but their decoders deliberately accept nothing.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Analytics calls made by the host application.
    #[default]
    Analytics,
    /// Errors reported by the host application.
    Error,
    /// Network activity.
    Network,
    /// Log lines.
    Log,
    /// UI-test hooks.
    UiTest,
}

impl Category {
    /// Every category, in presentation order.
    pub const ALL: [Self; 5] = [
        Self::Analytics,
        Self::Error,
        Self::Network,
        Self::Log,
        Self::UiTest,
    ];

    /// Returns the stable lowercase name of this category.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Analytics => "analytics",
            Self::Error => "error",
            Self::Network => "network",
            Self::Log => "log",
            Self::UiTest => "ui-test",
        }
    }

    /// Returns true if this category decodes and retains items.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        matches!(self, Self::Analytics)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = LanternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| LanternError::config(format!("unknown category: {s}")))
    }
}

/// Number of retained items in one category.
///
/// A count-refresh notification carries one of these per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    /// The category.
    pub category: Category,
    /// Items currently retained.
    pub count: usize,
}

impl CategoryCount {
    /// Creates a new count entry.
    #[must_use]
    pub const fn new(category: Category, count: usize) -> Self {
        Self { category, count }
    }
}
