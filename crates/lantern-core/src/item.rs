//! Item model: typed records decoded from broadcast payloads.
//!
//! Payloads arrive as opaque key/value maps. Each live category has a
//! record type that the payload must decode into; anything that does not
//! fit is rejected and never reaches a store.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{LanternError, Result};
use crate::types::Category;

/// Opaque key/value payload carried by a broadcast.
pub type Payload = serde_json::Map<String, Value>;

/// Timestamp with the offset it was reported in.
pub type Timestamp = DateTime<FixedOffset>;

/// Shared date format for payloads and persisted files
/// (`YYYY-MM-DDThh:mm:ss±hhmm`).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Serde adapter for optional timestamps in [`TIMESTAMP_FORMAT`].
pub mod timestamp {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{TIMESTAMP_FORMAT, Timestamp};

    /// Formats a timestamp the way payloads and files carry it.
    #[must_use]
    pub fn format(value: &Timestamp) -> String {
        value.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Parses a timestamp in [`TIMESTAMP_FORMAT`].
    ///
    /// # Errors
    /// Returns the chrono parse error when the text does not match.
    pub fn parse(text: &str) -> Result<Timestamp, chrono::ParseError> {
        chrono::DateTime::parse_from_str(text, TIMESTAMP_FORMAT)
    }

    #[allow(clippy::ref_option)]
    pub(crate) fn serialize<S>(value: &Option<Timestamp>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => serializer.serialize_str(&format(ts)),
            None => serializer.serialize_none(),
        }
    }

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|text| parse(&text).map_err(serde::de::Error::custom))
            .transpose()
    }
}

// =============================================================================
// AnalyticsItem
// =============================================================================

/// One analytics call reported by the host application.
///
/// `eventName` is the only required key. Known optional keys are lifted
/// into fields; everything else is kept verbatim in `parameters`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsItem {
    /// Name of the tracked event.
    pub event_name: String,

    /// When the host created the event, if it said so.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "timestamp")]
    pub created_at: Option<Timestamp>,

    /// Identifier of the tracked item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,

    /// Host-side event category (not the debugger [`Category`]).
    #[serde(default, rename = "category", skip_serializing_if = "Option::is_none")]
    pub event_category: Option<String>,

    /// Content type of the tracked item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    /// Screen the event was raised on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_name: Option<String>,

    /// Any other keys from the payload.
    #[serde(flatten)]
    pub parameters: BTreeMap<String, Value>,
}

impl AnalyticsItem {
    /// Creates an item with just an event name.
    #[must_use]
    pub fn new(event_name: impl Into<String>) -> Self {
        Self {
            event_name: event_name.into(),
            created_at: None,
            item_id: None,
            event_category: None,
            content_type: None,
            screen_name: None,
            parameters: BTreeMap::new(),
        }
    }

    /// Sets the creation timestamp.
    #[must_use]
    pub fn with_created_at(mut self, created_at: Timestamp) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Sets the screen name.
    #[must_use]
    pub fn with_screen_name(mut self, screen_name: impl Into<String>) -> Self {
        self.screen_name = Some(screen_name.into());
        self
    }

    /// Adds a free-form parameter.
    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }
}

// =============================================================================
// DiagnosticItem
// =============================================================================

/// One decoded event record, tagged by category.
///
/// Serialized untagged so a persisted file holds plain category records;
/// the store a file belongs to already names the category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DiagnosticItem {
    /// Analytics record.
    Analytics(AnalyticsItem),
}

impl DiagnosticItem {
    /// Returns the category this item belongs to.
    #[must_use]
    pub const fn category(&self) -> Category {
        match self {
            Self::Analytics(_) => Category::Analytics,
        }
    }

    /// Returns the creation timestamp, if the host supplied one.
    #[must_use]
    pub fn created_at(&self) -> Option<Timestamp> {
        match self {
            Self::Analytics(item) => item.created_at,
        }
    }

    /// Returns a one-line title for list rendering.
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Analytics(item) => &item.event_name,
        }
    }
}

impl From<AnalyticsItem> for DiagnosticItem {
    fn from(item: AnalyticsItem) -> Self {
        Self::Analytics(item)
    }
}

// =============================================================================
// Decoding
// =============================================================================

/// Outcome of decoding a payload for a category.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// Payload decoded into a record for a live category.
    Item(DiagnosticItem),
    /// Category is registered but does not accept items yet.
    Reserved,
}

/// Decodes a broadcast payload into the record type of `category`.
///
/// # Errors
/// Returns [`LanternError::Decode`] if the payload does not fit the shape of
/// a live category. Reserved categories never fail.
pub fn decode(category: Category, payload: &Payload) -> Result<Decoded> {
    match category {
        Category::Analytics => {
            let item: AnalyticsItem = serde_json::from_value(Value::Object(payload.clone()))
                .map_err(|e| LanternError::decode(e.to_string()))?;
            Ok(Decoded::Item(item.into()))
        }
        Category::Error | Category::Network | Category::Log | Category::UiTest => {
            Ok(Decoded::Reserved)
        }
    }
}
