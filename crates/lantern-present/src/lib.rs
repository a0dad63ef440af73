// Iron Lotus: Allow unwrap/expect in tests for clear failure messages
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! # lantern-present
//!
//! Presentation-side contracts for the Lantern debugger pipeline.
//!
//! This crate provides:
//! - **Settings registry**: a fixed section/entry grid backed by live flags
//! - **Confirmation channel**: destructive actions wait for an explicit "Yes"
//! - **List presenter**: the full store of one category, re-rendered on
//!   every filter change
//! - **Composition root**: [`Debugger`] wires everything for the host
//!
//! Rendering itself stays with the host through [`ListSurface`] and
//! [`ConfirmationPrompt`].
//!
//! ## Iron Lotus Framework
//!
//! - **Poka-Yoke** (ポカヨケ): Nothing destructive runs without confirmation
//! - **Standardized Work**: Settings layout is static and indexable
//!
//! ## Example
//!
//! ```rust
//! use lantern_core::{Category, LanternConfig, Payload};
//! use lantern_present::Debugger;
//!
//! let dir = std::env::temp_dir().join("lantern-present-doc");
//! let debugger = Debugger::new(LanternConfig::new().with_storage_dir(&dir))?;
//!
//! let mut payload = Payload::new();
//! payload.insert("eventName".into(), "launch".into());
//! debugger.emit("analytics-received", &payload);
//!
//! assert!(!debugger.data().query(Category::Analytics).is_empty());
//! # Ok::<(), lantern_core::LanternError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod confirm;
pub mod debugger;
pub mod list;
pub mod settings;

pub use confirm::{ConfirmOption, ConfirmationPrompt, ConfirmationRequest, SettingAction};
pub use debugger::Debugger;
pub use list::{ESTIMATED_ROW_HEIGHT, ListPresenter, ListSurface, PresenterState, item_template};
pub use settings::{HostMetadata, SectionKind, SettingEntry, SettingKind, SettingsRegistry};
