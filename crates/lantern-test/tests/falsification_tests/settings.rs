//! Falsification Tests: Category E - Settings and Confirmation (F035-F042)
//!
//! # Toyota Way: Poka-Yoke (ポカヨケ)
//! Destructive actions cannot run without an explicit "Yes".

use lantern_core::{Category, Flag};
use lantern_present::{ConfirmOption, SectionKind, SettingAction, SettingKind};
use lantern_test::{DebuggerTestHarness, ScriptedPrompt, analytics_payload};

// =============================================================================
// F035-F038: Layout
// =============================================================================

/// F035: Sections and entries follow the fixed layout
#[test]
fn f035_fixed_layout() {
    let harness = DebuggerTestHarness::new();
    let debugger = harness.start();
    let settings = debugger.settings();

    let layout: Vec<(&str, Vec<SettingKind>)> = (0..settings.number_of_sections())
        .map(|s| {
            let section = settings.section(s).unwrap();
            let kinds = (0..settings.number_of_items(s))
                .map(|i| settings.entry(s, i).unwrap().kind)
                .collect();
            (section.title(), kinds)
        })
        .collect();

    assert_eq!(
        layout,
        vec![
            ("App Information", vec![SettingKind::Version, SettingKind::Device]),
            ("Data", vec![SettingKind::StoreAnalytics]),
            ("Animation", vec![SettingKind::BubblePulse, SettingKind::ItemIconAnimation]),
            (
                "Settings",
                vec![SettingKind::ResetAll, SettingKind::RemoveData, SettingKind::RemoveAnalytics]
            ),
        ],
        "F035 FALSIFIED: settings layout changed"
    );
    assert_eq!(SectionKind::ALL.len(), settings.number_of_sections());
}

/// F036: Toggle state is derived live from flags
#[test]
fn f036_is_on_is_live() {
    let harness = DebuggerTestHarness::new();
    let debugger = harness.start();

    assert!(debugger.settings().entry(2, 0).unwrap().is_on);
    harness.flags().set(Flag::BubblePulse, false);
    assert!(
        !debugger.settings().entry(2, 0).unwrap().is_on,
        "F036 FALSIFIED: isOn did not follow the flag"
    );
}

/// F037: Only toggles have toggles, only actions are actionable
#[test]
fn f037_toggle_and_action_are_disjoint() {
    let harness = DebuggerTestHarness::new();
    let debugger = harness.start();
    let settings = debugger.settings();

    for s in 0..settings.number_of_sections() {
        for i in 0..settings.number_of_items(s) {
            let entry = settings.entry(s, i).unwrap();
            assert!(
                !(entry.has_toggle && entry.is_actionable),
                "F037 FALSIFIED: {:?} is both toggle and action",
                entry.kind
            );
            if !entry.has_toggle {
                assert!(!entry.is_on, "F037 FALSIFIED: {:?} reports on", entry.kind);
            }
        }
    }
}

/// F038: Out-of-range positions are errors, not panics
#[test]
fn f038_out_of_range_is_error() {
    let harness = DebuggerTestHarness::new();
    let debugger = harness.start();
    assert!(debugger.settings().entry(4, 0).is_err());
    assert!(debugger.settings().entry(0, 2).is_err());
    assert!(debugger.settings().set_toggle(9, 9, true).is_err());
}

// =============================================================================
// F039-F042: Confirmation
// =============================================================================

/// F039: "No" leaves data untouched
///
/// # Falsification Attempt
/// Decline every destructive action; nothing may change.
#[tokio::test]
async fn f039_no_changes_nothing() {
    let harness = DebuggerTestHarness::new();
    let debugger = harness.start();
    debugger.emit("analytics-received", &analytics_payload("a", None));
    harness.flags().set(Flag::BubblePulse, false);
    let prompt = ScriptedPrompt::new([ConfirmOption::No; 3]);

    for item in 0..3 {
        let ran = debugger.settings().select(3, item, &prompt).await.unwrap();
        assert!(!ran, "F039 FALSIFIED: action ran after No");
    }

    assert_eq!(debugger.data().query(Category::Analytics).len(), 1);
    assert!(!harness.flags().get(Flag::BubblePulse));
    assert_eq!(prompt.asked().len(), 3);
}

/// F040: "Yes" on remove-analytics clears analytics
#[tokio::test]
async fn f040_yes_removes_analytics() {
    let harness = DebuggerTestHarness::new();
    let debugger = harness.start();
    debugger.emit("analytics-received", &analytics_payload("a", None));
    let prompt = ScriptedPrompt::new([ConfirmOption::Yes]);

    assert!(debugger.settings().select(3, 2, &prompt).await.unwrap());

    let asked = prompt.asked();
    assert_eq!(asked[0].action, SettingAction::RemoveAnalytics);
    assert_eq!(asked[0].title, "Would you like to remove analytics data?");
    assert!(debugger.data().query(Category::Analytics).is_empty());
}

/// F041: "Yes" on reset-all restores documented defaults
#[tokio::test]
async fn f041_yes_resets_flags() {
    let harness = DebuggerTestHarness::new();
    let debugger = harness.start();
    for flag in Flag::ALL {
        harness.flags().set(flag, !flag.default_value());
    }
    let prompt = ScriptedPrompt::new([ConfirmOption::Yes]);

    assert!(debugger.settings().select(3, 0, &prompt).await.unwrap());

    for flag in Flag::ALL {
        assert_eq!(
            harness.flags().get(flag),
            flag.default_value(),
            "F041 FALSIFIED: {flag:?} not restored"
        );
    }
}

/// F042: Non-actionable entries never prompt
#[tokio::test]
async fn f042_non_actionable_entries_never_prompt() {
    let harness = DebuggerTestHarness::new();
    let debugger = harness.start();
    let prompt = ScriptedPrompt::new([ConfirmOption::Yes; 5]);

    for (section, item) in [(0, 0), (0, 1), (1, 0), (2, 0), (2, 1)] {
        assert!(!debugger.settings().select(section, item, &prompt).await.unwrap());
    }
    assert!(prompt.asked().is_empty(), "F042 FALSIFIED: read-only entry prompted");
}
