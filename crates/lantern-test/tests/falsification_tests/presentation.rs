//! Falsification Tests: Category D - List Presentation (F028-F034)
//!
//! # Toyota Way: Visual Management (目で見る管理)
//! What the surface shows is exactly the store of the active filter.

use lantern_core::Category;
use lantern_observe::DebuggerEvent;
use lantern_present::{ESTIMATED_ROW_HEIGHT, PresenterState};
use lantern_test::{DebuggerTestHarness, RecordingSurface, analytics_payload};

// =============================================================================
// F028-F030: Filter Changes
// =============================================================================

/// F028: Setting the same filter twice renders twice
///
/// # Falsification Attempt
/// The presenter must not short-circuit an unchanged filter.
#[test]
fn f028_same_filter_rerenders() {
    let harness = DebuggerTestHarness::new();
    let debugger = harness.start();
    let surface = RecordingSurface::new();
    let mut presenter = debugger.presenter(surface.clone());
    presenter.on_load();
    let after_load = surface.log().renders();

    presenter.set_filter(Category::Analytics);
    presenter.set_filter(Category::Analytics);

    let log = surface.log();
    assert_eq!(
        log.renders(),
        after_load + 2,
        "F028 FALSIFIED: unchanged filter was short-circuited"
    );
    assert_eq!(log.delegate.len(), log.renders(), "F028 FALSIFIED: delegate skipped");
}

/// F029: Switching filters shows the other category's store
#[test]
fn f029_filter_switch_requeries() {
    let harness = DebuggerTestHarness::new();
    let debugger = harness.start();
    debugger.emit("analytics-received", &analytics_payload("a", None));

    let surface = RecordingSurface::new();
    let mut presenter = debugger.presenter(surface.clone());
    presenter.on_load();
    presenter.set_filter(Category::Log);

    assert_eq!(presenter.state(), PresenterState::Loaded { filter: Category::Log });
    assert_eq!(surface.log().last_titles(), Some(&[][..]));

    presenter.set_filter(Category::Analytics);
    assert_eq!(surface.log().last_titles(), Some(&["a".to_string()][..]));
}

/// F030: The whole store is presented, without pagination
#[test]
fn f030_full_store_presented() {
    let harness = DebuggerTestHarness::new();
    let debugger = harness.start();
    for i in 0..250 {
        debugger.emit("analytics-received", &analytics_payload(&format!("e{i}"), None));
    }

    let surface = RecordingSurface::new();
    let mut presenter = debugger.presenter(surface.clone());
    presenter.on_load();

    assert_eq!(
        surface.log().delegate.last(),
        Some(&250),
        "F030 FALSIFIED: store was truncated"
    );
}

// =============================================================================
// F031-F034: Loading and Live Updates
// =============================================================================

/// F031: Loading registers the analytics template and row height once
#[test]
fn f031_load_registers_template() {
    let harness = DebuggerTestHarness::new();
    let debugger = harness.start();
    let surface = RecordingSurface::new();
    let mut presenter = debugger.presenter(surface.clone());

    presenter.on_load();
    presenter.on_load();

    let log = surface.log();
    assert_eq!(log.templates, vec!["AnalyticsCell"]);
    assert_eq!(log.row_height, Some(ESTIMATED_ROW_HEIGHT));
    assert_eq!(log.highlighted, vec![Category::Analytics]);
}

/// F032: Nothing renders before load
#[test]
fn f032_no_render_before_load() {
    let harness = DebuggerTestHarness::new();
    let debugger = harness.start();
    let surface = RecordingSurface::new();
    let mut presenter = debugger.presenter(surface.clone());

    presenter.set_filter(Category::Error);

    assert_eq!(surface.log().renders(), 0, "F032 FALSIFIED: rendered while unloaded");
    assert_eq!(presenter.current_filter(), Category::Error);
}

/// F033: An append to the visible category re-renders
#[test]
fn f033_item_appended_rerenders_visible_category() {
    let harness = DebuggerTestHarness::new();
    let debugger = harness.start();
    let surface = RecordingSurface::new();
    let mut presenter = debugger.presenter(surface.clone());
    presenter.on_load();
    let mut rx = debugger.subscribe();

    debugger.emit("analytics-received", &analytics_payload("live", None));
    for event in lantern_test::drain(&mut rx) {
        presenter.handle_event(&event);
    }

    assert_eq!(surface.log().last_titles(), Some(&["live".to_string()][..]));
}

/// F034: An append to a hidden category does not re-render
#[test]
fn f034_hidden_category_does_not_rerender() {
    let harness = DebuggerTestHarness::new();
    let debugger = harness.start();
    let surface = RecordingSurface::new();
    let mut presenter = debugger.presenter(surface.clone()).with_filter(Category::Log);
    presenter.on_load();
    let before = surface.log().renders();

    let rerendered = presenter.handle_event(&DebuggerEvent::ItemAppended {
        category: Category::Analytics,
    });

    assert!(!rerendered);
    assert_eq!(surface.log().renders(), before);
}
