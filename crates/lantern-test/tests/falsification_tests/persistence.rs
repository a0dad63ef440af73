//! Falsification Tests: Category B - Persistence and Restart (F011-F020)
//!
//! # Toyota Way: Jidoka (自働化)
//! Storage failures stop at the debugger; the host never notices.

use chrono::{Duration, Utc};
use lantern_core::{Category, Flag, JsonFileStore, PersistenceAdapter, timestamp};
use lantern_test::{DebuggerTestHarness, FaultConfig, analytics_payload};

fn titles(debugger: &lantern_present::Debugger) -> Vec<String> {
    debugger
        .data()
        .query(Category::Analytics)
        .iter()
        .map(|i| i.title().to_string())
        .collect()
}

// =============================================================================
// F011-F014: Round Trip
// =============================================================================

/// F011: Save, restart, rehydrate reproduces the store in order
///
/// # Falsification Attempt
/// Persist to real JSON files, then start a second debugger over them.
/// An untimed item saved ahead of an item stamped one second in the future
/// must keep its place even after the clock passes that stamp.
#[test]
fn f011_round_trip_preserves_order() {
    lantern_test::init_tracing();
    let harness = DebuggerTestHarness::builder().on_disk().build().unwrap();

    let debugger = harness.start();
    for (name, ts) in [
        ("b", "2018-04-10T11:00:00+0200"),
        ("a", "2018-04-10T10:00:00+0200"),
        ("c", "2018-04-10T12:00:00+0200"),
    ] {
        debugger.emit("analytics-received", &analytics_payload(name, Some(ts)));
    }
    let soon = timestamp::format(&(Utc::now() + Duration::seconds(1)).fixed_offset());
    debugger.emit("analytics-received", &analytics_payload("untimed", None));
    debugger.emit("analytics-received", &analytics_payload("soon", Some(&soon)));

    let before = titles(&debugger);
    assert_eq!(before, vec!["a", "b", "c", "untimed", "soon"]);
    debugger.on_app_backgrounded();
    drop(debugger);

    std::thread::sleep(std::time::Duration::from_millis(2100));

    let restarted = harness.start();
    assert_eq!(
        titles(&restarted),
        before,
        "F011 FALSIFIED: rehydrated store differs from saved store"
    );
}

/// F012: Retention off at save time yields an empty store after restart
///
/// # Falsification Attempt
/// Save once with retention on, then turn it off and save again. The
/// earlier document must not come back.
#[test]
fn f012_retention_off_restart_is_empty() {
    let harness = DebuggerTestHarness::builder().on_disk().build().unwrap();

    let debugger = harness.start();
    debugger.emit("analytics-received", &analytics_payload("a", None));
    debugger.on_app_backgrounded();

    harness.flags().set(Flag::StoreAnalytics, false);
    debugger.emit("analytics-received", &analytics_payload("b", None));
    debugger.on_app_terminating();
    assert_eq!(debugger.data().query(Category::Analytics).len(), 2);
    drop(debugger);

    let restarted = harness.start();
    assert!(
        restarted.data().query(Category::Analytics).is_empty(),
        "F012 FALSIFIED: data came back although retention was off at save time"
    );
}

/// F013: No file at startup yields an empty store
#[test]
fn f013_missing_file_starts_empty() {
    let harness = DebuggerTestHarness::builder().on_disk().build().unwrap();
    let debugger = harness.start();
    assert!(debugger.data().query(Category::Analytics).is_empty());
}

/// F014: Documents carry the fixed timestamp format
///
/// # Falsification Attempt
/// Inspect the raw file written for analytics.
#[test]
fn f014_document_uses_fixed_format() {
    let harness = DebuggerTestHarness::builder().on_disk().build().unwrap();
    let debugger = harness.start();
    debugger.emit(
        "analytics-received",
        &analytics_payload("stamped", Some("2018-04-10T14:22:05+0200")),
    );
    debugger.on_app_backgrounded();

    let dir = harness.storage_dir().unwrap();
    let text = std::fs::read_to_string(dir.join("analytics_items.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(
        value["items"][0]["createdAt"], "2018-04-10T14:22:05+0200",
        "F014 FALSIFIED: timestamp not written as YYYY-MM-DDThh:mm:ss+hhmm"
    );
}

// =============================================================================
// F015-F018: Failure Isolation
// =============================================================================

/// F015: A corrupt document is ignored at startup
#[test]
fn f015_corrupt_document_starts_empty() {
    let harness = DebuggerTestHarness::builder().on_disk().build().unwrap();
    harness.write_raw_document(Category::Analytics, "{\"items\": [ {").unwrap();

    let debugger = harness.start();
    assert!(
        debugger.data().query(Category::Analytics).is_empty(),
        "F015 FALSIFIED: corrupt document produced items"
    );
}

/// F016: Failing reads never prevent startup
#[test]
fn f016_failing_reads_start_empty() {
    let harness = DebuggerTestHarness::builder()
        .with_faults(FaultConfig::reads())
        .build()
        .unwrap();
    let debugger = harness.start();
    debugger.emit("analytics-received", &analytics_payload("a", None));
    assert_eq!(debugger.data().query(Category::Analytics).len(), 1);
}

/// F017: Failing writes are swallowed and in-memory data stays
#[test]
fn f017_failing_writes_swallowed() {
    let harness = DebuggerTestHarness::builder()
        .with_faults(FaultConfig::everything())
        .build()
        .unwrap();
    let debugger = harness.start();
    debugger.emit("analytics-received", &analytics_payload("a", None));

    debugger.on_app_backgrounded();
    debugger.on_app_terminating();

    assert_eq!(
        debugger.data().query(Category::Analytics).len(),
        1,
        "F017 FALSIFIED: failed save disturbed in-memory data"
    );
    assert_eq!(harness.memory().unwrap().writes(), 0);
}

/// F018: Clearing does not persist by itself
///
/// # Falsification Attempt
/// Save, clear, restart without saving: the saved items come back.
#[test]
fn f018_remove_all_does_not_persist() {
    let harness = DebuggerTestHarness::new();
    let debugger = harness.start();
    debugger.emit("analytics-received", &analytics_payload("kept", None));
    debugger.on_app_backgrounded();

    debugger.data().remove_all();
    drop(debugger);

    let restarted = harness.start();
    assert_eq!(
        titles(&restarted),
        vec!["kept"],
        "F018 FALSIFIED: remove_all wrote through to storage"
    );
}

// =============================================================================
// F019-F020: Background Save
// =============================================================================

/// F019: Background save writes the snapshot taken at call time
#[tokio::test]
async fn f019_background_save_uses_snapshot() {
    let harness = DebuggerTestHarness::new();
    let debugger = harness.start();
    debugger.emit("analytics-received", &analytics_payload("early", None));

    let handle = debugger.data().save_in_background().unwrap();
    debugger.emit("analytics-received", &analytics_payload("late", None));
    handle.await.unwrap();

    let stored = harness
        .memory()
        .unwrap()
        .load(Category::Analytics)
        .unwrap()
        .unwrap();
    assert_eq!(
        stored.len(),
        1,
        "F019 FALSIFIED: background save observed a later append"
    );
}

/// F020: Files written by one adapter load in another
#[test]
fn f020_file_layout_is_stable() {
    let harness = DebuggerTestHarness::builder().on_disk().build().unwrap();
    let debugger = harness.start();
    debugger.emit("analytics-received", &analytics_payload("a", None));
    debugger.on_app_backgrounded();

    let adapter = JsonFileStore::new(harness.storage_dir().unwrap());
    let loaded = adapter.load(Category::Analytics).unwrap().unwrap();
    assert_eq!(loaded.len(), 1);
}
