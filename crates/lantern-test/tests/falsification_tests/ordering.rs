//! Falsification Tests: Category A - Ingestion and Ordering (F001-F010)
//!
//! # Toyota Way: Standardized Work
//! The store is always in one well-defined order.

use chrono::{Duration, Utc};
use lantern_core::{Category, TIMESTAMP_FORMAT};
use lantern_test::{DebuggerTestHarness, analytics_payload};
use proptest::prelude::*;

fn titles(debugger: &lantern_present::Debugger, category: Category) -> Vec<String> {
    debugger
        .data()
        .query(category)
        .iter()
        .map(|i| i.title().to_string())
        .collect()
}

// =============================================================================
// F001-F004: Sort Order
// =============================================================================

/// F001: Out-of-order arrivals are sorted by creation time
///
/// # Falsification Attempt
/// Emit T1, T3, T2 in that order; the store must read T1, T2, T3.
#[test]
fn f001_out_of_order_arrivals_sorted() {
    lantern_test::init_tracing();
    let harness = DebuggerTestHarness::new();
    let debugger = harness.start();

    debugger.emit(
        "analytics-received",
        &analytics_payload("T1", Some("2018-04-10T10:00:00+0000")),
    );
    debugger.emit(
        "analytics-received",
        &analytics_payload("T3", Some("2018-04-10T12:00:00+0000")),
    );
    debugger.emit(
        "analytics-received",
        &analytics_payload("T2", Some("2018-04-10T11:00:00+0000")),
    );

    assert_eq!(
        titles(&debugger, Category::Analytics),
        vec!["T1", "T2", "T3"],
        "F001 FALSIFIED: items not in createdAt order"
    );
}

/// F002: Untimed items sort after items with earlier real timestamps
///
/// # Falsification Attempt
/// Ingest an untimed item before a past-dated one.
#[test]
fn f002_untimed_item_sorts_as_now() {
    let harness = DebuggerTestHarness::new();
    let debugger = harness.start();

    debugger.emit("analytics-received", &analytics_payload("untimed", None));
    debugger.emit(
        "analytics-received",
        &analytics_payload("past", Some("2001-01-01T00:00:00+0000")),
    );

    assert_eq!(
        titles(&debugger, Category::Analytics),
        vec!["past", "untimed"],
        "F002 FALSIFIED: untimed item did not sort as most recent"
    );
}

/// F003: Items stamped in the future still sort after untimed ones
///
/// # Falsification Attempt
/// "Now" is the comparison value for absent timestamps, so a future stamp
/// must win.
#[test]
fn f003_future_item_sorts_after_untimed() {
    let harness = DebuggerTestHarness::new();
    let debugger = harness.start();
    let future = (Utc::now().fixed_offset() + Duration::days(30))
        .format(TIMESTAMP_FORMAT)
        .to_string();

    debugger.emit("analytics-received", &analytics_payload("future", Some(&future)));
    debugger.emit("analytics-received", &analytics_payload("untimed", None));

    assert_eq!(
        titles(&debugger, Category::Analytics),
        vec!["untimed", "future"],
        "F003 FALSIFIED: future item sorted before an untimed one"
    );
}

/// F004: Offsets are honoured when comparing timestamps
///
/// # Falsification Attempt
/// 10:00+0200 is earlier than 09:00+0000.
#[test]
fn f004_offsets_compared_in_absolute_time() {
    let harness = DebuggerTestHarness::new();
    let debugger = harness.start();

    debugger.emit(
        "analytics-received",
        &analytics_payload("utc-nine", Some("2018-04-10T09:00:00+0000")),
    );
    debugger.emit(
        "analytics-received",
        &analytics_payload("cest-ten", Some("2018-04-10T10:00:00+0200")),
    );

    assert_eq!(
        titles(&debugger, Category::Analytics),
        vec!["cest-ten", "utc-nine"],
        "F004 FALSIFIED: offset ignored during sort"
    );
}

// =============================================================================
// F005-F008: Decode Rejection
// =============================================================================

/// F005: A payload missing eventName never reaches the store
///
/// # Falsification Attempt
/// Emit payloads missing the required key; nothing may be appended.
#[test]
fn f005_missing_required_field_dropped() {
    let harness = DebuggerTestHarness::new();
    let debugger = harness.start();

    let mut payload = lantern_core::Payload::new();
    payload.insert("screenName".into(), "home".into());
    debugger.emit("analytics-received", &payload);
    debugger.emit("analytics-received", &lantern_core::Payload::new());

    assert!(
        debugger.data().query(Category::Analytics).is_empty(),
        "F005 FALSIFIED: undecodable payload was appended"
    );
}

/// F006: A malformed timestamp drops the whole payload
///
/// # Falsification Attempt
/// No partial state: the item is not appended without its timestamp.
#[test]
fn f006_malformed_timestamp_dropped() {
    let harness = DebuggerTestHarness::new();
    let debugger = harness.start();

    debugger.emit(
        "analytics-received",
        &analytics_payload("bad", Some("2018-04-10 10:00:00")),
    );

    assert!(
        debugger.data().query(Category::Analytics).is_empty(),
        "F006 FALSIFIED: payload with malformed createdAt was appended"
    );
}

/// F007: Reserved categories accept nothing
///
/// # Falsification Attempt
/// Their topics are wired, but their handlers are inert.
#[test]
fn f007_reserved_topics_inert() {
    let harness = DebuggerTestHarness::new();
    let debugger = harness.start();

    for topic in ["error-received", "network-received", "log-received", "ui-test-received"] {
        assert!(
            debugger.emit(topic, &analytics_payload("x", None)),
            "F007 FALSIFIED: {topic} is not a known topic"
        );
    }

    let counts = debugger.data().category_counts();
    assert!(
        counts.values().all(|c| *c == 0),
        "F007 FALSIFIED: reserved category retained an item: {counts:?}"
    );
}

/// F008: Unknown topics are dropped without side effects
#[test]
fn f008_unknown_topic_dropped() {
    let harness = DebuggerTestHarness::new();
    let debugger = harness.start();

    assert!(!debugger.emit("crash-received", &analytics_payload("x", None)));
    assert!(debugger.data().query(Category::Analytics).is_empty());
}

// =============================================================================
// F009-F010: Clearing
// =============================================================================

/// F009: Clearing one category leaves the others untouched
///
/// # Falsification Attempt
/// Only analytics holds data today, so clear a reserved category first and
/// verify analytics survives, then clear analytics.
#[test]
fn f009_remove_all_in_is_scoped() {
    let harness = DebuggerTestHarness::new();
    let debugger = harness.start();
    debugger.emit("analytics-received", &analytics_payload("a", None));

    debugger.data().remove_all_in(Category::Network);
    assert_eq!(
        debugger.data().query(Category::Analytics).len(),
        1,
        "F009 FALSIFIED: clearing network touched analytics"
    );

    debugger.data().remove_all_in(Category::Analytics);
    assert!(debugger.data().query(Category::Analytics).is_empty());
}

/// F010: Duplicates are retained
#[test]
fn f010_duplicates_retained() {
    let harness = DebuggerTestHarness::new();
    let debugger = harness.start();
    let payload = analytics_payload("same", Some("2018-04-10T10:00:00+0000"));

    debugger.emit("analytics-received", &payload);
    debugger.emit("analytics-received", &payload);

    assert_eq!(
        debugger.data().query(Category::Analytics).len(),
        2,
        "F010 FALSIFIED: duplicate item was collapsed"
    );
}

proptest! {
    /// Distinct timestamps in any emission order come back non-decreasing.
    #[test]
    fn prop_query_is_non_decreasing(
        offsets in proptest::collection::hash_set(0i64..100_000, 1..40),
    ) {
        let harness = DebuggerTestHarness::new();
        let debugger = harness.start();
        let base =
            chrono::DateTime::parse_from_str("2018-01-01T00:00:00+0000", TIMESTAMP_FORMAT)
                .unwrap();

        for secs in &offsets {
            let ts = (base + Duration::seconds(*secs)).format(TIMESTAMP_FORMAT).to_string();
            debugger.emit("analytics-received", &analytics_payload(&secs.to_string(), Some(&ts)));
        }

        let store = debugger.data().query(Category::Analytics);
        prop_assert_eq!(store.len(), offsets.len());
        let stamps: Vec<_> = store.iter().filter_map(|i| i.created_at()).collect();
        prop_assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
    }
}
