//! Load-more trigger and scroll preservation, end to end.
//!
//! The cycle under test: a downward scroll enters the trigger zone, exactly
//! one load-more fires, the host appends rows, and the reading position is
//! restored against the new geometry with a buffer above the new bottom so
//! the trigger cannot immediately re-fire.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::FakePane;
use tripane::sync::{LoadMoreState, PaneSet, SyncEngine, SyncOutcome, SyncReport};
use tripane::types::ScrollPosition;

const TOLERANCE: f64 = 5.0;
const OFFSET: f64 = 50.0;

fn applied(outcome: SyncOutcome) -> SyncReport {
    match outcome {
        SyncOutcome::Applied(report) => report,
        SyncOutcome::Dropped => panic!("expected an applied sync, got a drop"),
    }
}

/// 800px of rows in a 400px viewport: the bottom sits at scroll_top 400.
fn bottom_heavy() -> (SyncEngine<FakePane>, FakePane) {
    let main = FakePane::new(800.0, 400.0, 800.0, 800.0);
    let set = PaneSet {
        main: Some(main.clone()),
        ..PaneSet::default()
    };
    (SyncEngine::new(set, TOLERANCE), main)
}

// ============================================================================
// FULL CYCLE
// ============================================================================

#[test]
fn trigger_append_restore_cycle() {
    let (engine, main) = bottom_heavy();
    let mut load_more = LoadMoreState::new(OFFSET);

    // Scroll to the bottom: remaining 0 < 50, moving down.
    let report = applied(engine.sync_to(ScrollPosition::new(400.0, 0.0)));
    assert!(report.moved_down());
    assert!(
        load_more.on_scroll(&report.metrics, report.moved_down(), 20),
        "the bottom edge should trigger a load"
    );
    assert!(load_more.is_loading());

    // Host appends rows worth 10px of extra scroll: new max 410.
    main.set_content_height(810.0);
    let plan = load_more
        .complete(engine.max_top(), 44.0)
        .expect("an in-flight load should produce a restore plan");

    // 400 is within 1.5 * 44 = 66px of the new max, so pull back to 344.
    assert_eq!(plan.buffer, 66.0);
    assert_eq!(plan.target_top, 344.0);
    assert!(!load_more.is_loading(), "completion re-arms the trigger");

    // Restore is unconstrained and silent.
    let restore = applied(engine.sync_unconstrained(ScrollPosition::new(plan.target_top, 0.0)));
    assert!(restore.events.is_empty());
    assert_eq!(main.state().scroll_top, 344.0);

    // The settle re-sync lands on the same spot and must not re-trigger:
    // remaining is now 810 - 344 - 400 = 66, outside the 50px zone.
    let settled = applied(engine.sync_to(ScrollPosition::new(plan.target_top, 0.0)));
    assert!(
        !load_more.on_scroll(&settled.metrics, settled.moved_down(), 30),
        "the restored position must sit outside the trigger zone"
    );
}

// ============================================================================
// TRIGGER DISCIPLINE
// ============================================================================

#[test]
fn only_one_load_flies_at_a_time() {
    let (engine, _main) = bottom_heavy();
    let mut load_more = LoadMoreState::new(OFFSET);

    let first = applied(engine.sync_to(ScrollPosition::new(395.0, 0.0)));
    assert!(load_more.on_scroll(&first.metrics, true, 20));

    // Still in the zone, still moving down, but a load is in flight.
    let second = applied(engine.sync_to(ScrollPosition::new(400.0, 0.0)));
    assert!(!load_more.on_scroll(&second.metrics, true, 20));

    // The snapshot keeps the first trigger's position.
    let snapshot = load_more.snapshot().expect("snapshot taken at trigger");
    assert_eq!(snapshot.scroll_top_at_trigger, 395.0);
}

#[test]
fn upward_movement_through_the_zone_never_triggers() {
    let (engine, _main) = bottom_heavy();
    let mut load_more = LoadMoreState::new(OFFSET);

    engine.sync_to(ScrollPosition::new(400.0, 0.0));
    let report = applied(engine.sync_to(ScrollPosition::new(380.0, 0.0)));

    assert!(
        !load_more.on_scroll(&report.metrics, report.moved_down(), 20),
        "leaving the bottom is not a request for more rows"
    );
}

#[test]
fn remaining_must_be_strictly_inside_the_offset() {
    // 850px content: at scroll_top 400 exactly 50px remain below.
    let main = FakePane::new(850.0, 400.0, 800.0, 800.0);
    let set = PaneSet {
        main: Some(main.clone()),
        ..PaneSet::default()
    };
    let engine = SyncEngine::new(set, TOLERANCE);
    let mut load_more = LoadMoreState::new(OFFSET);

    let at_edge = applied(engine.sync_to(ScrollPosition::new(400.0, 0.0)));
    assert_eq!(at_edge.metrics.remaining_below(), 50.0);
    assert!(
        !load_more.on_scroll(&at_edge.metrics, true, 20),
        "exactly the offset is not inside the zone"
    );

    let inside = applied(engine.sync_to(ScrollPosition::new(401.0, 0.0)));
    assert!(load_more.on_scroll(&inside.metrics, true, 20));
}

#[test]
fn exhausted_data_silences_the_trigger() {
    let (engine, _main) = bottom_heavy();
    let mut load_more = LoadMoreState::new(OFFSET);
    load_more.set_has_more(false);

    let report = applied(engine.sync_to(ScrollPosition::new(400.0, 0.0)));
    assert!(!load_more.on_scroll(&report.metrics, true, 20));
}

#[test]
fn cancel_re_arms_the_trigger() {
    let (engine, _main) = bottom_heavy();
    let mut load_more = LoadMoreState::new(OFFSET);

    let report = applied(engine.sync_to(ScrollPosition::new(400.0, 0.0)));
    assert!(load_more.on_scroll(&report.metrics, true, 20));

    // The host's fetch failed.
    load_more.cancel();
    assert!(!load_more.is_loading());
    assert!(
        load_more.snapshot().is_none(),
        "a cancelled flight should not leave a stale snapshot"
    );

    assert!(
        load_more.on_scroll(&report.metrics, true, 20),
        "the next downward scroll in the zone should trigger again"
    );
}

#[test]
fn completion_without_a_flight_restores_nothing() {
    let mut load_more = LoadMoreState::new(OFFSET);
    assert!(load_more.complete(410.0, 44.0).is_none());
}
