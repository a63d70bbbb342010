//! Absolute synchronization engine tests.
//!
//! Every sync takes one absolute position and writes it to all followers,
//! clamped to the tightest pane's bounds. Duplicate writes are suppressed so
//! the browser's echo scroll events terminate, and a lock drops syncs that
//! re-enter while writes are still in flight.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use std::cell::Cell;
use std::rc::Rc;

use common::{full_set, main_only, uneven_set, FakePane};
use tripane::sync::{PaneKind, PaneSet, SyncEngine, SyncOutcome, SyncReport};
use tripane::types::ScrollPosition;

const TOLERANCE: f64 = 5.0;

fn applied(outcome: SyncOutcome) -> SyncReport {
    match outcome {
        SyncOutcome::Applied(report) => report,
        SyncOutcome::Dropped => panic!("expected an applied sync, got a drop"),
    }
}

fn event_names(report: &SyncReport) -> Vec<&'static str> {
    report.events.iter().map(|e| e.name()).collect()
}

// ============================================================================
// ABSOLUTE SYNC
// ============================================================================

#[test]
fn sync_moves_every_vertical_pane_to_the_same_top() {
    let (set, main, left, right, _header) = full_set();
    let engine = SyncEngine::new(set, TOLERANCE);

    applied(engine.sync_to(ScrollPosition::new(120.0, 0.0)));

    assert_eq!(main.state().scroll_top, 120.0, "main should land on 120");
    assert_eq!(left.state().scroll_top, 120.0, "left should follow main");
    assert_eq!(right.state().scroll_top, 120.0, "right should follow main");
}

#[test]
fn header_follows_horizontally_but_never_vertically() {
    let (set, _main, _left, _right, header) = full_set();
    let engine = SyncEngine::new(set, TOLERANCE);
    engine.set_max_left(600.0);

    applied(engine.sync_to(ScrollPosition::new(120.0, 250.0)));

    assert_eq!(
        header.state().scroll_left,
        250.0,
        "header should follow the horizontal position"
    );
    assert_eq!(
        header.top_writes(),
        0,
        "header must never receive vertical writes"
    );
}

#[test]
fn fixed_panes_never_scroll_horizontally() {
    let (set, main, left, right, _header) = full_set();
    let engine = SyncEngine::new(set, TOLERANCE);
    engine.set_max_left(600.0);

    applied(engine.sync_to(ScrollPosition::new(0.0, 300.0)));

    assert_eq!(main.state().scroll_left, 300.0);
    assert_eq!(left.left_writes(), 0, "left-fixed pane holds its columns");
    assert_eq!(right.left_writes(), 0, "right-fixed pane holds its columns");
}

#[test]
fn sync_from_reads_the_source_pane_position() {
    let (set, main, left, _right, _header) = full_set();
    let engine = SyncEngine::new(set, TOLERANCE);

    // The user scrolled the left pane directly.
    left.set_position(90.0, 0.0);
    let report = applied(engine.sync_from(PaneKind::LeftFixed));

    assert_eq!(report.position.top, 90.0);
    assert_eq!(main.state().scroll_top, 90.0, "main should catch up");
}

#[test]
fn sync_from_a_missing_pane_is_dropped() {
    let (set, _main) = main_only();
    let engine = SyncEngine::new(set, TOLERANCE);

    assert!(
        engine.sync_from(PaneKind::LeftFixed).is_dropped(),
        "no source pane means nothing to sync from"
    );
}

// ============================================================================
// CLAMPING
// ============================================================================

#[test]
fn vertical_clamp_uses_the_tightest_pane() {
    // Max-scrolls 500, 480, 520: the set can only go to 480 together.
    let (set, main, left, right) = uneven_set();
    let engine = SyncEngine::new(set, TOLERANCE);

    assert_eq!(engine.max_top(), 480.0, "bound should be the minimum");

    applied(engine.sync_to(ScrollPosition::new(1000.0, 0.0)));
    assert_eq!(main.state().scroll_top, 480.0);
    assert_eq!(left.state().scroll_top, 480.0);
    assert_eq!(right.state().scroll_top, 480.0);
}

#[test]
fn horizontal_clamp_respects_the_configured_max() {
    // 1200px of columns, 800px container, 100px fixed on each side:
    // 1200 - (800 - 100 - 100) = 600.
    let (set, main) = main_only();
    let engine = SyncEngine::new(set, TOLERANCE);
    engine.set_max_left(600.0);

    applied(engine.sync_to(ScrollPosition::new(0.0, 650.0)));
    assert_eq!(main.state().scroll_left, 600.0, "650 must clamp to 600");
}

#[test]
fn negative_targets_clamp_to_origin() {
    let (set, main) = main_only();
    let engine = SyncEngine::new(set, TOLERANCE);

    applied(engine.sync_to(ScrollPosition::new(-40.0, -10.0)));
    assert_eq!(main.state().scroll_top, 0.0);
    assert_eq!(main.state().scroll_left, 0.0);
}

#[test]
fn max_top_tracks_live_content_growth() {
    let (set, main) = main_only();
    let engine = SyncEngine::new(set, TOLERANCE);
    assert_eq!(engine.max_top(), 1600.0);

    // More rows appended: the bound is re-read, not cached.
    main.set_content_height(3000.0);
    assert_eq!(engine.max_top(), 2600.0);
}

// ============================================================================
// IDEMPOTENT WRITES
// ============================================================================

#[test]
fn repeating_a_position_skips_surface_writes() {
    let (set, main, left, right, header) = full_set();
    let engine = SyncEngine::new(set, TOLERANCE);
    engine.set_max_left(600.0);

    applied(engine.sync_to(ScrollPosition::new(100.0, 50.0)));
    let top_writes = main.top_writes();
    let left_writes = header.left_writes();

    // The echo: a follower's scroll event reports the position just written.
    applied(engine.sync_from(PaneKind::Main));

    assert_eq!(
        main.top_writes(),
        top_writes,
        "no pane should be re-written for an unchanged position"
    );
    assert_eq!(header.left_writes(), left_writes);
    assert_eq!(left.state().scroll_top, 100.0);
    assert_eq!(right.state().scroll_top, 100.0);
}

// ============================================================================
// RE-ENTRANCY
// ============================================================================

#[test]
fn re_entrant_sync_is_dropped_without_blocking() {
    let (set, main, _left, _right, _header) = full_set();
    let engine = Rc::new(SyncEngine::new(set, TOLERANCE));

    // A scroll listener firing synchronously during the write storm.
    let observed = Rc::new(Cell::new(None));
    {
        let engine = Rc::clone(&engine);
        let observed = Rc::clone(&observed);
        main.on_set_scroll_top(move |_| {
            let outcome = engine.sync_to(ScrollPosition::new(0.0, 0.0));
            observed.set(Some(outcome.is_dropped()));
        });
    }

    let outcome = engine.sync_to(ScrollPosition::new(100.0, 0.0));
    assert!(!outcome.is_dropped(), "the outer sync should apply");
    assert_eq!(
        observed.get(),
        Some(true),
        "the nested sync must be dropped, not queued or deadlocked"
    );
    assert!(!engine.is_syncing(), "lock must release after the sync");
}

// ============================================================================
// EVENTS
// ============================================================================

#[test]
fn every_applied_sync_reports_a_scroll_event() {
    let (set, _main) = main_only();
    let engine = SyncEngine::new(set, TOLERANCE);

    let report = applied(engine.sync_to(ScrollPosition::new(200.0, 0.0)));
    assert!(
        event_names(&report).contains(&"scroll"),
        "scroll should fire on every applied sync, got {:?}",
        event_names(&report)
    );
}

#[test]
fn top_and_left_edges_detect_within_tolerance() {
    let (set, _main) = main_only();
    let engine = SyncEngine::new(set, TOLERANCE);
    engine.set_max_left(600.0);

    // 4px from each edge, inside the 5px tolerance.
    let report = applied(engine.sync_to(ScrollPosition::new(4.0, 3.0)));
    let names = event_names(&report);
    assert!(names.contains(&"scroll-to-top"), "got {names:?}");
    assert!(names.contains(&"scroll-to-left"), "got {names:?}");
}

#[test]
fn bottom_and_right_edges_detect_within_tolerance() {
    let (set, _main) = main_only();
    let engine = SyncEngine::new(set, TOLERANCE);
    engine.set_max_left(600.0);

    // 2000 - 1596 - 400 = 4px below; 600 - 596 = 4px right.
    let report = applied(engine.sync_to(ScrollPosition::new(1596.0, 596.0)));
    let names = event_names(&report);
    assert!(names.contains(&"scroll-to-bottom"), "got {names:?}");
    assert!(names.contains(&"scroll-to-right"), "got {names:?}");
}

#[test]
fn mid_scroll_positions_report_no_edges() {
    let (set, _main) = main_only();
    let engine = SyncEngine::new(set, TOLERANCE);
    engine.set_max_left(600.0);

    let report = applied(engine.sync_to(ScrollPosition::new(800.0, 300.0)));
    assert_eq!(
        event_names(&report),
        vec!["scroll"],
        "6px past every edge means scroll only"
    );
}

#[test]
fn events_require_the_main_pane() {
    let left = FakePane::new(2000.0, 400.0, 100.0, 100.0);
    let set = PaneSet {
        left: Some(left.clone()),
        ..PaneSet::default()
    };
    let engine = SyncEngine::new(set, TOLERANCE);

    let report = applied(engine.sync_to(ScrollPosition::new(100.0, 0.0)));
    assert_eq!(left.state().scroll_top, 100.0, "writes still happen");
    assert!(
        report.events.is_empty(),
        "metrics have no source of truth without the main pane"
    );
}

#[test]
fn moved_down_tracks_the_vertical_direction() {
    let (set, _main) = main_only();
    let engine = SyncEngine::new(set, TOLERANCE);

    let down = applied(engine.sync_to(ScrollPosition::new(100.0, 0.0)));
    assert!(down.moved_down());

    let up = applied(engine.sync_to(ScrollPosition::new(40.0, 0.0)));
    assert!(!up.moved_down());
}

// ============================================================================
// UNCONSTRAINED SYNC
// ============================================================================

#[test]
fn unconstrained_sync_skips_the_clamp_and_stays_silent() {
    let (set, main) = main_only();
    let engine = SyncEngine::new(set, TOLERANCE);

    // 2100 is past the 1600 max; the restore path needs it written as-is.
    let report = applied(engine.sync_unconstrained(ScrollPosition::new(2100.0, 0.0)));

    assert_eq!(
        main.state().scroll_top,
        2100.0,
        "unconstrained writes go through unclamped"
    );
    assert!(
        report.events.is_empty(),
        "a restore write must not feed back into the trigger"
    );
}

// ============================================================================
// METRICS
// ============================================================================

#[test]
fn metrics_read_back_after_the_writes() {
    let (set, _main) = main_only();
    let engine = SyncEngine::new(set, TOLERANCE);

    applied(engine.sync_to(ScrollPosition::new(300.0, 0.0)));
    let metrics = engine.metrics();

    assert_eq!(metrics.scroll_top, 300.0);
    assert_eq!(metrics.scroll_height, 2000.0);
    assert_eq!(metrics.client_height, 400.0);
    assert_eq!(metrics.remaining_below(), 1300.0);
}

#[test]
fn metrics_are_zero_without_a_main_pane() {
    let engine: SyncEngine<FakePane> = SyncEngine::new(PaneSet::default(), TOLERANCE);
    let metrics = engine.metrics();
    assert_eq!(metrics.scroll_height, 0.0);
    assert_eq!(metrics.client_width, 0.0);
}
