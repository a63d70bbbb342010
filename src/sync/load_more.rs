//! Bottom-proximity load-more trigger and scroll restoration.
//!
//! The viewport must not jump when the host appends rows: the position at
//! trigger time is snapshotted and re-applied after the append, pulled back
//! from the new bottom by a buffer so the restored view sits above the fresh
//! rows instead of instantly re-triggering.

use crate::types::{ScrollMetrics, RESTORE_BUFFER_MIN};

/// Scroll context captured the moment load-more fires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadMoreSnapshot {
    pub scroll_top_at_trigger: f64,
    pub data_len_at_trigger: usize,
    pub scroll_height_at_trigger: f64,
}

/// Where to put the viewport after the new rows land.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RestorePlan {
    pub target_top: f64,
    pub buffer: f64,
}

impl RestorePlan {
    /// Pull the trigger-time position back from the new bottom by
    /// `max(1.5 * row_height, 50)` when it would land inside that band.
    #[must_use]
    pub fn compute(snapshot: &LoadMoreSnapshot, new_max_top: f64, row_height: f64) -> Self {
        let buffer = (row_height * 1.5).max(RESTORE_BUFFER_MIN);
        let mut target_top = snapshot.scroll_top_at_trigger;
        if target_top > new_max_top - buffer {
            target_top = (new_max_top - buffer).max(0.0);
        }
        Self { target_top, buffer }
    }
}

/// Single-flight load-more bookkeeping.
#[derive(Debug, Clone)]
pub struct LoadMoreState {
    offset: f64,
    loading: bool,
    has_more: bool,
    snapshot: Option<LoadMoreSnapshot>,
}

impl LoadMoreState {
    #[must_use]
    pub fn new(offset: f64) -> Self {
        Self {
            offset: offset.max(0.0),
            loading: false,
            has_more: true,
            snapshot: None,
        }
    }

    pub fn set_offset(&mut self, offset: f64) {
        self.offset = offset.max(0.0);
    }

    /// Host signal that no further pages exist; the trigger goes quiet.
    pub fn set_has_more(&mut self, has_more: bool) {
        self.has_more = has_more;
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<LoadMoreSnapshot> {
        self.snapshot
    }

    /// Evaluate a downward applied sync. Fires at most once per flight:
    /// captures the snapshot and enters the in-flight state when the bottom
    /// proximity drops below the offset.
    pub fn on_scroll(&mut self, metrics: &ScrollMetrics, moved_down: bool, data_len: usize) -> bool {
        if self.loading || !self.has_more || !moved_down {
            return false;
        }
        if metrics.remaining_below() >= self.offset {
            return false;
        }
        self.loading = true;
        self.snapshot = Some(LoadMoreSnapshot {
            scroll_top_at_trigger: metrics.scroll_top,
            data_len_at_trigger: data_len,
            scroll_height_at_trigger: metrics.scroll_height,
        });
        true
    }

    /// Completion from the host, after the new rows are in the DOM. Clears
    /// the in-flight state and returns the restore plan.
    pub fn complete(&mut self, new_max_top: f64, row_height: f64) -> Option<RestorePlan> {
        if !self.loading {
            return None;
        }
        self.loading = false;
        let snapshot = self.snapshot.take()?;
        Some(RestorePlan::compute(&snapshot, new_max_top, row_height))
    }

    /// Abandon an in-flight load (host error path).
    pub fn cancel(&mut self) {
        self.loading = false;
        self.snapshot = None;
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    fn near_bottom() -> ScrollMetrics {
        ScrollMetrics {
            scroll_top: 960.0,
            scroll_left: 0.0,
            scroll_height: 1600.0,
            client_height: 600.0,
            scroll_width: 800.0,
            client_width: 800.0,
        }
    }

    #[test]
    fn triggers_only_moving_down_within_offset() {
        let mut state = LoadMoreState::new(50.0);
        let mut metrics = near_bottom();
        metrics.scroll_top = 940.0; // 60 remaining
        assert!(!state.on_scroll(&metrics, true, 100));

        metrics.scroll_top = 960.0; // 40 remaining
        assert!(!state.on_scroll(&metrics, false, 100), "upward never fires");
        assert!(state.on_scroll(&metrics, true, 100));
        assert!(state.is_loading());
    }

    #[test]
    fn single_flight_and_snapshot_survive() {
        let mut state = LoadMoreState::new(50.0);
        assert!(state.on_scroll(&near_bottom(), true, 100));
        let snap = state.snapshot().unwrap();
        assert_eq!(snap.scroll_top_at_trigger, 960.0);
        assert_eq!(snap.data_len_at_trigger, 100);
        assert_eq!(snap.scroll_height_at_trigger, 1600.0);

        // Further scrolls while in flight neither fire nor clobber.
        let mut deeper = near_bottom();
        deeper.scroll_top = 999.0;
        assert!(!state.on_scroll(&deeper, true, 100));
        assert_eq!(state.snapshot().unwrap().scroll_top_at_trigger, 960.0);
    }

    #[test]
    fn completion_restores_with_buffer() {
        let mut state = LoadMoreState::new(50.0);
        assert!(state.on_scroll(&near_bottom(), true, 100));

        // New max far below the trigger point: position is kept verbatim.
        let plan = state.complete(2000.0, 44.0).unwrap();
        assert_eq!(plan.buffer, 66.0);
        assert_eq!(plan.target_top, 960.0);
        assert!(!state.is_loading());
        assert!(state.snapshot().is_none());
    }

    #[test]
    fn completion_pulls_back_near_new_bottom() {
        let mut state = LoadMoreState::new(50.0);
        let mut metrics = near_bottom();
        metrics.scroll_top = 380.0;
        metrics.scroll_height = 1000.0;
        assert!(state.on_scroll(&metrics, true, 40));

        // 44px rows: buffer 66; target 380 > 410 - 66, so pull back to 344.
        let plan = state.complete(410.0, 44.0).unwrap();
        assert_eq!(plan.target_top, 344.0);
    }

    #[test]
    fn completion_without_flight_is_none() {
        let mut state = LoadMoreState::new(50.0);
        assert!(state.complete(500.0, 44.0).is_none());
    }

    #[test]
    fn has_more_false_silences_trigger() {
        let mut state = LoadMoreState::new(50.0);
        state.set_has_more(false);
        assert!(!state.on_scroll(&near_bottom(), true, 100));
        state.set_has_more(true);
        assert!(state.on_scroll(&near_bottom(), true, 100));
    }

    #[test]
    fn buffer_never_pulls_past_zero() {
        let snapshot = LoadMoreSnapshot {
            scroll_top_at_trigger: 30.0,
            data_len_at_trigger: 5,
            scroll_height_at_trigger: 200.0,
        };
        let plan = RestorePlan::compute(&snapshot, 40.0, 44.0);
        assert_eq!(plan.target_top, 0.0);
    }
}
