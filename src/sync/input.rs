//! Wheel, touch, and scrollbar-drag translation into sync targets.
//!
//! Adapters are planners: they turn raw input into a target position plus a
//! consume/pass-through decision, and the shell feeds targets to the engine.

use crate::sync::bounds::ScrollBounds;
use crate::types::{ScrollPosition, TAP_MAX_DISTANCE, TAP_MAX_MS, TOUCH_DEAD_ZONE};

/// Vertical wheel on a fixed pane: redirect into the shared position. The
/// event default is always prevented (fixed panes cannot scroll natively).
#[must_use]
pub fn plan_wheel(current: ScrollPosition, delta_y: f64, sensitivity: f64) -> ScrollPosition {
    ScrollPosition::new(current.top + delta_y * sensitivity, current.left)
}

/// What to do with one touch move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TouchMove {
    /// Inside the dead zone, or no gesture in progress.
    Ignore,
    /// The gesture pushes past a boundary the pane already sits at; leave
    /// the event alone so the page can rubber-band or keep scrolling.
    PassThrough,
    /// Consume the event and sync to this target.
    Scroll(ScrollPosition),
}

/// A tap: short touch with almost no travel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tap {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy)]
struct TouchStart {
    x: f64,
    y: f64,
    time_ms: f64,
    /// Scroll position when the finger went down; targets are computed from
    /// here, not incrementally, so a long gesture cannot accumulate drift.
    origin: ScrollPosition,
}

/// One active touch gesture.
#[derive(Debug, Clone, Copy, Default)]
pub struct TouchTracker {
    start: Option<TouchStart>,
}

impl TouchTracker {
    pub fn begin(&mut self, x: f64, y: f64, time_ms: f64, origin: ScrollPosition) {
        self.start = Some(TouchStart {
            x,
            y,
            time_ms,
            origin,
        });
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.start.is_some()
    }

    /// Plan for a finger at (x, y). `current` is the pane's live position,
    /// used for the boundary check; targets come from the gesture origin.
    /// The dominant axis wins outright; the other axis is left untouched.
    #[must_use]
    pub fn on_move(
        &self,
        x: f64,
        y: f64,
        current: ScrollPosition,
        bounds: &ScrollBounds,
    ) -> TouchMove {
        let Some(start) = self.start else {
            return TouchMove::Ignore;
        };
        // Content deltas: finger up drags content up, so scroll_top grows.
        let dx = start.x - x;
        let dy = start.y - y;
        if dx.abs() < TOUCH_DEAD_ZONE && dy.abs() < TOUCH_DEAD_ZONE {
            return TouchMove::Ignore;
        }

        if dy.abs() >= dx.abs() {
            let target = start.origin.top + dy;
            if target < 0.0 && current.top <= 0.0 {
                return TouchMove::PassThrough;
            }
            if target > bounds.max_top && current.top >= bounds.max_top {
                return TouchMove::PassThrough;
            }
            TouchMove::Scroll(ScrollPosition::new(target, current.left))
        } else {
            let target = start.origin.left + dx;
            if target < 0.0 && current.left <= 0.0 {
                return TouchMove::PassThrough;
            }
            if target > bounds.max_left && current.left >= bounds.max_left {
                return TouchMove::PassThrough;
            }
            TouchMove::Scroll(ScrollPosition::new(current.top, target))
        }
    }

    /// End the gesture; reports a tap when it was short and nearly still.
    pub fn end(&mut self, x: f64, y: f64, time_ms: f64) -> Option<Tap> {
        let start = self.start.take()?;
        let duration = time_ms - start.time_ms;
        let distance = ((x - start.x).powi(2) + (y - start.y).powi(2)).sqrt();
        (duration < TAP_MAX_MS && distance < TAP_MAX_DISTANCE).then_some(Tap { x, y })
    }

    pub fn cancel(&mut self) {
        self.start = None;
    }
}

/// An active scrollbar-handle drag. Pixel deltas on the track map to content
/// deltas through the ratio of scrollable content to free track span.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragTracker {
    start_client_x: f64,
    start_scroll_left: f64,
    ratio: f64,
}

impl DragTracker {
    #[must_use]
    pub fn begin(
        client_x: f64,
        scroll_left: f64,
        track_width: f64,
        handle_width: f64,
        scroll_width: f64,
        client_width: f64,
    ) -> Self {
        let span = track_width - handle_width;
        let range = scroll_width - client_width;
        let ratio = if span > 0.0 && range > 0.0 {
            range / span
        } else {
            0.0
        };
        Self {
            start_client_x: client_x,
            start_scroll_left: scroll_left,
            ratio,
        }
    }

    /// Content position for the pointer at `client_x` (unclamped; the
    /// engine clamps).
    #[must_use]
    pub fn target_left(&self, client_x: f64) -> f64 {
        self.start_scroll_left + (client_x - self.start_client_x) * self.ratio
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

    #[test]
    fn wheel_scales_by_sensitivity() {
        let target = plan_wheel(ScrollPosition::new(100.0, 40.0), 53.0, 1.0);
        assert_eq!(target.top, 153.0);
        assert_eq!(target.left, 40.0);
        let fast = plan_wheel(ScrollPosition::new(100.0, 40.0), 53.0, 2.0);
        assert_eq!(fast.top, 206.0);
    }

    #[test]
    fn dead_zone_ignores_jitter() {
        let mut touch = TouchTracker::default();
        touch.begin(100.0, 100.0, 0.0, ScrollPosition::new(50.0, 0.0));
        let bounds = ScrollBounds::new(500.0, 0.0);
        let m = touch.on_move(101.0, 102.9, ScrollPosition::new(50.0, 0.0), &bounds);
        assert_eq!(m, TouchMove::Ignore);
    }

    #[test]
    fn vertical_gesture_targets_from_origin() {
        let mut touch = TouchTracker::default();
        touch.begin(100.0, 300.0, 0.0, ScrollPosition::new(50.0, 10.0));
        let bounds = ScrollBounds::new(500.0, 200.0);
        // Finger up 40px: content scrolls down 40.
        let m = touch.on_move(100.0, 260.0, ScrollPosition::new(50.0, 10.0), &bounds);
        assert_eq!(m, TouchMove::Scroll(ScrollPosition::new(90.0, 10.0)));
    }

    #[test]
    fn pull_down_at_top_passes_through() {
        let mut touch = TouchTracker::default();
        touch.begin(100.0, 100.0, 0.0, ScrollPosition::default());
        let bounds = ScrollBounds::new(500.0, 0.0);
        let m = touch.on_move(100.0, 160.0, ScrollPosition::default(), &bounds);
        assert_eq!(m, TouchMove::PassThrough, "rubber-band belongs to the page");
    }

    #[test]
    fn push_up_at_bottom_passes_through() {
        let mut touch = TouchTracker::default();
        touch.begin(100.0, 300.0, 0.0, ScrollPosition::new(500.0, 0.0));
        let bounds = ScrollBounds::new(500.0, 0.0);
        let m = touch.on_move(100.0, 200.0, ScrollPosition::new(500.0, 0.0), &bounds);
        assert_eq!(m, TouchMove::PassThrough);
    }

    #[test]
    fn boundary_consumed_when_room_remains() {
        let mut touch = TouchTracker::default();
        touch.begin(100.0, 100.0, 0.0, ScrollPosition::new(30.0, 0.0));
        let bounds = ScrollBounds::new(500.0, 0.0);
        // Target goes negative but the pane is not at top yet: consume.
        let m = touch.on_move(100.0, 160.0, ScrollPosition::new(30.0, 0.0), &bounds);
        assert_eq!(m, TouchMove::Scroll(ScrollPosition::new(-30.0, 0.0)));
    }

    #[test]
    fn dominant_axis_wins() {
        let mut touch = TouchTracker::default();
        touch.begin(200.0, 200.0, 0.0, ScrollPosition::new(0.0, 100.0));
        let bounds = ScrollBounds::new(500.0, 400.0);
        // Mostly horizontal: vertical component is discarded.
        let m = touch.on_move(150.0, 190.0, ScrollPosition::new(0.0, 100.0), &bounds);
        assert_eq!(m, TouchMove::Scroll(ScrollPosition::new(0.0, 150.0)));
    }

    #[test]
    fn tap_detection_bounds() {
        let mut touch = TouchTracker::default();
        touch.begin(100.0, 100.0, 1000.0, ScrollPosition::default());
        assert_eq!(
            touch.end(104.0, 103.0, 1150.0),
            Some(Tap { x: 104.0, y: 103.0 })
        );

        touch.begin(100.0, 100.0, 1000.0, ScrollPosition::default());
        assert_eq!(touch.end(104.0, 103.0, 1200.0), None, "too slow");

        touch.begin(100.0, 100.0, 1000.0, ScrollPosition::default());
        assert_eq!(touch.end(100.0, 111.0, 1050.0), None, "too far");
        assert!(!touch.is_active());
    }

    #[test]
    fn drag_maps_track_pixels_to_content() {
        // 540 of free span moves 1080 of content: ratio 2.
        let drag = DragTracker::begin(400.0, 120.0, 600.0, 60.0, 1680.0, 600.0);
        assert_eq!(drag.target_left(400.0), 120.0);
        assert_eq!(drag.target_left(410.0), 140.0);
        assert_eq!(drag.target_left(390.0), 100.0);
    }

    #[test]
    fn drag_with_full_track_handle_is_inert() {
        let drag = DragTracker::begin(400.0, 0.0, 600.0, 600.0, 500.0, 600.0);
        assert_eq!(drag.target_left(500.0), 0.0);
    }
}
