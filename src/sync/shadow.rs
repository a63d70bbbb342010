//! Fixed-column shadows and the custom horizontal scrollbar model.
//!
//! Pure state: the widget shell maps these outputs onto CSS classes and
//! inline styles each time the horizontal position changes.

use crate::types::MIN_HANDLE_WIDTH;

/// Everything the shadow state machine reads.
#[derive(Debug, Clone, Copy)]
pub struct ShadowInput {
    pub has_left_fixed: bool,
    pub has_right_fixed: bool,
    pub total_columns_width: f64,
    pub container_width: f64,
    pub left_fixed_width: f64,
    pub right_fixed_width: f64,
    pub scroll_left: f64,
    pub tolerance: f64,
}

/// Whether each fixed side casts its "content underneath" shadow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShadowState {
    pub left: bool,
    pub right: bool,
}

/// A side shadows once content is scrolled underneath it, with the edge
/// tolerance keeping it off near the ends.
#[must_use]
pub fn shadow_state(input: &ShadowInput) -> ShadowState {
    let overflows = input.total_columns_width > input.container_width;
    let left = input.has_left_fixed && overflows && input.scroll_left > input.tolerance;

    // Indicator range, not the clamp maximum: the fixed widths cancel out of
    // both terms, so with fixed panes the right shadow clears slightly
    // before the true horizontal max.
    let room = (input.total_columns_width - input.left_fixed_width - input.right_fixed_width)
        - (input.container_width - input.left_fixed_width - input.right_fixed_width);
    let right = input.has_right_fixed && overflows && input.scroll_left < room - input.tolerance;

    ShadowState { left, right }
}

/// Scrollbar handle geometry within its track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleGeometry {
    pub width: f64,
    pub offset: f64,
}

/// Proportional handle with a minimum grab size; fills the track when the
/// content does not overflow.
#[must_use]
pub fn handle_geometry(
    track_width: f64,
    client_width: f64,
    scroll_width: f64,
    scroll_left: f64,
) -> HandleGeometry {
    if track_width <= 0.0 || scroll_width <= client_width || scroll_width <= 0.0 {
        return HandleGeometry {
            width: track_width.max(0.0),
            offset: 0.0,
        };
    }
    let width = (track_width * client_width / scroll_width)
        .max(MIN_HANDLE_WIDTH)
        .min(track_width);
    let max_left = scroll_width - client_width;
    let span = track_width - width;
    let offset = if max_left > 0.0 && span > 0.0 {
        (span * (scroll_left / max_left)).clamp(0.0, span)
    } else {
        0.0
    };
    HandleGeometry { width, offset }
}

/// Visibility window for the auto-hiding scrollbar. Activity keeps it alive;
/// dragging pins it open.
#[derive(Debug, Clone)]
pub struct ScrollbarVisibility {
    hide_after_ms: f64,
    last_activity_ms: f64,
    dragging: bool,
}

impl ScrollbarVisibility {
    #[must_use]
    pub fn new(hide_after_ms: f64) -> Self {
        Self {
            hide_after_ms: hide_after_ms.max(0.0),
            last_activity_ms: f64::NEG_INFINITY,
            dragging: false,
        }
    }

    /// Record scroll/drag activity at `now_ms`.
    pub fn touch(&mut self, now_ms: f64) {
        self.last_activity_ms = now_ms;
    }

    pub fn begin_drag(&mut self, now_ms: f64) {
        self.dragging = true;
        self.touch(now_ms);
    }

    pub fn end_drag(&mut self, now_ms: f64) {
        self.dragging = false;
        self.touch(now_ms);
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Visible while content overflows and the auto-hide window is open.
    #[must_use]
    pub fn is_visible(&self, now_ms: f64, overflows: bool) -> bool {
        if !overflows {
            return false;
        }
        self.dragging || now_ms - self.last_activity_ms < self.hide_after_ms
    }

    /// When the current window closes; scheduling hint for the shell's timer.
    #[must_use]
    pub fn hide_deadline_ms(&self) -> f64 {
        self.last_activity_ms + self.hide_after_ms
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

    fn input(scroll_left: f64) -> ShadowInput {
        ShadowInput {
            has_left_fixed: true,
            has_right_fixed: true,
            total_columns_width: 1200.0,
            container_width: 800.0,
            left_fixed_width: 200.0,
            right_fixed_width: 100.0,
            scroll_left,
            tolerance: 5.0,
        }
    }

    #[test]
    fn origin_shows_only_the_right_shadow() {
        let state = shadow_state(&input(0.0));
        assert!(!state.left);
        assert!(state.right, "content hides under the right pane at origin");
    }

    #[test]
    fn left_shadow_needs_more_than_tolerance() {
        assert!(!shadow_state(&input(5.0)).left);
        assert!(shadow_state(&input(5.1)).left);
    }

    #[test]
    fn right_shadow_clears_at_indicator_room() {
        // room = (1200 - 300) - (800 - 300) = 400
        assert!(shadow_state(&input(394.9)).right);
        assert!(!shadow_state(&input(395.0)).right);
        assert!(!shadow_state(&input(400.0)).right);
    }

    #[test]
    fn no_overflow_means_no_shadows() {
        let mut i = input(50.0);
        i.total_columns_width = 700.0;
        let state = shadow_state(&i);
        assert!(!state.left);
        assert!(!state.right);
    }

    #[test]
    fn handle_fills_track_without_overflow() {
        let g = handle_geometry(600.0, 800.0, 500.0, 0.0);
        assert_eq!(g.width, 600.0);
        assert_eq!(g.offset, 0.0);
    }

    #[test]
    fn handle_width_proportional_with_floor() {
        // Proportional: 600 * 600/1200 = 300.
        let g = handle_geometry(600.0, 600.0, 1200.0, 0.0);
        assert_eq!(g.width, 300.0);
        // Tiny ratio floors at the minimum grab size.
        let g = handle_geometry(600.0, 600.0, 60000.0, 0.0);
        assert_eq!(g.width, MIN_HANDLE_WIDTH);
    }

    #[test]
    fn handle_offset_tracks_scroll() {
        let g = handle_geometry(600.0, 600.0, 1200.0, 600.0);
        // At max scroll the handle sits at the end of its span.
        assert_eq!(g.offset, 600.0 - g.width);
        let mid = handle_geometry(600.0, 600.0, 1200.0, 300.0);
        assert_eq!(mid.offset, (600.0 - mid.width) / 2.0);
    }

    #[test]
    fn visibility_window_and_drag_pin() {
        let mut vis = ScrollbarVisibility::new(1500.0);
        assert!(!vis.is_visible(0.0, true));
        vis.touch(1000.0);
        assert!(vis.is_visible(2499.0, true));
        assert!(!vis.is_visible(2500.0, true));
        assert!(!vis.is_visible(1500.0, false), "hidden without overflow");

        vis.begin_drag(5000.0);
        assert!(vis.is_visible(60000.0, true), "dragging pins it open");
        vis.end_drag(60000.0);
        assert!(vis.is_visible(61499.0, true));
        assert!(!vis.is_visible(61500.0, true));
    }
}
