//! Global scroll boundary math.
//!
//! Vertical and horizontal maxima come from different sources: the vertical
//! maximum is read live from pane geometry, the horizontal maximum from the
//! resolved column layout against the container width.

use crate::sync::pane::{PaneSet, PaneSurface};
use crate::types::ScrollPosition;

/// Clamping bounds for one sync, both axes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollBounds {
    pub max_top: f64,
    pub max_left: f64,
}

impl ScrollBounds {
    #[must_use]
    pub fn new(max_top: f64, max_left: f64) -> Self {
        Self { max_top, max_left }
    }

    /// Clamp both axes into `[0, max]`.
    #[must_use]
    pub fn clamp(&self, pos: ScrollPosition) -> ScrollPosition {
        ScrollPosition {
            top: pos.top.clamp(0.0, self.max_top.max(0.0)),
            left: pos.left.clamp(0.0, self.max_left.max(0.0)),
        }
    }
}

/// Max vertical scroll no pane can overshoot: the minimum over present panes
/// of `scroll_height - client_height`. The minimum, not the maximum, so a
/// shorter fixed pane caps everyone.
pub fn global_max_scroll_top<P: PaneSurface>(panes: &PaneSet<P>) -> f64 {
    let mut global: Option<f64> = None;
    for (_, pane) in panes.vertical() {
        let pane_max = (pane.scroll_height() - pane.client_height()).max(0.0);
        global = Some(match global {
            Some(current) => current.min(pane_max),
            None => pane_max,
        });
    }
    global.unwrap_or(0.0)
}

/// Max horizontal scroll of the main pane. The main viewport is the
/// container minus both fixed regions; columns overflow against that.
#[must_use]
pub fn global_max_scroll_left(
    total_columns_width: f64,
    container_width: f64,
    left_fixed_width: f64,
    right_fixed_width: f64,
) -> f64 {
    let main_viewport = container_width - left_fixed_width - right_fixed_width;
    (total_columns_width - main_viewport).max(0.0)
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
    fn horizontal_max_accounts_for_fixed_widths() {
        // 1200 of columns in an 800 container with a 200 left-fixed region:
        // the main viewport is 600, so 600 of overflow remains.
        assert_eq!(global_max_scroll_left(1200.0, 800.0, 200.0, 0.0), 600.0);
        assert_eq!(global_max_scroll_left(1200.0, 800.0, 200.0, 100.0), 700.0);
        assert_eq!(global_max_scroll_left(500.0, 800.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn clamp_floors_at_zero() {
        let bounds = ScrollBounds::new(300.0, 100.0);
        let clamped = bounds.clamp(ScrollPosition::new(-5.0, 400.0));
        assert_eq!(clamped.top, 0.0);
        assert_eq!(clamped.left, 100.0);
    }

    #[test]
    fn clamp_survives_negative_maxima() {
        let bounds = ScrollBounds::new(-10.0, -10.0);
        let clamped = bounds.clamp(ScrollPosition::new(50.0, 50.0));
        assert_eq!(clamped.top, 0.0);
        assert_eq!(clamped.left, 0.0);
    }
}
