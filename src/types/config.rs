//! Grid options and the tuning constants the engine is built around.

use serde::Deserialize;

/// Rows never pin below this height (px).
pub const MIN_ROW_HEIGHT: f64 = 44.0;

/// Header height before the first successful measurement (px).
pub const DEFAULT_HEADER_HEIGHT: f64 = 48.0;

/// Distance from an edge still treated as "at" that edge (px).
pub const EDGE_TOLERANCE: f64 = 5.0;

/// Bottom proximity that triggers load-more (px).
pub const DEFAULT_LOAD_MORE_OFFSET: f64 = 50.0;

/// Wheel delta multiplier.
pub const DEFAULT_WHEEL_SENSITIVITY: f64 = 1.0;

/// Touch movement below this is ignored on both axes (px).
pub const TOUCH_DEAD_ZONE: f64 = 3.0;

/// A touch shorter than this can count as a tap (ms).
pub const TAP_MAX_MS: f64 = 200.0;

/// A touch travelling less than this can count as a tap (px).
pub const TAP_MAX_DISTANCE: f64 = 10.0;

/// Scrollbar handle never renders narrower than this (px).
pub const MIN_HANDLE_WIDTH: f64 = 30.0;

/// Scrollbar hides this long after the last activity (ms).
pub const SCROLLBAR_AUTO_HIDE_MS: u32 = 1500;

/// Floor for the load-more restore buffer (px).
pub const RESTORE_BUFFER_MIN: f64 = 50.0;

/// Delay before the post-restore constrained sync (ms).
pub const RESTORE_SETTLE_MS: u32 = 50;

/// Default smooth-scroll duration (ms).
pub const DEFAULT_SMOOTH_MS: f64 = 300.0;

/// Spacing between dimension-measurement attempts while panes lay out (ms).
pub const MEASURE_RETRY_DELAY_MS: u32 = 200;

/// Measurement attempts before giving up until the next explicit request.
pub const MEASURE_MAX_ATTEMPTS: u32 = 3;

/// Host-tunable knobs, deserialized from the JS options object. Every field
/// has a default so `{}` (or nothing) is a valid configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridOptions {
    /// Floor applied to measured row heights.
    pub min_row_height: f64,
    /// Header height used until the first measurement locks one in.
    pub header_height: f64,
    /// Bottom proximity that fires `load-more`.
    pub load_more_offset: f64,
    pub wheel_sensitivity: f64,
    /// Edge tolerance for `scroll-to-*` events and shadows.
    pub edge_tolerance: f64,
    pub smooth_duration_ms: f64,
    /// Scrollbar auto-hide delay.
    pub auto_hide_ms: u32,
    /// CSS class of the main body pane inside the container.
    pub main_class: String,
    pub left_class: String,
    pub right_class: String,
    pub header_class: String,
    /// Explicit element ids override the class queries when present.
    pub main_id: Option<String>,
    pub left_id: Option<String>,
    pub right_id: Option<String>,
    pub header_id: Option<String>,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            min_row_height: MIN_ROW_HEIGHT,
            header_height: DEFAULT_HEADER_HEIGHT,
            load_more_offset: DEFAULT_LOAD_MORE_OFFSET,
            wheel_sensitivity: DEFAULT_WHEEL_SENSITIVITY,
            edge_tolerance: EDGE_TOLERANCE,
            smooth_duration_ms: DEFAULT_SMOOTH_MS,
            auto_hide_ms: SCROLLBAR_AUTO_HIDE_MS,
            main_class: "tripane-body".to_string(),
            left_class: "tripane-body--left".to_string(),
            right_class: "tripane-body--right".to_string(),
            header_class: "tripane-header".to_string(),
            main_id: None,
            left_id: None,
            right_id: None,
            header_id: None,
        }
    }
}

impl GridOptions {
    /// Clamp nonsense values rather than erroring; hosts pass these straight
    /// from user config.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        if !self.min_row_height.is_finite() || self.min_row_height <= 0.0 {
            self.min_row_height = MIN_ROW_HEIGHT;
        }
        if !self.header_height.is_finite() || self.header_height <= 0.0 {
            self.header_height = DEFAULT_HEADER_HEIGHT;
        }
        if !self.load_more_offset.is_finite() || self.load_more_offset < 0.0 {
            self.load_more_offset = DEFAULT_LOAD_MORE_OFFSET;
        }
        if !self.wheel_sensitivity.is_finite() || self.wheel_sensitivity <= 0.0 {
            self.wheel_sensitivity = DEFAULT_WHEEL_SENSITIVITY;
        }
        if !self.edge_tolerance.is_finite() || self.edge_tolerance < 0.0 {
            self.edge_tolerance = EDGE_TOLERANCE;
        }
        if !self.smooth_duration_ms.is_finite() || self.smooth_duration_ms < 0.0 {
            self.smooth_duration_ms = DEFAULT_SMOOTH_MS;
        }
        self
    }
}
