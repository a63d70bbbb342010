//! Scroll positions, metrics, and the events the engine reports.

use serde::Serialize;

/// Absolute scroll offsets of a pane in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollPosition {
    pub top: f64,
    pub left: f64,
}

impl ScrollPosition {
    #[must_use]
    pub fn new(top: f64, left: f64) -> Self {
        Self { top, left }
    }
}

/// Scroll geometry of the main pane, attached to every emitted event.
///
/// Field names serialize in the DOM's own casing so host code can treat the
/// payload like a native element snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub scroll_left: f64,
    pub scroll_height: f64,
    pub client_height: f64,
    pub scroll_width: f64,
    pub client_width: f64,
}

impl ScrollMetrics {
    /// Pixels of content left below the viewport.
    #[must_use]
    pub fn remaining_below(&self) -> f64 {
        self.scroll_height - self.scroll_top - self.client_height
    }

    #[must_use]
    pub fn position(&self) -> ScrollPosition {
        ScrollPosition::new(self.scroll_top, self.scroll_left)
    }
}

/// Events surfaced to the host. Edge events accompany (never replace) the
/// plain `Scroll` event for the same sync.
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    Scroll(ScrollMetrics),
    ScrollToTop(ScrollMetrics),
    ScrollToBottom(ScrollMetrics),
    ScrollToLeft(ScrollMetrics),
    ScrollToRight(ScrollMetrics),
    LoadMore(ScrollMetrics),
    RowClick { row: usize },
}

impl GridEvent {
    /// Host-facing event name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Scroll(_) => "scroll",
            Self::ScrollToTop(_) => "scroll-to-top",
            Self::ScrollToBottom(_) => "scroll-to-bottom",
            Self::ScrollToLeft(_) => "scroll-to-left",
            Self::ScrollToRight(_) => "scroll-to-right",
            Self::LoadMore(_) => "load-more",
            Self::RowClick { .. } => "row-click",
        }
    }

    #[must_use]
    pub fn metrics(&self) -> Option<&ScrollMetrics> {
        match self {
            Self::Scroll(m)
            | Self::ScrollToTop(m)
            | Self::ScrollToBottom(m)
            | Self::ScrollToLeft(m)
            | Self::ScrollToRight(m)
            | Self::LoadMore(m) => Some(m),
            Self::RowClick { .. } => None,
        }
    }
}
