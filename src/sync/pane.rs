//! Pane handles: the narrow seam between the engine and the DOM.

use crate::types::ScrollMetrics;

/// Identifies one of the synchronized panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneKind {
    Main,
    LeftFixed,
    RightFixed,
    Header,
}

/// A scrollable pane as the engine sees it.
///
/// The widget implements this over DOM elements; tests implement it over an
/// in-memory fake. Setters take `&self` so a write observed by the host (a
/// DOM scroll event, a fake's callback) can call back into the engine.
/// Setters must not clamp; clamping is the engine's job.
pub trait PaneSurface {
    fn scroll_top(&self) -> f64;
    fn set_scroll_top(&self, top: f64);
    fn scroll_left(&self) -> f64;
    fn set_scroll_left(&self, left: f64);
    fn scroll_height(&self) -> f64;
    fn client_height(&self) -> f64;
    fn scroll_width(&self) -> f64;
    fn client_width(&self) -> f64;
}

/// Handles for every pane. Any subset may be present; a missing pane is
/// skipped everywhere, never an error.
#[derive(Debug, Clone)]
pub struct PaneSet<P> {
    pub main: Option<P>,
    pub left: Option<P>,
    pub right: Option<P>,
    /// Header wrapper; participates in horizontal sync only.
    pub header: Option<P>,
}

impl<P> Default for PaneSet<P> {
    fn default() -> Self {
        Self {
            main: None,
            left: None,
            right: None,
            header: None,
        }
    }
}

impl<P> PaneSet<P> {
    pub fn get(&self, kind: PaneKind) -> Option<&P> {
        match kind {
            PaneKind::Main => self.main.as_ref(),
            PaneKind::LeftFixed => self.left.as_ref(),
            PaneKind::RightFixed => self.right.as_ref(),
            PaneKind::Header => self.header.as_ref(),
        }
    }

    /// Present panes that take part in vertical sync, main first.
    pub fn vertical(&self) -> impl Iterator<Item = (PaneKind, &P)> {
        [
            (PaneKind::Main, self.main.as_ref()),
            (PaneKind::LeftFixed, self.left.as_ref()),
            (PaneKind::RightFixed, self.right.as_ref()),
        ]
        .into_iter()
        .filter_map(|(kind, pane)| pane.map(|p| (kind, p)))
    }
}

impl<P: PaneSurface> PaneSet<P> {
    /// Scroll geometry of the main pane; zeros when it is absent.
    pub fn metrics(&self) -> ScrollMetrics {
        let Some(main) = &self.main else {
            return ScrollMetrics::default();
        };
        ScrollMetrics {
            scroll_top: main.scroll_top(),
            scroll_left: main.scroll_left(),
            scroll_height: main.scroll_height(),
            client_height: main.client_height(),
            scroll_width: main.scroll_width(),
            client_width: main.client_width(),
        }
    }
}
