//! Absolute scroll synchronization across panes.
//!
//! One position is the truth for every pane: a sync clamps the requested
//! position to global bounds, then writes `scroll_top` to all vertical panes
//! and `scroll_left` to the main pane and header. Writes are skipped when a
//! pane already holds the target value, which is what terminates the DOM
//! scroll-event feedback loop after programmatic writes.

use std::cell::Cell;

use crate::sync::bounds::{global_max_scroll_top, ScrollBounds};
use crate::sync::lock::SyncLock;
use crate::sync::pane::{PaneKind, PaneSet, PaneSurface};
use crate::types::{GridEvent, ScrollMetrics, ScrollPosition};

/// Result of one sync attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    Applied(SyncReport),
    /// The per-instance lock was held (nested attempt) or the source pane
    /// was absent. Nothing was written.
    Dropped,
}

impl SyncOutcome {
    #[must_use]
    pub fn is_dropped(&self) -> bool {
        matches!(self, Self::Dropped)
    }

    #[must_use]
    pub fn applied(&self) -> Option<&SyncReport> {
        match self {
            Self::Applied(report) => Some(report),
            Self::Dropped => None,
        }
    }
}

/// What an applied sync did.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    /// Position before this sync (last applied).
    pub previous: ScrollPosition,
    /// Position written to the panes (post-clamp for constrained syncs).
    pub position: ScrollPosition,
    /// Main-pane geometry read back after the writes.
    pub metrics: ScrollMetrics,
    /// Events to surface, in emission order. Empty for unconstrained syncs.
    pub events: Vec<GridEvent>,
}

impl SyncReport {
    /// True when this sync moved the viewport down.
    #[must_use]
    pub fn moved_down(&self) -> bool {
        self.position.top > self.previous.top
    }
}

/// The per-instance synchronizer. Takes `&self` throughout so pane write
/// observers can call back in and hit the lock.
pub struct SyncEngine<P: PaneSurface> {
    panes: PaneSet<P>,
    lock: SyncLock,
    /// Horizontal maximum from the column layout; vertical maxima are read
    /// live from the panes.
    max_left: Cell<f64>,
    tolerance: f64,
    last: Cell<ScrollPosition>,
}

impl<P: PaneSurface> SyncEngine<P> {
    #[must_use]
    pub fn new(panes: PaneSet<P>, tolerance: f64) -> Self {
        Self {
            panes,
            lock: SyncLock::new(),
            max_left: Cell::new(0.0),
            tolerance,
            last: Cell::new(ScrollPosition::default()),
        }
    }

    pub fn panes(&self) -> &PaneSet<P> {
        &self.panes
    }

    pub fn set_max_left(&self, max_left: f64) {
        self.max_left.set(max_left.max(0.0));
    }

    #[must_use]
    pub fn max_left(&self) -> f64 {
        self.max_left.get()
    }

    /// Live vertical maximum over the present panes.
    #[must_use]
    pub fn max_top(&self) -> f64 {
        global_max_scroll_top(&self.panes)
    }

    #[must_use]
    pub fn bounds(&self) -> ScrollBounds {
        ScrollBounds::new(self.max_top(), self.max_left.get())
    }

    /// Last applied position.
    #[must_use]
    pub fn position(&self) -> ScrollPosition {
        self.last.get()
    }

    #[must_use]
    pub fn metrics(&self) -> ScrollMetrics {
        self.panes.metrics()
    }

    #[must_use]
    pub fn is_syncing(&self) -> bool {
        self.lock.is_held()
    }

    /// Adopt one pane's live position as the truth for all panes.
    pub fn sync_from(&self, source: PaneKind) -> SyncOutcome {
        let Some(pane) = self.panes.get(source) else {
            return SyncOutcome::Dropped;
        };
        let target = ScrollPosition::new(pane.scroll_top(), pane.scroll_left());
        self.apply(target, true)
    }

    /// Push a programmatic target to all panes, clamped to global bounds.
    pub fn sync_to(&self, target: ScrollPosition) -> SyncOutcome {
        self.apply(target, true)
    }

    /// Push a target without clamping and without emitting events. Used
    /// during load-more restoration while the DOM's reported maxima are
    /// stale; a constrained sync follows once the layout settles.
    pub fn sync_unconstrained(&self, target: ScrollPosition) -> SyncOutcome {
        self.apply(target, false)
    }

    fn apply(&self, target: ScrollPosition, constrained: bool) -> SyncOutcome {
        let Some(_guard) = self.lock.try_acquire() else {
            return SyncOutcome::Dropped;
        };
        let bounds = self.bounds();
        let pos = if constrained {
            bounds.clamp(target)
        } else {
            target
        };
        let previous = self.last.get();

        for (_, pane) in self.panes.vertical() {
            if (pane.scroll_top() - pos.top).abs() > f64::EPSILON {
                pane.set_scroll_top(pos.top);
            }
        }
        if let Some(main) = &self.panes.main {
            if (main.scroll_left() - pos.left).abs() > f64::EPSILON {
                main.set_scroll_left(pos.left);
            }
        }
        if let Some(header) = &self.panes.header {
            if (header.scroll_left() - pos.left).abs() > f64::EPSILON {
                header.set_scroll_left(pos.left);
            }
        }
        self.last.set(pos);

        let metrics = self.panes.metrics();
        let mut events = Vec::new();
        if constrained && self.panes.main.is_some() {
            events.push(GridEvent::Scroll(metrics));
            if metrics.scroll_top <= self.tolerance {
                events.push(GridEvent::ScrollToTop(metrics));
            }
            if metrics.remaining_below() <= self.tolerance {
                events.push(GridEvent::ScrollToBottom(metrics));
            }
            if metrics.scroll_left <= self.tolerance {
                events.push(GridEvent::ScrollToLeft(metrics));
            }
            if bounds.max_left - metrics.scroll_left <= self.tolerance {
                events.push(GridEvent::ScrollToRight(metrics));
            }
        }

        SyncOutcome::Applied(SyncReport {
            previous,
            position: pos,
            metrics,
            events,
        })
    }
}
