//! Common test utilities: in-memory pane and row surfaces.
//!
//! `FakePane` stands in for a scrollable element. It records every write so
//! tests can assert on idempotence, and an optional write hook lets tests
//! re-enter the engine mid-sync the way a DOM scroll event would.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::cell::RefCell;
use std::rc::Rc;

use tripane::sync::{PaneSet, PaneSurface, RowSurface};

// ============================================================================
// FakePane
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct PaneState {
    pub scroll_top: f64,
    pub scroll_left: f64,
    pub scroll_height: f64,
    pub client_height: f64,
    pub scroll_width: f64,
    pub client_width: f64,
    /// Number of `set_scroll_top` calls that reached the surface.
    pub top_writes: usize,
    pub left_writes: usize,
}

type WriteHook = Box<dyn Fn(f64)>;

/// An in-memory scroll surface. Clones share state, so a pane can live in a
/// `PaneSet` while the test keeps a handle for inspection.
#[derive(Clone)]
pub struct FakePane {
    state: Rc<RefCell<PaneState>>,
    on_set_top: Rc<RefCell<Option<WriteHook>>>,
}

impl FakePane {
    /// A pane with the given geometry, scrolled to the origin.
    pub fn new(
        scroll_height: f64,
        client_height: f64,
        scroll_width: f64,
        client_width: f64,
    ) -> Self {
        Self {
            state: Rc::new(RefCell::new(PaneState {
                scroll_height,
                client_height,
                scroll_width,
                client_width,
                ..PaneState::default()
            })),
            on_set_top: Rc::new(RefCell::new(None)),
        }
    }

    /// A pane whose vertical max-scroll is exactly `max_scroll` (client 400).
    pub fn with_max_scroll(max_scroll: f64) -> Self {
        Self::new(400.0 + max_scroll, 400.0, 800.0, 800.0)
    }

    pub fn state(&self) -> PaneState {
        self.state.borrow().clone()
    }

    pub fn set_position(&self, top: f64, left: f64) {
        let mut s = self.state.borrow_mut();
        s.scroll_top = top;
        s.scroll_left = left;
    }

    pub fn set_content_height(&self, scroll_height: f64) {
        self.state.borrow_mut().scroll_height = scroll_height;
    }

    /// Run `hook` after every `set_scroll_top` write. Used to simulate a
    /// scroll listener firing while the engine still holds its lock.
    pub fn on_set_scroll_top(&self, hook: impl Fn(f64) + 'static) {
        *self.on_set_top.borrow_mut() = Some(Box::new(hook));
    }

    pub fn top_writes(&self) -> usize {
        self.state.borrow().top_writes
    }

    pub fn left_writes(&self) -> usize {
        self.state.borrow().left_writes
    }
}

impl PaneSurface for FakePane {
    fn scroll_top(&self) -> f64 {
        self.state.borrow().scroll_top
    }

    fn set_scroll_top(&self, top: f64) {
        {
            let mut s = self.state.borrow_mut();
            s.scroll_top = top;
            s.top_writes += 1;
        }
        let hook = self.on_set_top.borrow();
        if let Some(hook) = hook.as_ref() {
            hook(top);
        }
    }

    fn scroll_left(&self) -> f64 {
        self.state.borrow().scroll_left
    }

    fn set_scroll_left(&self, left: f64) {
        let mut s = self.state.borrow_mut();
        s.scroll_left = left;
        s.left_writes += 1;
    }

    fn scroll_height(&self) -> f64 {
        self.state.borrow().scroll_height
    }

    fn client_height(&self) -> f64 {
        self.state.borrow().client_height
    }

    fn scroll_width(&self) -> f64 {
        self.state.borrow().scroll_width
    }

    fn client_width(&self) -> f64 {
        self.state.borrow().client_width
    }
}

// ============================================================================
// Pane set builders
// ============================================================================

/// Main pane only: 2000px of content in a 400px viewport, 1200px of columns
/// in an 800px container (vertical max 1600).
pub fn main_only() -> (PaneSet<FakePane>, FakePane) {
    let main = FakePane::new(2000.0, 400.0, 1200.0, 800.0);
    let set = PaneSet {
        main: Some(main.clone()),
        ..PaneSet::default()
    };
    (set, main)
}

/// All four panes sharing the same vertical geometry. The header follows
/// horizontally only.
pub fn full_set() -> (PaneSet<FakePane>, FakePane, FakePane, FakePane, FakePane) {
    let main = FakePane::new(2000.0, 400.0, 1200.0, 800.0);
    let left = FakePane::new(2000.0, 400.0, 100.0, 100.0);
    let right = FakePane::new(2000.0, 400.0, 100.0, 100.0);
    let header = FakePane::new(48.0, 48.0, 1200.0, 800.0);
    let set = PaneSet {
        main: Some(main.clone()),
        left: Some(left.clone()),
        right: Some(right.clone()),
        header: Some(header.clone()),
    };
    (set, main, left, right, header)
}

/// Three vertical panes with differing max-scrolls (500, 480, 520).
pub fn uneven_set() -> (PaneSet<FakePane>, FakePane, FakePane, FakePane) {
    let main = FakePane::with_max_scroll(500.0);
    let left = FakePane::with_max_scroll(480.0);
    let right = FakePane::with_max_scroll(520.0);
    let set = PaneSet {
        main: Some(main.clone()),
        left: Some(left.clone()),
        right: Some(right.clone()),
        header: None,
    };
    (set, main, left, right)
}

// ============================================================================
// FakeRows
// ============================================================================

/// An in-memory row surface. Natural heights are fixed; pins and clears are
/// recorded for inspection.
pub struct FakeRows {
    naturals: Vec<Option<f64>>,
    pinned: RefCell<Vec<Option<f64>>>,
    clears: RefCell<usize>,
}

impl FakeRows {
    pub fn new(naturals: &[f64]) -> Self {
        Self {
            naturals: naturals.iter().copied().map(Some).collect(),
            pinned: RefCell::new(vec![None; naturals.len()]),
            clears: RefCell::new(0),
        }
    }

    /// Rows that exist but report no height yet (hidden mid-mount).
    pub fn unmeasurable(count: usize) -> Self {
        Self {
            naturals: vec![None; count],
            pinned: RefCell::new(vec![None; count]),
            clears: RefCell::new(0),
        }
    }

    pub fn pinned(&self) -> Vec<Option<f64>> {
        self.pinned.borrow().clone()
    }

    pub fn clear_count(&self) -> usize {
        *self.clears.borrow()
    }
}

impl RowSurface for FakeRows {
    fn row_count(&self) -> usize {
        self.naturals.len()
    }

    fn clear_row_height(&self, row: usize) {
        *self.clears.borrow_mut() += 1;
        if let Some(slot) = self.pinned.borrow_mut().get_mut(row) {
            *slot = None;
        }
    }

    fn natural_row_height(&self, row: usize) -> Option<f64> {
        self.naturals.get(row).copied().flatten()
    }

    fn pin_row_height(&self, row: usize, height: f64) {
        if let Some(slot) = self.pinned.borrow_mut().get_mut(row) {
            *slot = Some(height);
        }
    }
}
