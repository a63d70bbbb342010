//! The scroll engine: boundary math, absolute synchronization, shadows,
//! measurement, input planning, and load-more preservation.
//!
//! Everything here is DOM-free. The widget shell implements the pane traits
//! over elements and drives these types from browser events.

pub mod bounds;
pub mod easing;
pub mod engine;
pub mod input;
pub mod load_more;
pub mod lock;
pub mod measure;
pub mod pane;
pub mod shadow;

pub use bounds::{global_max_scroll_left, global_max_scroll_top, ScrollBounds};
pub use easing::{ease_out_quart, SmoothScroll};
pub use engine::{SyncEngine, SyncOutcome, SyncReport};
pub use input::{plan_wheel, DragTracker, Tap, TouchMove, TouchTracker};
pub use load_more::{LoadMoreSnapshot, LoadMoreState, RestorePlan};
pub use lock::{SyncGuard, SyncLock};
pub use measure::{
    clear_row_heights, resolve_row_heights, surfaces_ready, HeaderHeight, RetryPolicy, RetryState,
    RetryStep, RowHeightMap, RowSurface,
};
pub use pane::{PaneKind, PaneSet, PaneSurface};
pub use shadow::{
    handle_geometry, shadow_state, HandleGeometry, ScrollbarVisibility, ShadowInput, ShadowState,
};
