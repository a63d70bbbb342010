//! tripane - multi-pane data grid scroll engine for the web
//!
//! Keeps three independently scrollable panes (main, left-fixed, right-fixed)
//! and a horizontally-following header in exact lockstep:
//! - Absolute position synchronization (no drifting delta math)
//! - Row and header height measurement across panes
//! - Fixed-column shadows and an auto-hiding horizontal scrollbar
//! - Wheel and touch emulation for the fixed panes
//! - Scroll preservation when more rows load in at the bottom
//!
//! The engine is DOM-free and tests on any target; the `widget` module binds
//! it to real elements via WebAssembly.
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { TriPaneGrid } from 'tripane';
//! await init();
//! const grid = new TriPaneGrid('grid-root', { loadMoreOffset: 50 });
//! grid.set_columns(columns);
//! grid.set_row_count(rows.length);
//! grid.on('load-more', () => fetchMore());
//! ```

// Engine modules (DOM-free)
pub mod error;
pub mod layout;
pub mod sync;
pub mod types;

// Browser binding (WebAssembly)
#[cfg(target_arch = "wasm32")]
pub mod widget;

use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
pub use widget::TriPaneGrid;

pub use error::{Result, TripaneError};
pub use types::*;

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
