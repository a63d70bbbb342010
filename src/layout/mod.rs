//! Pure geometry for the grid.
//!
//! This module handles:
//! - Resolving column widths (explicit + flex distribution)
//! - Cumulative offsets and binary search for column lookup
//! - Fixed-side width sums consumed by the boundary calculator

mod columns;

pub use columns::ColumnLayout;
