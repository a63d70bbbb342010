//! Column width resolution and cumulative offset lookups.
//!
//! Widths resolve in one pass: explicit widths are taken as-is, flexible
//! columns split the leftover container width proportionally to their
//! minimum widths (never dropping below them). The resolved layout feeds the
//! boundary calculator (total and fixed widths) and `scroll_to_column`.

use crate::types::{ColumnSpec, FixedSide};

/// Resolved column geometry for one container width.
#[derive(Debug, Clone, Default)]
pub struct ColumnLayout {
    widths: Vec<f64>,
    /// Cumulative positions (`positions[i]` = x of column i's left edge,
    /// final entry = total width).
    positions: Vec<f64>,
    left_fixed: f64,
    right_fixed: f64,
    left_count: usize,
    right_count: usize,
}

impl ColumnLayout {
    /// Resolve widths against a container width.
    #[must_use]
    pub fn resolve(columns: &[ColumnSpec], container_width: f64) -> Self {
        let mut widths = Vec::with_capacity(columns.len());
        let mut flex = Vec::with_capacity(columns.len());
        let mut flex_min_total = 0.0;
        let mut used = 0.0;

        for col in columns {
            let w = match col.width {
                Some(w) if w.is_finite() && w > 0.0 => {
                    flex.push(false);
                    w
                }
                _ => {
                    flex.push(true);
                    flex_min_total += col.min_width.max(0.0);
                    col.min_width.max(0.0)
                }
            };
            used += w;
            widths.push(w);
        }

        // Flex columns absorb leftover container width, keyed by min width.
        let leftover = container_width - used;
        if leftover > 0.0 && flex_min_total > 0.0 {
            for ((col, w), is_flex) in columns.iter().zip(widths.iter_mut()).zip(flex.iter()) {
                if *is_flex {
                    *w += leftover * (col.min_width.max(0.0) / flex_min_total);
                }
            }
        }

        let mut positions = Vec::with_capacity(widths.len() + 1);
        let mut x = 0.0;
        for w in &widths {
            positions.push(x);
            x += w;
        }
        positions.push(x);

        let mut left_fixed = 0.0;
        let mut right_fixed = 0.0;
        let mut left_count = 0;
        let mut right_count = 0;
        for (col, w) in columns.iter().zip(widths.iter()) {
            match col.fixed {
                FixedSide::Left => {
                    left_fixed += w;
                    left_count += 1;
                }
                FixedSide::Right => {
                    right_fixed += w;
                    right_count += 1;
                }
                FixedSide::None => {}
            }
        }

        Self {
            widths,
            positions,
            left_fixed,
            right_fixed,
            left_count,
            right_count,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.widths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    /// Sum of all resolved column widths.
    #[must_use]
    pub fn total_width(&self) -> f64 {
        self.positions.last().copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn left_fixed_width(&self) -> f64 {
        self.left_fixed
    }

    #[must_use]
    pub fn right_fixed_width(&self) -> f64 {
        self.right_fixed
    }

    #[must_use]
    pub fn has_left_fixed(&self) -> bool {
        self.left_count > 0
    }

    #[must_use]
    pub fn has_right_fixed(&self) -> bool {
        self.right_count > 0
    }

    /// Left edge of a column, `None` past the end.
    #[must_use]
    pub fn offset_of(&self, index: usize) -> Option<f64> {
        if index < self.widths.len() {
            self.positions.get(index).copied()
        } else {
            None
        }
    }

    #[must_use]
    pub fn width_of(&self, index: usize) -> Option<f64> {
        self.widths.get(index).copied()
    }

    /// Column containing x, clamped into range at the edges.
    #[must_use]
    pub fn column_at(&self, x: f64) -> Option<usize> {
        if self.widths.is_empty() || x < 0.0 || x >= self.total_width() {
            return None;
        }
        match self
            .positions
            .binary_search_by(|pos| pos.partial_cmp(&x).unwrap_or(std::cmp::Ordering::Equal))
        {
            Ok(i) => Some(i.min(self.widths.len().saturating_sub(1))),
            Err(i) => Some(i.saturating_sub(1)),
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    fn spec(key: &str, width: Option<f64>, min: f64, fixed: FixedSide) -> ColumnSpec {
        ColumnSpec {
            key: key.to_string(),
            width,
            min_width: min,
            fixed,
        }
    }

    #[test]
    fn explicit_widths_sum() {
        let cols = vec![
            spec("a", Some(100.0), 80.0, FixedSide::Left),
            spec("b", Some(300.0), 80.0, FixedSide::None),
            spec("c", Some(150.0), 80.0, FixedSide::Right),
        ];
        let layout = ColumnLayout::resolve(&cols, 400.0);
        assert_eq!(layout.total_width(), 550.0);
        assert_eq!(layout.left_fixed_width(), 100.0);
        assert_eq!(layout.right_fixed_width(), 150.0);
        assert!(layout.has_left_fixed());
        assert!(layout.has_right_fixed());
    }

    #[test]
    fn flex_columns_fill_leftover() {
        let cols = vec![
            spec("a", Some(200.0), 80.0, FixedSide::None),
            spec("b", None, 100.0, FixedSide::None),
            spec("c", None, 100.0, FixedSide::None),
        ];
        // 600 leftover over two equal flex columns
        let layout = ColumnLayout::resolve(&cols, 1000.0);
        assert_eq!(layout.total_width(), 1000.0);
        assert_eq!(layout.width_of(1), Some(400.0));
        assert_eq!(layout.width_of(2), Some(400.0));
    }

    #[test]
    fn flex_never_shrinks_below_min() {
        let cols = vec![
            spec("a", Some(700.0), 80.0, FixedSide::None),
            spec("b", None, 120.0, FixedSide::None),
        ];
        // No leftover: the flex column stays at its min.
        let layout = ColumnLayout::resolve(&cols, 600.0);
        assert_eq!(layout.width_of(1), Some(120.0));
        assert_eq!(layout.total_width(), 820.0);
    }

    #[test]
    fn offsets_and_lookup() {
        let cols = vec![
            spec("a", Some(100.0), 80.0, FixedSide::None),
            spec("b", Some(200.0), 80.0, FixedSide::None),
            spec("c", Some(50.0), 80.0, FixedSide::None),
        ];
        let layout = ColumnLayout::resolve(&cols, 350.0);
        assert_eq!(layout.offset_of(0), Some(0.0));
        assert_eq!(layout.offset_of(1), Some(100.0));
        assert_eq!(layout.offset_of(2), Some(300.0));
        assert_eq!(layout.offset_of(3), None);

        assert_eq!(layout.column_at(0.0), Some(0));
        assert_eq!(layout.column_at(99.9), Some(0));
        assert_eq!(layout.column_at(100.0), Some(1));
        assert_eq!(layout.column_at(349.0), Some(2));
        assert_eq!(layout.column_at(350.0), None);
        assert_eq!(layout.column_at(-1.0), None);
    }

    #[test]
    fn empty_layout_is_harmless() {
        let layout = ColumnLayout::resolve(&[], 800.0);
        assert!(layout.is_empty());
        assert_eq!(layout.total_width(), 0.0);
        assert_eq!(layout.column_at(10.0), None);
        assert!(!layout.has_left_fixed());
    }
}
