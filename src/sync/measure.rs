//! Header and row-height measurement with cross-pane pinning.
//!
//! Panes can only stay aligned if every pane agrees on every row's height.
//! Measurement is two-phase: clear pinned heights so rows fall back to their
//! natural height, let the DOM reflow for a frame, then read naturals, take
//! the per-row max across panes, floor it, and pin it everywhere.

use crate::types::MEASURE_MAX_ATTEMPTS;
use crate::types::MEASURE_RETRY_DELAY_MS;

/// Per-row surface of one pane. The widget implements this over a pane's row
/// elements; tests implement it over vectors.
pub trait RowSurface {
    fn row_count(&self) -> usize;
    /// Remove a pinned height so the row reflows to natural height.
    fn clear_row_height(&self, row: usize);
    /// Natural (content-driven) height; `None` when the row is not laid out.
    fn natural_row_height(&self, row: usize) -> Option<f64>;
    /// Pin height, min-height, and max-height to the given value.
    fn pin_row_height(&self, row: usize, height: f64);
}

/// Measured row heights after the last resolve.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowHeightMap {
    heights: Vec<f64>,
}

impl RowHeightMap {
    #[must_use]
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    #[must_use]
    pub fn get(&self, row: usize) -> Option<f64> {
        self.heights.get(row).copied()
    }

    /// Mean measured height; `None` until something was measured. Feeds the
    /// load-more restore buffer.
    #[must_use]
    pub fn typical(&self) -> Option<f64> {
        if self.heights.is_empty() {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        Some(self.heights.iter().sum::<f64>() / self.heights.len() as f64)
    }
}

/// Header height with a measurement lock. The first successful measurement
/// wins; later ones are ignored unless forced, so late pane mounts cannot
/// nudge an already-settled layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderHeight {
    value: f64,
    locked: bool,
}

impl HeaderHeight {
    #[must_use]
    pub fn new(default: f64) -> Self {
        Self {
            value: default,
            locked: false,
        }
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Adopt the max of the per-pane measurements. Returns the newly pinned
    /// height, or `None` when the existing value stands (locked without
    /// `force`, or nothing measured above zero).
    pub fn measure(
        &mut self,
        measured: impl IntoIterator<Item = f64>,
        force: bool,
    ) -> Option<f64> {
        if self.locked && !force {
            return None;
        }
        let best = measured.into_iter().fold(0.0_f64, f64::max);
        if best > 0.0 {
            self.value = best;
            self.locked = true;
            Some(best)
        } else {
            None
        }
    }
}

/// Phase 1: clear pinned heights on every pane so the next frame reflows
/// rows to natural height.
pub fn clear_row_heights<S: RowSurface>(surfaces: &[&S]) {
    for surface in surfaces {
        for row in 0..surface.row_count() {
            surface.clear_row_height(row);
        }
    }
}

/// Phase 2: read naturals, take the per-row max across panes, floor it at
/// `min_height`, pin it on every pane that has the row.
pub fn resolve_row_heights<S: RowSurface>(surfaces: &[&S], min_height: f64) -> RowHeightMap {
    let rows = surfaces
        .iter()
        .map(|s| s.row_count())
        .max()
        .unwrap_or(0);
    let mut heights = Vec::with_capacity(rows);
    for row in 0..rows {
        let mut best = 0.0_f64;
        for surface in surfaces {
            if let Some(h) = surface.natural_row_height(row) {
                best = best.max(h);
            }
        }
        let pinned = best.max(min_height);
        for surface in surfaces {
            if row < surface.row_count() {
                surface.pin_row_height(row, pinned);
            }
        }
        heights.push(pinned);
    }
    RowHeightMap { heights }
}

/// True once some pane has rows with a real laid-out height.
pub fn surfaces_ready<S: RowSurface>(surfaces: &[&S]) -> bool {
    surfaces.iter().any(|s| {
        s.row_count() > 0
            && (0..s.row_count()).any(|row| s.natural_row_height(row).is_some_and(|h| h > 0.0))
    })
}

/// Bounded retry schedule for measurement while panes are still mounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay_ms: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MEASURE_MAX_ATTEMPTS,
            delay_ms: MEASURE_RETRY_DELAY_MS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryStep {
    /// Surfaces are laid out; measure now.
    Ready,
    /// Not laid out yet; try again after this many ms.
    RetryAfter(u32),
    /// Attempt budget exhausted until the next explicit request.
    GaveUp,
}

/// Attempt counter for one measurement request. Resets on `Ready` and on
/// `GaveUp`, so the next request starts with a full budget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryState {
    attempts: u32,
}

impl RetryState {
    pub fn step(&mut self, policy: RetryPolicy, ready: bool) -> RetryStep {
        if ready {
            self.attempts = 0;
            return RetryStep::Ready;
        }
        self.attempts += 1;
        if self.attempts >= policy.max_attempts {
            self.attempts = 0;
            RetryStep::GaveUp
        } else {
            RetryStep::RetryAfter(policy.delay_ms)
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

    #[test]
    fn header_first_measurement_locks() {
        let mut header = HeaderHeight::new(48.0);
        assert!(!header.is_locked());
        assert_eq!(header.measure([52.0, 50.0], false), Some(52.0));
        assert!(header.is_locked());
        // Locked: a later, larger measurement is ignored.
        assert_eq!(header.measure([60.0], false), None);
        assert_eq!(header.value(), 52.0);
        // Forced re-measure wins.
        assert_eq!(header.measure([60.0], true), Some(60.0));
        assert_eq!(header.value(), 60.0);
    }

    #[test]
    fn header_ignores_zero_measurements() {
        let mut header = HeaderHeight::new(48.0);
        assert_eq!(header.measure([0.0, 0.0], false), None);
        assert_eq!(header.value(), 48.0);
        assert!(!header.is_locked(), "a failed measure must not lock");
    }

    #[test]
    fn retry_is_bounded() {
        let mut retry = RetryState::default();
        let policy = RetryPolicy {
            max_attempts: 3,
            delay_ms: 200,
        };
        assert_eq!(retry.step(policy, false), RetryStep::RetryAfter(200));
        assert_eq!(retry.step(policy, false), RetryStep::RetryAfter(200));
        assert_eq!(retry.step(policy, false), RetryStep::GaveUp);
        // Budget is fresh after giving up.
        assert_eq!(retry.step(policy, false), RetryStep::RetryAfter(200));
        assert_eq!(retry.step(policy, true), RetryStep::Ready);
    }
}
