//! Ease-out-quart smooth scrolling.

use crate::types::ScrollPosition;

/// Fast start, long tail. Clamped to `[0, 1]`.
#[must_use]
pub fn ease_out_quart(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(4)
}

/// A smooth scroll in progress. `position_at` is pure; the shell drives it
/// from animation frames, tests drive it with explicit timestamps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothScroll {
    from: ScrollPosition,
    to: ScrollPosition,
    start_ms: f64,
    duration_ms: f64,
}

impl SmoothScroll {
    #[must_use]
    pub fn new(from: ScrollPosition, to: ScrollPosition, start_ms: f64, duration_ms: f64) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms,
        }
    }

    #[must_use]
    pub fn target(&self) -> ScrollPosition {
        self.to
    }

    /// Position for `now_ms` plus whether the animation is finished. A
    /// non-positive duration finishes immediately at the target.
    #[must_use]
    pub fn position_at(&self, now_ms: f64) -> (ScrollPosition, bool) {
        if self.duration_ms <= 0.0 {
            return (self.to, true);
        }
        let t = ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0);
        let k = ease_out_quart(t);
        let pos = ScrollPosition::new(
            self.from.top + (self.to.top - self.from.top) * k,
            self.from.left + (self.to.left - self.from.left) * k,
        );
        (pos, t >= 1.0)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn easing_endpoints() {
        assert_eq!(ease_out_quart(0.0), 0.0);
        assert_eq!(ease_out_quart(1.0), 1.0);
        assert_eq!(ease_out_quart(-1.0), 0.0);
        assert_eq!(ease_out_quart(2.0), 1.0);
    }

    #[test]
    fn easing_front_loads_motion() {
        assert!(ease_out_quart(0.5) > 0.9);
        let early = ease_out_quart(0.25);
        let late = ease_out_quart(0.75) - ease_out_quart(0.5);
        assert!(early > late, "most travel happens early");
    }

    #[test]
    fn animation_lands_exactly_on_target() {
        let anim = SmoothScroll::new(
            ScrollPosition::new(0.0, 0.0),
            ScrollPosition::new(400.0, 120.0),
            1000.0,
            300.0,
        );
        let (start, done) = anim.position_at(1000.0);
        assert_eq!(start.top, 0.0);
        assert!(!done);

        let (mid, done) = anim.position_at(1150.0);
        assert!(mid.top > 0.0 && mid.top < 400.0);
        assert!(!done);

        let (end, done) = anim.position_at(1300.0);
        assert_eq!(end.top, 400.0);
        assert_eq!(end.left, 120.0);
        assert!(done);

        let (past, done) = anim.position_at(9999.0);
        assert_eq!(past.top, 400.0);
        assert!(done);
    }

    #[test]
    fn zero_duration_is_instant() {
        let anim = SmoothScroll::new(
            ScrollPosition::new(10.0, 10.0),
            ScrollPosition::new(50.0, 0.0),
            0.0,
            0.0,
        );
        let (pos, done) = anim.position_at(0.0);
        assert_eq!(pos, ScrollPosition::new(50.0, 0.0));
        assert!(done);
    }
}
