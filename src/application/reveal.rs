//! Progressive left-to-right reveal of a freshly rebuilt trace set.
//!
//! Shown point count follows a cubic ease-in over the configured duration,
//! so the draw starts slowly and speeds up towards the newest candles.

/// Points visible on the first frame
pub const REVEAL_INITIAL_POINTS: usize = 2;

pub fn ease_in_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * t
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealStep {
    /// Draw the first `k` points and schedule another frame
    Show(usize),
    /// Draw everything; the animation is over
    Finish(usize),
}

#[derive(Debug, Clone)]
pub struct RevealAnimator {
    total: usize,
    started_at: f64,
    duration_ms: f64,
    shown: usize,
}

impl RevealAnimator {
    /// Start at `now`; returns the animator and the first point count to draw
    pub fn start(total: usize, now: f64, duration_ms: f64) -> (Self, usize) {
        let first = REVEAL_INITIAL_POINTS.min(total);
        let animator = Self { total, started_at: now, duration_ms: duration_ms.max(0.0), shown: first };
        (animator, first)
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn shown(&self) -> usize {
        self.shown
    }

    pub fn progress(&self, now: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now - self.started_at) / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Point count for the frame at `now`; never decreases between calls
    pub fn step(&mut self, now: f64) -> RevealStep {
        let p = self.progress(now);
        if p >= 1.0 || self.total <= REVEAL_INITIAL_POINTS {
            self.shown = self.total;
            return RevealStep::Finish(self.total);
        }

        let span = (self.total - 1) as f64;
        let eased = 1 + (ease_in_cubic(p) * span).floor() as usize;
        let floor = REVEAL_INITIAL_POINTS.min(self.total);
        self.shown = eased.clamp(floor, self.total).max(self.shown);

        if self.shown >= self.total {
            RevealStep::Finish(self.total)
        } else {
            RevealStep::Show(self.shown)
        }
    }
}
