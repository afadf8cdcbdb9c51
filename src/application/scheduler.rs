//! Visibility-gated periodic refresh.
//!
//! The scheduler itself holds no timer: the browser binding calls
//! [`RefreshScheduler::on_timer`] from a `gloo_timers` interval and
//! [`RefreshScheduler::on_visibility_change`] from a `visibilitychange`
//! listener, then issues a passive draw when told to.

use super::config::{DEFAULT_REFRESH_INTERVAL_MS, MIN_REFRESH_INTERVAL_MS};
use serde::Serialize;
use std::cell::Cell;

/// Answers whether refreshing is currently useful
pub trait VisibilityProbe {
    fn is_visible(&self) -> bool;
}

impl<F: Fn() -> bool> VisibilityProbe for F {
    fn is_visible(&self) -> bool {
        self()
    }
}

/// Active-panel flag combined with a document visibility probe
pub struct PanelVisibility<D: VisibilityProbe> {
    active: Cell<bool>,
    document: D,
}

impl<D: VisibilityProbe> PanelVisibility<D> {
    pub fn new(document: D) -> Self {
        Self { active: Cell::new(true), document }
    }

    pub fn set_active(&self, active: bool) {
        self.active.set(active);
    }
}

impl<D: VisibilityProbe> VisibilityProbe for PanelVisibility<D> {
    fn is_visible(&self) -> bool {
        self.active.get() && self.document.is_visible()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickDecision {
    Refresh,
    /// Hidden or inactive; remembered until visibility returns
    Suppressed,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Countdown {
    pub remaining_ms: f64,
    /// Elapsed share of the current interval, 0..=1
    pub fraction: f64,
}

#[derive(Debug, Clone)]
pub struct RefreshScheduler {
    interval_ms: u32,
    /// Start of the current countdown period, set while running
    period_start: Option<f64>,
    missed_tick: bool,
}

impl Default for RefreshScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_INTERVAL_MS)
    }
}

impl RefreshScheduler {
    pub fn new(interval_ms: u32) -> Self {
        Self { interval_ms: interval_ms.max(MIN_REFRESH_INTERVAL_MS), period_start: None, missed_tick: false }
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    pub fn start(&mut self, now: f64) {
        self.period_start = Some(now);
        self.missed_tick = false;
    }

    pub fn stop(&mut self) {
        self.period_start = None;
        self.missed_tick = false;
    }

    pub fn is_running(&self) -> bool {
        self.period_start.is_some()
    }

    pub fn has_missed_tick(&self) -> bool {
        self.missed_tick
    }

    /// Interval elapsed: refresh if visible, otherwise remember the tick
    pub fn on_timer(&mut self, now: f64, probe: &impl VisibilityProbe) -> TickDecision {
        if !self.is_running() {
            return TickDecision::Stopped;
        }
        self.period_start = Some(now);
        if probe.is_visible() {
            self.missed_tick = false;
            TickDecision::Refresh
        } else {
            self.missed_tick = true;
            TickDecision::Suppressed
        }
    }

    /// Returns true when a tick was missed while hidden and the view is
    /// visible again; the countdown restarts from `now`.
    pub fn on_visibility_change(&mut self, now: f64, probe: &impl VisibilityProbe) -> bool {
        if !self.is_running() || !self.missed_tick || !probe.is_visible() {
            return false;
        }
        self.missed_tick = false;
        self.period_start = Some(now);
        true
    }

    /// Advisory only; `None` when stopped
    pub fn countdown(&self, now: f64) -> Option<Countdown> {
        let start = self.period_start?;
        let interval = f64::from(self.interval_ms);
        let elapsed = (now - start).clamp(0.0, interval);
        Some(Countdown { remaining_ms: interval - elapsed, fraction: elapsed / interval })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_is_clamped() {
        assert_eq!(RefreshScheduler::new(500).interval_ms(), MIN_REFRESH_INTERVAL_MS);
        assert_eq!(RefreshScheduler::new(3_000).interval_ms(), 3_000);
    }

    #[test]
    fn panel_visibility_needs_both_flags() {
        let panel = PanelVisibility::new(|| true);
        assert!(panel.is_visible());
        panel.set_active(false);
        assert!(!panel.is_visible());
        assert!(!PanelVisibility::new(|| false).is_visible());
    }

    #[test]
    fn countdown_tracks_wall_clock() {
        let mut s = RefreshScheduler::new(10_000);
        assert!(s.countdown(0.0).is_none());
        s.start(1_000.0);
        let c = s.countdown(3_500.0).unwrap();
        assert_eq!(c.remaining_ms, 7_500.0);
        assert_eq!(c.fraction, 0.25);
        assert_eq!(s.countdown(50_000.0).unwrap().remaining_ms, 0.0);
    }
}
