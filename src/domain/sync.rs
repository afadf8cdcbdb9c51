//! Extend-in-place versus full-rebuild state machine.
//!
//! The controller remembers what was last drawn (source, newest timestamp,
//! whether a trace set exists) and decides, for each freshly fetched window,
//! whether only the new tail can be appended to the rendered price/volume
//! traces or the whole trace set has to be rebuilt.

use crate::domain::market_data::{Candle, SourceId, Timestamp};
use derive_more::Display;
use serde::Serialize;

/// Memory of the last committed render
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncState {
    pub last_seen: Option<Timestamp>,
    pub source: Option<SourceId>,
    pub has_rendered_trace: bool,
    /// Points currently held by the price trace
    pub retained_points: usize,
}

/// INITIAL / STABLE view of [`SyncState`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncPhase {
    Initial,
    Stable { source: SourceId, last_seen: Option<Timestamp> },
}

impl SyncState {
    pub fn phase(&self) -> SyncPhase {
        match &self.source {
            Some(source) => SyncPhase::Stable { source: source.clone(), last_seen: self.last_seen },
            None => SyncPhase::Initial,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RebuildReason {
    #[display(fmt = "forced redraw")]
    Forced,
    #[display(fmt = "no rendered trace")]
    NoRenderedTrace,
    #[display(fmt = "source changed")]
    SourceChanged,
    #[display(fmt = "no watermark")]
    NoWatermark,
    /// Newest fetched timestamp is older than the watermark
    #[display(fmt = "history rewritten")]
    HistoryRewritten,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncDecision {
    /// Append `candles[from_index..]`, then advance the watermark to `new_max`
    Extend { from_index: usize, new_max: Timestamp },
    /// Nothing newer than the watermark: no visual update at all
    Unchanged,
    Rebuild(RebuildReason),
}

#[derive(Debug, Clone, Default)]
pub struct SyncController {
    state: SyncState,
}

impl SyncController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SyncState {
        &self.state
    }

    /// Choose between extend, no-op and rebuild for an ordered window.
    ///
    /// `trace_visible` reports whether the surface currently shows the
    /// committed trace set (a placeholder hides it without touching state).
    pub fn decide(
        &self,
        source: &SourceId,
        candles: &[Candle],
        force: bool,
        trace_visible: bool,
    ) -> SyncDecision {
        let Some(newest) = candles.last().map(|c| c.timestamp) else {
            return SyncDecision::Unchanged;
        };

        if force {
            return SyncDecision::Rebuild(RebuildReason::Forced);
        }
        if !self.state.has_rendered_trace || !trace_visible {
            return SyncDecision::Rebuild(RebuildReason::NoRenderedTrace);
        }
        if self.state.source.as_ref() != Some(source) {
            return SyncDecision::Rebuild(RebuildReason::SourceChanged);
        }
        let Some(last_seen) = self.state.last_seen else {
            return SyncDecision::Rebuild(RebuildReason::NoWatermark);
        };

        if newest < last_seen {
            return SyncDecision::Rebuild(RebuildReason::HistoryRewritten);
        }

        let from_index = candles.partition_point(|c| c.timestamp <= last_seen);
        if from_index >= candles.len() {
            SyncDecision::Unchanged
        } else {
            SyncDecision::Extend { from_index, new_max: newest }
        }
    }

    /// Enter STABLE for `source` after a full trace set was drawn
    pub fn commit_rebuild(&mut self, source: &SourceId, candles: &[Candle], retained: usize) {
        self.state = SyncState {
            last_seen: candles.last().map(|c| c.timestamp),
            source: Some(source.clone()),
            has_rendered_trace: retained > 0,
            retained_points: retained,
        };
    }

    /// Advance the watermark after an append
    pub fn commit_extend(&mut self, new_max: Timestamp, retained: usize) {
        self.state.last_seen = Some(new_max);
        self.state.retained_points = retained;
    }

    /// Back to INITIAL; the next draw rebuilds
    pub fn invalidate(&mut self) {
        self.state = SyncState::default();
    }
}
