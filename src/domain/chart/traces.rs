//! Renderer-neutral description of what is drawn.
//!
//! Trace 0 is always the price trace and trace 1 the lower-panel trace;
//! overlays and marker traces follow.

use crate::domain::market_data::Timestamp;
use serde::Serialize;

pub const PRICE_TRACE: usize = 0;
pub const LOWER_TRACE: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Panel {
    Price,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TraceRole {
    Price,
    Volume,
    Oscillator,
    Overlay,
    BuyMarkers,
    SellMarkers,
}

impl TraceRole {
    /// Marker traces hold sparse coordinates, not one point per candle
    pub fn is_sparse(&self) -> bool {
        matches!(self, TraceRole::BuyMarkers | TraceRole::SellMarkers)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TraceData {
    Candlestick { open: Vec<f64>, high: Vec<f64>, low: Vec<f64>, close: Vec<f64> },
    Bars { y: Vec<f64> },
    Line { y: Vec<Option<f64>> },
    Markers { y: Vec<f64> },
}

impl TraceData {
    fn take_front(&self, k: usize) -> Self {
        fn head<T: Clone>(v: &[T], k: usize) -> Vec<T> {
            v[..k.min(v.len())].to_vec()
        }
        match self {
            TraceData::Candlestick { open, high, low, close } => TraceData::Candlestick {
                open: head(open, k),
                high: head(high, k),
                low: head(low, k),
                close: head(close, k),
            },
            TraceData::Bars { y } => TraceData::Bars { y: head(y, k) },
            TraceData::Line { y } => TraceData::Line { y: head(y, k) },
            TraceData::Markers { y } => TraceData::Markers { y: head(y, k) },
        }
    }

    fn drop_front(&mut self, n: usize) {
        fn drain<T>(v: &mut Vec<T>, n: usize) {
            v.drain(..n.min(v.len()));
        }
        match self {
            TraceData::Candlestick { open, high, low, close } => {
                drain(open, n);
                drain(high, n);
                drain(low, n);
                drain(close, n);
            }
            TraceData::Bars { y } | TraceData::Markers { y } => drain(y, n),
            TraceData::Line { y } => drain(y, n),
        }
    }

    fn append(&mut self, other: &TraceData) -> bool {
        match (self, other) {
            (
                TraceData::Candlestick { open, high, low, close },
                TraceData::Candlestick { open: o, high: h, low: l, close: c },
            ) => {
                open.extend_from_slice(o);
                high.extend_from_slice(h);
                low.extend_from_slice(l);
                close.extend_from_slice(c);
            }
            (TraceData::Bars { y }, TraceData::Bars { y: more }) => y.extend_from_slice(more),
            (TraceData::Line { y }, TraceData::Line { y: more }) => y.extend_from_slice(more),
            (TraceData::Markers { y }, TraceData::Markers { y: more }) => y.extend_from_slice(more),
            _ => return false,
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub name: String,
    pub role: TraceRole,
    pub panel: Panel,
    pub x: Vec<Timestamp>,
    pub data: TraceData,
}

impl Trace {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    fn prefix(&self, k: usize, cutoff: Option<Timestamp>) -> Trace {
        let keep = if self.role.is_sparse() {
            match cutoff {
                Some(ts) => self.x.partition_point(|x| *x <= ts),
                None => 0,
            }
        } else {
            k.min(self.x.len())
        };
        Trace {
            name: self.name.clone(),
            role: self.role,
            panel: self.panel,
            x: self.x[..keep].to_vec(),
            data: self.data.take_front(keep),
        }
    }

    /// Append a patch of the same shape, then evict the oldest points past `max_points`
    pub fn append(&mut self, patch: &TracePatch, max_points: usize) -> bool {
        if !self.data.append(&patch.data) {
            return false;
        }
        self.x.extend_from_slice(&patch.x);
        let overflow = self.x.len().saturating_sub(max_points);
        if overflow > 0 {
            self.x.drain(..overflow);
            self.data.drop_front(overflow);
        }
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TraceSet {
    pub traces: Vec<Trace>,
}

impl TraceSet {
    pub fn new(traces: Vec<Trace>) -> Self {
        Self { traces }
    }

    /// Number of points of the price trace
    pub fn point_count(&self) -> usize {
        self.traces.get(PRICE_TRACE).map_or(0, Trace::len)
    }

    pub fn names(&self) -> Vec<&str> {
        self.traces.iter().map(|t| t.name.as_str()).collect()
    }

    /// First `k` points of every aligned trace; markers are cut at the
    /// timestamp of the last kept price point.
    pub fn prefix(&self, k: usize) -> TraceSet {
        let cutoff = match k {
            0 => None,
            _ => self.traces.get(PRICE_TRACE).and_then(|t| t.x.get(k.min(t.len()).saturating_sub(1)).copied()),
        };
        TraceSet { traces: self.traces.iter().map(|t| t.prefix(k, cutoff)).collect() }
    }
}

/// New points for one trace
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TracePatch {
    pub x: Vec<Timestamp>,
    pub data: TraceData,
}

/// Points appended to existing traces, capped at `max_points` per trace
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceExtension {
    pub indices: Vec<usize>,
    pub patches: Vec<TracePatch>,
    pub max_points: usize,
}

impl TraceExtension {
    pub fn appended_rows(&self) -> usize {
        self.patches.first().map_or(0, |p| p.x.len())
    }
}
