use super::value_objects::{Ohlc, Timestamp, Volume};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

/// Domain entity - Candle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: Timestamp,
    pub ohlc: Ohlc,
    pub volume: Option<Volume>,
    /// Named signed signal columns; a missing key is a null cell.
    #[serde(default)]
    pub signals: BTreeMap<String, f64>,
}

impl Candle {
    pub fn new(timestamp: Timestamp, ohlc: Ohlc, volume: Option<Volume>) -> Self {
        Self { timestamp, ohlc, volume, signals: BTreeMap::new() }
    }

    pub fn with_signal(mut self, name: impl Into<String>, value: f64) -> Self {
        self.signals.insert(name.into(), value);
        self
    }

    pub fn close(&self) -> f64 {
        self.ohlc.close.value()
    }

    pub fn signal(&self, name: &str) -> Option<f64> {
        self.signals.get(name).copied()
    }
}

/// Ordered window of the most recent candles, capped at `max_size`.
///
/// Mirrors what is currently drawn: pushing past the cap evicts the oldest
/// candles first.
#[derive(Debug, Clone)]
pub struct CandleWindow {
    candles: VecDeque<Candle>,
    max_size: usize,
}

impl CandleWindow {
    pub fn new(max_size: usize) -> Self {
        Self { candles: VecDeque::with_capacity(max_size), max_size }
    }

    /// Replace the whole window, keeping only the newest `max_size` candles
    pub fn reset(&mut self, candles: &[Candle], max_size: usize) {
        self.max_size = max_size;
        self.candles.clear();
        let skip = candles.len().saturating_sub(max_size);
        self.candles.extend(candles[skip..].iter().cloned());
    }

    /// Append candles newer than the current last one; returns how many were evicted.
    pub fn extend(&mut self, candles: &[Candle]) -> usize {
        for candle in candles {
            if let Some(last) = self.candles.back()
                && candle.timestamp <= last.timestamp
            {
                continue;
            }
            self.candles.push_back(candle.clone());
        }

        let mut evicted = 0;
        while self.candles.len() > self.max_size {
            self.candles.pop_front();
            evicted += 1;
        }
        evicted
    }

    pub fn clear(&mut self) {
        self.candles.clear();
    }

    pub fn candles(&self) -> &VecDeque<Candle> {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }
}
