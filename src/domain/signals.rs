//! Discrete buy/sell markers built from signed signal columns.

use crate::domain::market_data::{Candle, Timestamp};
use serde::Serialize;

/// Signal columns the backend attaches to analysed files
pub const SIGNAL_COLUMNS: [&str; 3] = ["orders", "orders_rsi", "orders_xgb"];

/// Marker coordinate: (timestamp, close)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarkerPoint {
    pub timestamp: Timestamp,
    pub price: f64,
}

/// Buy and sell markers of one signal source
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MarkerSet {
    pub name: String,
    pub buys: Vec<MarkerPoint>,
    pub sells: Vec<MarkerPoint>,
}

impl MarkerSet {
    pub fn is_empty(&self) -> bool {
        self.buys.is_empty() && self.sells.is_empty()
    }
}

pub struct SignalOverlayBuilder;

impl SignalOverlayBuilder {
    /// Positive values become buys, negative values sells; null, zero and
    /// NaN produce nothing. `values` is index-aligned with `candles`.
    pub fn build(name: &str, candles: &[Candle], values: &[Option<f64>]) -> MarkerSet {
        let mut set = MarkerSet { name: name.to_string(), ..MarkerSet::default() };

        for (candle, value) in candles.iter().zip(values) {
            let Some(v) = value else { continue };
            let point = MarkerPoint { timestamp: candle.timestamp, price: candle.close() };
            if *v > 0.0 {
                set.buys.push(point);
            } else if *v < 0.0 {
                set.sells.push(point);
            }
        }
        set
    }

    /// Marker sets for every known signal column that has at least one event
    pub fn build_all(candles: &[Candle]) -> Vec<MarkerSet> {
        SIGNAL_COLUMNS
            .iter()
            .map(|&name| {
                let values: Vec<Option<f64>> = candles.iter().map(|c| c.signal(name)).collect();
                Self::build(name, candles, &values)
            })
            .filter(|set| !set.is_empty())
            .collect()
    }
}
