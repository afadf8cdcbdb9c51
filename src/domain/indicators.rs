//! Indicator overlays derived from the close series.
//!
//! All series are index-aligned with the input and hold `None` where there
//! is not enough history yet.

use crate::domain::market_data::Candle;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Streaming simple mean over the last `period` values.
///
/// Keeps a running sum and subtracts the value leaving the window, so each
/// push is O(1).
#[derive(Debug, Clone)]
pub struct RunningMean {
    window: VecDeque<f64>,
    sum: f64,
    period: usize,
}

impl RunningMean {
    pub fn new(period: usize) -> Self {
        Self { window: VecDeque::with_capacity(period + 1), sum: 0.0, period }
    }

    /// Push a value and return the mean once the window is full
    #[inline]
    pub fn push(&mut self, value: f64) -> Option<f64> {
        if self.period == 0 {
            return None;
        }
        self.sum += value;
        self.window.push_back(value);
        if self.window.len() > self.period
            && let Some(old) = self.window.pop_front()
        {
            self.sum -= old;
        }
        (self.window.len() == self.period).then(|| self.sum / self.period as f64)
    }
}

/// Simple moving average; `None` for index < period - 1
pub fn simple_moving_average(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut mean = RunningMean::new(period);
    closes.iter().map(|&c| mean.push(c)).collect()
}

/// Exponential moving average seeded with the SMA of the first `period` closes
pub fn exponential_moving_average(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if period == 0 || closes.len() < period {
        return out;
    }

    let alpha = 2.0 / (period as f64 + 1.0);
    let mut ema = closes[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = Some(ema);
    for i in period..closes.len() {
        ema = alpha * closes[i] + (1.0 - alpha) * ema;
        out[i] = Some(ema);
    }
    out
}

/// Bounded momentum oscillator (Wilder smoothing), always within [0, 100].
///
/// Average gain/loss are seeded from the first `period` deltas; values are
/// produced from index `period + 1` on.
pub fn oscillator(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if period == 0 || closes.len() <= period + 1 {
        return out;
    }

    let p = period as f64;
    let (mut avg_gain, mut avg_loss) = (1..=period).fold((0.0, 0.0), |(g, l), i| {
        let delta = closes[i] - closes[i - 1];
        (g + delta.max(0.0), l + (-delta).max(0.0))
    });
    avg_gain /= p;
    avg_loss /= p;

    for i in (period + 1)..closes.len() {
        let delta = closes[i] - closes[i - 1];
        avg_gain = (avg_gain * (p - 1.0) + delta.max(0.0)) / p;
        avg_loss = (avg_loss * (p - 1.0) + (-delta).max(0.0)) / p;
        out[i] = Some(strength_index(avg_gain, avg_loss));
    }
    out
}

#[inline]
fn strength_index(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    (100.0 - 100.0 / (1.0 + avg_gain / avg_loss)).clamp(0.0, 100.0)
}

/// Periods of the overlays drawn on a rebuild
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorPeriods {
    pub ma_fast: usize,
    pub ma_slow: usize,
    pub ema: usize,
    pub oscillator: usize,
}

impl Default for IndicatorPeriods {
    fn default() -> Self {
        Self { ma_fast: 20, ma_slow: 50, ema: 12, oscillator: 14 }
    }
}

/// Every overlay for one fetched window
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorSet {
    pub ma_fast: Vec<Option<f64>>,
    pub ma_slow: Vec<Option<f64>>,
    pub ema: Vec<Option<f64>>,
    pub oscillator: Vec<Option<f64>>,
}

impl IndicatorSet {
    pub fn compute(candles: &[Candle], periods: IndicatorPeriods) -> Self {
        let closes: Vec<f64> = candles.iter().map(Candle::close).collect();
        Self {
            ma_fast: simple_moving_average(&closes, periods.ma_fast),
            ma_slow: simple_moving_average(&closes, periods.ma_slow),
            ema: exponential_moving_average(&closes, periods.ema),
            oscillator: oscillator(&closes, periods.oscillator),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_mean_waits_for_full_window() {
        let mut mean = RunningMean::new(3);
        assert_eq!(mean.push(1.0), None);
        assert_eq!(mean.push(2.0), None);
        assert_eq!(mean.push(3.0), Some(2.0));
        assert_eq!(mean.push(6.0), Some(11.0 / 3.0));
    }

    #[test]
    fn zero_period_is_undefined() {
        assert_eq!(simple_moving_average(&[1.0, 2.0], 0), vec![None, None]);
        assert_eq!(oscillator(&[1.0, 2.0], 0), vec![None, None]);
        assert_eq!(exponential_moving_average(&[1.0, 2.0], 0), vec![None, None]);
    }

    #[test]
    fn ema_seeded_with_sma() {
        let ema = exponential_moving_average(&[2.0, 4.0, 6.0, 8.0], 2);
        assert_eq!(ema[0], None);
        assert_eq!(ema[1], Some(3.0));
        // alpha = 2/3
        let expected = 2.0 / 3.0 * 6.0 + 1.0 / 3.0 * 3.0;
        assert!((ema[2].unwrap() - expected).abs() < 1e-12);
    }
}
