//! Axis ranges and the dual-panel layout (price on top, volume or
//! oscillator below, one shared time axis).

use super::value_objects::{LowerPanelMode, RenderConfig, ScaleMode};
use crate::domain::market_data::{Candle, Timestamp};
use serde::Serialize;

/// Vertical share of the price panel (65%)
pub const PRICE_DOMAIN: (f64, f64) = (0.35, 1.0);
/// Vertical share of the secondary panel (28%), leaving a 7% gap
pub const SECONDARY_DOMAIN: (f64, f64) = (0.0, 0.28);

const LINEAR_PAD_RATIO: f64 = 0.04;
const ZERO_SPAN_PAD: f64 = 1.0;
const LOG_FLOOR_RATIO: f64 = 0.95;
const LOG_FALLBACK_FLOOR: f64 = 0.01;
const VOLUME_HEADROOM: f64 = 1.15;
pub const OSCILLATOR_RANGE: AxisRange = AxisRange { min: 0.0, max: 100.0 };

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartLayout {
    pub time_range: Option<(Timestamp, Timestamp)>,
    pub scale: ScaleMode,
    pub price_axis: Option<AxisRange>,
    pub lower_panel: LowerPanelMode,
    pub secondary_axis: Option<AxisRange>,
    pub price_domain: (f64, f64),
    pub secondary_domain: (f64, f64),
    /// Placeholder text; set only when no traces are shown
    pub message: Option<String>,
}

/// One pass over the window
#[derive(Debug, Clone, Copy, Default)]
struct WindowStats {
    first: Option<Timestamp>,
    last: Option<Timestamp>,
    low: Option<f64>,
    high: Option<f64>,
    min_positive: Option<f64>,
    max_volume: f64,
}

impl WindowStats {
    fn collect<'a>(candles: impl IntoIterator<Item = &'a Candle>) -> Self {
        let mut stats = Self::default();
        for candle in candles {
            stats.first.get_or_insert(candle.timestamp);
            stats.last = Some(candle.timestamp);

            let low = candle.ohlc.low.value();
            let high = candle.ohlc.high.value();
            stats.low = Some(stats.low.map_or(low, |l| l.min(low)));
            stats.high = Some(stats.high.map_or(high, |h| h.max(high)));

            for value in candle.ohlc.values() {
                if value > 0.0 {
                    stats.min_positive = Some(stats.min_positive.map_or(value, |m| m.min(value)));
                }
            }

            if let Some(volume) = candle.volume {
                stats.max_volume = stats.max_volume.max(volume.value());
            }
        }
        stats
    }
}

/// Price axis range, or `None` for an empty window.
///
/// Linear scale pads by 4% of the span; log scale clamps the floor to 95% of
/// the smallest strictly positive OHLC value so the domain stays positive.
pub fn price_axis_range<'a>(
    candles: impl IntoIterator<Item = &'a Candle>,
    scale: ScaleMode,
) -> Option<AxisRange> {
    price_range_from(&WindowStats::collect(candles), scale)
}

fn price_range_from(stats: &WindowStats, scale: ScaleMode) -> Option<AxisRange> {
    let (low, high) = (stats.low?, stats.high?);
    match scale {
        ScaleMode::Linear => {
            let span = high - low;
            let pad = if span > 0.0 { span * LINEAR_PAD_RATIO } else { ZERO_SPAN_PAD };
            Some(AxisRange { min: low - pad, max: high + pad })
        }
        ScaleMode::Log => {
            let floor = stats.min_positive.map_or(LOG_FALLBACK_FLOOR, |m| m * LOG_FLOOR_RATIO);
            let top = if high > floor { high } else { floor * 10.0 };
            Some(AxisRange { min: floor, max: top })
        }
    }
}

/// Secondary axis: `[0, 1.15 x max volume]` or the fixed oscillator range
pub fn secondary_axis_range<'a>(
    candles: impl IntoIterator<Item = &'a Candle>,
    mode: LowerPanelMode,
) -> AxisRange {
    secondary_range_from(&WindowStats::collect(candles), mode)
}

fn secondary_range_from(stats: &WindowStats, mode: LowerPanelMode) -> AxisRange {
    match mode {
        LowerPanelMode::Oscillator => OSCILLATOR_RANGE,
        LowerPanelMode::Volume if stats.max_volume > 0.0 => {
            AxisRange { min: 0.0, max: stats.max_volume * VOLUME_HEADROOM }
        }
        LowerPanelMode::Volume => AxisRange { min: 0.0, max: 1.0 },
    }
}

impl ChartLayout {
    pub fn compose<'a>(candles: impl IntoIterator<Item = &'a Candle>, config: &RenderConfig) -> Self {
        let stats = WindowStats::collect(candles);
        Self {
            time_range: stats.first.zip(stats.last),
            scale: config.scale,
            price_axis: price_range_from(&stats, config.scale),
            lower_panel: config.lower_panel,
            secondary_axis: Some(secondary_range_from(&stats, config.lower_panel)),
            price_domain: PRICE_DOMAIN,
            secondary_domain: SECONDARY_DOMAIN,
            message: None,
        }
    }

    pub fn placeholder(message: impl Into<String>) -> Self {
        Self {
            time_range: None,
            scale: ScaleMode::Linear,
            price_axis: None,
            lower_panel: LowerPanelMode::Volume,
            secondary_axis: None,
            price_domain: PRICE_DOMAIN,
            secondary_domain: SECONDARY_DOMAIN,
            message: Some(message.into()),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.message.is_some()
    }
}
