//! Turns a candle window into the trace set, or into the patch appended on
//! the extend path.

use crate::domain::{
    chart::{
        LOWER_TRACE, LowerPanelMode, PRICE_TRACE, Panel, RenderConfig, Trace, TraceData,
        TraceExtension, TracePatch, TraceRole, TraceSet,
    },
    indicators::{IndicatorPeriods, IndicatorSet},
    market_data::{Candle, Timestamp},
    signals::{MarkerPoint, SignalOverlayBuilder},
};

#[derive(Debug, Clone, Default)]
pub struct TraceBuilder {
    periods: IndicatorPeriods,
}

impl TraceBuilder {
    pub fn new(periods: IndicatorPeriods) -> Self {
        Self { periods }
    }

    /// Full trace set: price, lower panel, enabled overlays, signal markers
    pub fn build(&self, candles: &[Candle], config: &RenderConfig) -> TraceSet {
        let x: Vec<Timestamp> = candles.iter().map(|c| c.timestamp).collect();
        let indicators = IndicatorSet::compute(candles, self.periods);

        let mut traces = vec![
            Trace {
                name: "price".to_string(),
                role: TraceRole::Price,
                panel: Panel::Price,
                x: x.clone(),
                data: candlestick(candles),
            },
            self.lower_trace(candles, &x, &indicators, config.lower_panel),
        ];

        let overlays = [
            (config.overlays.ma_fast, format!("ma{}", self.periods.ma_fast), &indicators.ma_fast),
            (config.overlays.ma_slow, format!("ma{}", self.periods.ma_slow), &indicators.ma_slow),
            (config.overlays.ema, format!("ema{}", self.periods.ema), &indicators.ema),
        ];
        for (enabled, name, values) in overlays {
            if enabled {
                traces.push(Trace {
                    name,
                    role: TraceRole::Overlay,
                    panel: Panel::Price,
                    x: x.clone(),
                    data: TraceData::Line { y: values.clone() },
                });
            }
        }

        if config.overlays.signals {
            for set in SignalOverlayBuilder::build_all(candles) {
                for (side, role, points) in [
                    ("buy", TraceRole::BuyMarkers, &set.buys),
                    ("sell", TraceRole::SellMarkers, &set.sells),
                ] {
                    if !points.is_empty() {
                        traces.push(marker_trace(format!("{} {}", set.name, side), role, points));
                    }
                }
            }
        }

        TraceSet::new(traces)
    }

    /// Raw price (and volume) points for rows newer than the watermark.
    ///
    /// Overlays are left alone: their smoothing state spans the whole window.
    pub fn extension(&self, new_rows: &[Candle], config: &RenderConfig) -> TraceExtension {
        let x: Vec<Timestamp> = new_rows.iter().map(|c| c.timestamp).collect();
        let mut indices = vec![PRICE_TRACE];
        let mut patches = vec![TracePatch { x: x.clone(), data: candlestick(new_rows) }];

        if config.lower_panel == LowerPanelMode::Volume {
            indices.push(LOWER_TRACE);
            patches.push(TracePatch { x, data: volume_bars(new_rows) });
        }

        TraceExtension { indices, patches, max_points: config.tail_size.value() }
    }

    fn lower_trace(
        &self,
        candles: &[Candle],
        x: &[Timestamp],
        indicators: &IndicatorSet,
        mode: LowerPanelMode,
    ) -> Trace {
        let (name, role, data) = match mode {
            LowerPanelMode::Volume => ("volume".to_string(), TraceRole::Volume, volume_bars(candles)),
            LowerPanelMode::Oscillator => (
                format!("rsi{}", self.periods.oscillator),
                TraceRole::Oscillator,
                TraceData::Line { y: indicators.oscillator.clone() },
            ),
        };
        Trace { name, role, panel: Panel::Secondary, x: x.to_vec(), data }
    }
}

fn candlestick(candles: &[Candle]) -> TraceData {
    TraceData::Candlestick {
        open: candles.iter().map(|c| c.ohlc.open.value()).collect(),
        high: candles.iter().map(|c| c.ohlc.high.value()).collect(),
        low: candles.iter().map(|c| c.ohlc.low.value()).collect(),
        close: candles.iter().map(|c| c.ohlc.close.value()).collect(),
    }
}

fn volume_bars(candles: &[Candle]) -> TraceData {
    TraceData::Bars { y: candles.iter().map(|c| c.volume.map_or(0.0, |v| v.value())).collect() }
}

fn marker_trace(name: String, role: TraceRole, points: &[MarkerPoint]) -> Trace {
    Trace {
        name,
        role,
        panel: Panel::Price,
        x: points.iter().map(|p| p.timestamp).collect(),
        data: TraceData::Markers { y: points.iter().map(|p| p.price).collect() },
    }
}
