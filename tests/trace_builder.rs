mod common;

use common::{candle, series};
use dashboard_chart_wasm::application::traces::TraceBuilder;
use dashboard_chart_wasm::domain::{
    chart::{LowerPanelMode, OverlayToggles, RenderConfig, TraceData, TraceRole},
    indicators::IndicatorPeriods,
    market_data::Candle,
};

fn signalled() -> Vec<Candle> {
    let mut candles = series(0, 60);
    candles[10] = candle(10, 110.0).with_signal("orders", 1.0);
    candles[20] = candle(20, 120.0).with_signal("orders", -1.0);
    candles[30] = candle(30, 130.0).with_signal("orders_rsi", 2.0).with_signal("orders_xgb", 0.0);
    candles
}

#[test]
fn default_trace_order() {
    let set = TraceBuilder::default().build(&signalled(), &RenderConfig::default());
    insta::assert_json_snapshot!(set.names(), @r###"
    [
      "price",
      "volume",
      "ma20",
      "ma50",
      "orders buy",
      "orders sell",
      "orders_rsi buy"
    ]
    "###);
}

#[test]
fn oscillator_panel_and_ema() {
    let config = RenderConfig {
        lower_panel: LowerPanelMode::Oscillator,
        overlays: OverlayToggles { ma_fast: false, ma_slow: false, ema: true, signals: false },
        ..RenderConfig::default()
    };
    let set = TraceBuilder::new(IndicatorPeriods { ema: 5, oscillator: 7, ..IndicatorPeriods::default() })
        .build(&signalled(), &config);
    insta::assert_json_snapshot!(set.names(), @r###"
    [
      "price",
      "rsi7",
      "ema5"
    ]
    "###);
    assert_eq!(set.traces[1].role, TraceRole::Oscillator);
}

#[test]
fn every_aligned_trace_has_one_point_per_candle() {
    let candles = signalled();
    let set = TraceBuilder::default().build(&candles, &RenderConfig::default());
    for trace in set.traces.iter().filter(|t| !t.role.is_sparse()) {
        assert_eq!(trace.len(), candles.len(), "{}", trace.name);
    }
}

#[test]
fn markers_sit_on_close() {
    let set = TraceBuilder::default().build(&signalled(), &RenderConfig::default());
    let sells = set.traces.iter().find(|t| t.name == "orders sell").unwrap();
    assert_eq!(sells.data, TraceData::Markers { y: vec![120.0] });
}

#[test]
fn missing_volume_draws_zero_bars() {
    let mut candles = series(0, 3);
    candles[1].volume = None;
    let set = TraceBuilder::default().build(&candles, &RenderConfig::default());
    assert_eq!(set.traces[1].data, TraceData::Bars { y: vec![10.0, 0.0, 12.0] });
}

#[test]
fn extension_skips_lower_panel_in_oscillator_mode() {
    let config = RenderConfig { lower_panel: LowerPanelMode::Oscillator, ..RenderConfig::default() };
    let ext = TraceBuilder::default().extension(&series(5, 7), &config);
    assert_eq!(ext.indices, vec![0]);
    assert_eq!(ext.appended_rows(), 2);
    assert_eq!(ext.max_points, 500);
}

#[test]
fn reveal_prefix_cuts_markers() {
    let set = TraceBuilder::default().build(&signalled(), &RenderConfig::default());
    let head = set.prefix(15);
    assert_eq!(head.point_count(), 15);
    assert!(head.traces.iter().find(|t| t.name == "orders sell").unwrap().is_empty());
    assert_eq!(head.traces.iter().find(|t| t.name == "orders buy").unwrap().len(), 1);
}
