//! Plotly.js figure JSON for traces, patches and layouts.

use crate::domain::chart::{
    AxisRange, ChartLayout, Panel, ScaleMode, Trace, TraceData, TracePatch, TraceRole,
};
use crate::domain::market_data::Timestamp;
use serde_json::{Value, json};

const UP_COLOR: &str = "#16a34a";
const DOWN_COLOR: &str = "#dc2626";
const VOLUME_COLOR: &str = "rgba(100, 116, 139, 0.5)";
const OSCILLATOR_COLOR: &str = "#7c3aed";
const OVERLAY_COLORS: [&str; 4] = ["#f59e0b", "#0ea5e9", "#ec4899", "#14b8a6"];

fn y_axis(panel: Panel) -> &'static str {
    match panel {
        Panel::Price => "y",
        Panel::Secondary => "y2",
    }
}

fn x_values(x: &[Timestamp]) -> Vec<i64> {
    x.iter().map(|t| t.value()).collect()
}

/// One Plotly trace object; `overlay_slot` picks the line color
pub fn trace_json(trace: &Trace, overlay_slot: usize) -> Value {
    let x = x_values(&trace.x);
    let mut value = match (&trace.data, trace.role) {
        (TraceData::Candlestick { open, high, low, close }, _) => json!({
            "type": "candlestick",
            "x": x, "open": open, "high": high, "low": low, "close": close,
            "increasing": { "line": { "color": UP_COLOR } },
            "decreasing": { "line": { "color": DOWN_COLOR } },
        }),
        (TraceData::Bars { y }, _) => json!({
            "type": "bar",
            "x": x, "y": y,
            "marker": { "color": VOLUME_COLOR },
        }),
        (TraceData::Line { y }, TraceRole::Oscillator) => json!({
            "type": "scatter", "mode": "lines",
            "x": x, "y": y,
            "line": { "color": OSCILLATOR_COLOR, "width": 1.5 },
        }),
        (TraceData::Line { y }, _) => json!({
            "type": "scatter", "mode": "lines",
            "x": x, "y": y,
            "line": { "color": OVERLAY_COLORS[overlay_slot % OVERLAY_COLORS.len()], "width": 1.2 },
        }),
        (TraceData::Markers { y }, role) => {
            let (symbol, color) = match role {
                TraceRole::SellMarkers => ("triangle-down", DOWN_COLOR),
                _ => ("triangle-up", UP_COLOR),
            };
            json!({
                "type": "scatter", "mode": "markers",
                "x": x, "y": y,
                "marker": { "symbol": symbol, "color": color, "size": 10 },
            })
        }
    };

    if let Value::Object(map) = &mut value {
        map.insert("name".into(), json!(trace.name));
        map.insert("xaxis".into(), json!("x"));
        map.insert("yaxis".into(), json!(y_axis(trace.panel)));
    }
    value
}

pub fn traces_json(traces: &[Trace]) -> Value {
    let mut overlay_slot = 0;
    Value::Array(
        traces
            .iter()
            .map(|trace| {
                let value = trace_json(trace, overlay_slot);
                if trace.role == TraceRole::Overlay {
                    overlay_slot += 1;
                }
                value
            })
            .collect(),
    )
}

/// `extendTraces` update for a single trace: every key wraps one array
pub fn patch_json(patch: &TracePatch) -> Value {
    let x = x_values(&patch.x);
    match &patch.data {
        TraceData::Candlestick { open, high, low, close } => json!({
            "x": [x], "open": [open], "high": [high], "low": [low], "close": [close],
        }),
        TraceData::Bars { y } | TraceData::Markers { y } => json!({ "x": [x], "y": [y] }),
        TraceData::Line { y } => json!({ "x": [x], "y": [y] }),
    }
}

/// Plotly expects log axis ranges as exponents
fn axis_range(range: AxisRange, scale: ScaleMode) -> Value {
    match scale {
        ScaleMode::Linear => json!([range.min, range.max]),
        ScaleMode::Log => json!([range.min.log10(), range.max.log10()]),
    }
}

pub fn layout_json(layout: &ChartLayout) -> Value {
    if let Some(message) = &layout.message {
        return json!({
            "xaxis": { "visible": false },
            "yaxis": { "visible": false },
            "yaxis2": { "visible": false },
            "annotations": [{
                "text": message,
                "showarrow": false,
                "xref": "paper", "yref": "paper",
                "x": 0.5, "y": 0.5,
                "font": { "size": 16 },
            }],
        });
    }

    let mut xaxis = json!({ "type": "date", "rangeslider": { "visible": false } });
    if let Some((first, last)) = layout.time_range {
        xaxis["range"] = json!([first.value(), last.value()]);
    }

    let mut yaxis = json!({
        "domain": [layout.price_domain.0, layout.price_domain.1],
        "type": layout.scale.as_ref(),
    });
    if let Some(range) = layout.price_axis {
        yaxis["range"] = axis_range(range, layout.scale);
    }

    let mut yaxis2 = json!({
        "domain": [layout.secondary_domain.0, layout.secondary_domain.1],
        "title": { "text": layout.lower_panel.as_ref() },
    });
    if let Some(range) = layout.secondary_axis {
        yaxis2["range"] = axis_range(range, ScaleMode::Linear);
    }

    json!({
        "xaxis": xaxis,
        "yaxis": yaxis,
        "yaxis2": yaxis2,
        "showlegend": true,
        "legend": { "orientation": "h" },
        "margin": { "l": 50, "r": 20, "t": 20, "b": 30 },
        "annotations": [],
    })
}
