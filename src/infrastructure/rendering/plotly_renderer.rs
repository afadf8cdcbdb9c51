//! [`ChartRenderer`] backed by the page's global `Plotly` object.

use super::plotly_format::{layout_json, patch_json, traces_json};
use crate::domain::{
    chart::{ChartLayout, ChartRenderer, TraceExtension, TraceSet},
    errors::{RenderError, RenderResult},
    logging::LogComponent,
};
use crate::log_debug;
use gloo::utils::format::JsValueSerdeExt;
use serde_json::{Value, json};
use wasm_bindgen::prelude::*;

const COMPONENT: LogComponent = LogComponent::Infrastructure("PlotlyRenderer");

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = Plotly, js_name = react, catch)]
    fn plotly_react(div: &str, data: &JsValue, layout: &JsValue, config: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = Plotly, js_name = extendTraces, catch)]
    fn plotly_extend_traces(div: &str, update: &JsValue, indices: &JsValue, max_points: u32) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = Plotly, js_name = relayout, catch)]
    fn plotly_relayout(div: &str, update: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = Plotly, js_name = purge, catch)]
    fn plotly_purge(div: &str) -> Result<JsValue, JsValue>;
}

fn to_js(value: &Value) -> RenderResult<JsValue> {
    JsValue::from_serde(value).map_err(|e| RenderError::new(format!("serialization failed: {e}")))
}

fn js_error(call: &str, err: JsValue) -> RenderError {
    RenderError::new(format!("Plotly.{call} failed: {err:?}"))
}

pub struct PlotlyRenderer {
    element_id: String,
}

impl PlotlyRenderer {
    pub fn new(element_id: impl Into<String>) -> Self {
        Self { element_id: element_id.into() }
    }
}

impl ChartRenderer for PlotlyRenderer {
    fn set_traces(&mut self, traces: &TraceSet, layout: &ChartLayout) -> RenderResult<()> {
        let data = to_js(&traces_json(&traces.traces))?;
        let layout = to_js(&layout_json(layout))?;
        let config = to_js(&json!({ "responsive": true, "displaylogo": false }))?;
        plotly_react(&self.element_id, &data, &layout, &config).map_err(|e| js_error("react", e))?;
        Ok(())
    }

    fn extend_traces(&mut self, extension: &TraceExtension) -> RenderResult<()> {
        let max_points = u32::try_from(extension.max_points).unwrap_or(u32::MAX);
        // price and volume carry different keys, so one call per trace
        for (index, patch) in extension.indices.iter().zip(&extension.patches) {
            let update = to_js(&patch_json(patch))?;
            let indices = to_js(&json!([index]))?;
            plotly_extend_traces(&self.element_id, &update, &indices, max_points)
                .map_err(|e| js_error("extendTraces", e))?;
        }
        log_debug!(COMPONENT, "extended {} traces by {} rows", extension.indices.len(), extension.appended_rows());
        Ok(())
    }

    fn relayout(&mut self, layout: &ChartLayout) -> RenderResult<()> {
        // a purged div has no layout left to patch
        if layout.is_placeholder() {
            return self.set_traces(&TraceSet::default(), layout);
        }
        let update = to_js(&layout_json(layout))?;
        plotly_relayout(&self.element_id, &update).map_err(|e| js_error("relayout", e))?;
        Ok(())
    }

    fn purge(&mut self) -> RenderResult<()> {
        plotly_purge(&self.element_id).map_err(|e| js_error("purge", e))?;
        Ok(())
    }
}
