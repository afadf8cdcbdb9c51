//! JavaScript surface: one `ChartView` per mounted chart element.

use crate::application::{
    config::SessionConfig,
    scheduler::RefreshScheduler,
    session::{ChartSession, DrawRequest},
};
use crate::domain::{
    chart::RenderConfig,
    logging::LogComponent,
    market_data::{self, CandleSource, SourceId, TailSize},
};
use crate::infrastructure::{
    browser::ChartRuntime,
    http::DashboardHttpClient,
    rendering::PlotlyRenderer,
    services::{BrowserClock, DocumentVisibility},
};
use crate::log_info;
use gloo::utils::format::JsValueSerdeExt;
use js_sys::Promise;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

const COMPONENT: LogComponent = LogComponent::Presentation("ChartView");

type Runtime = ChartRuntime<PlotlyRenderer, DashboardHttpClient, DocumentVisibility>;

fn js_err(message: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&message.to_string())
}

fn parse_render_config(value: &JsValue, tail_size: usize) -> Result<RenderConfig, JsValue> {
    let config = if value.is_undefined() || value.is_null() {
        RenderConfig::default()
    } else {
        value.into_serde::<RenderConfig>().map_err(|e| js_err(format!("Invalid render config: {e}")))?
    };
    Ok(config.with_tail(TailSize::new(tail_size)))
}

fn parse_source(source: String) -> Result<SourceId, JsValue> {
    SourceId::new(source).map_err(js_err)
}

fn build_request(source: String, tail_size: usize, render_config: &JsValue, animate: bool) -> Result<DrawRequest, JsValue> {
    let source = parse_source(source)?;
    let config = parse_render_config(render_config, tail_size)?;
    Ok(DrawRequest::new(source, config, animate))
}

#[wasm_bindgen]
pub struct ChartView {
    runtime: Rc<Runtime>,
}

#[wasm_bindgen]
impl ChartView {
    /// `config` is an optional session config object
    #[wasm_bindgen(constructor)]
    pub fn new(element_id: String, config: JsValue) -> Result<ChartView, JsValue> {
        let settings = if config.is_undefined() || config.is_null() {
            SessionConfig::default()
        } else {
            config
                .into_serde::<SessionConfig>()
                .map(SessionConfig::validated)
                .map_err(|e| js_err(format!("Invalid session config: {e}")))?
        };

        let clock = Rc::new(BrowserClock);
        let session = ChartSession::new(PlotlyRenderer::new(element_id.clone()), &settings, clock.clone());
        let runtime = ChartRuntime::new(
            session,
            DashboardHttpClient::new(settings.base_url.clone()),
            DocumentVisibility,
            RefreshScheduler::new(settings.refresh_interval_ms),
            clock,
        );

        log_info!(COMPONENT, "mounted on #{}", element_id);
        Ok(ChartView { runtime })
    }

    /// Resolves to a short outcome string; errors end up in the placeholder
    pub fn draw(&self, source: String, tail_size: usize, render_config: JsValue, animate: bool) -> Promise {
        let request = build_request(source, tail_size, &render_config, animate);
        let runtime = Rc::clone(&self.runtime);
        future_to_promise(async move {
            let outcome = runtime.draw(request?).await;
            Ok(JsValue::from_str(&outcome.summary()))
        })
    }

    /// Forget what is drawn, then draw; rejected arguments leave the chart untouched
    pub fn reload(&self, source: String, tail_size: usize, render_config: JsValue, animate: bool) -> Promise {
        let request = build_request(source, tail_size, &render_config, animate);
        let runtime = Rc::clone(&self.runtime);
        future_to_promise(async move {
            let outcome = runtime.reload(request?).await;
            Ok(JsValue::from_str(&outcome.summary()))
        })
    }

    #[wasm_bindgen(js_name = startScheduler)]
    pub fn start_scheduler(&self, source: String, tail_size: usize, render_config: JsValue) -> Result<(), JsValue> {
        let request = build_request(source, tail_size, &render_config, false)?;
        self.runtime.start_scheduler(request);
        Ok(())
    }

    #[wasm_bindgen(js_name = stopScheduler)]
    pub fn stop_scheduler(&self) {
        self.runtime.stop_scheduler();
    }

    #[wasm_bindgen(js_name = isScheduled)]
    pub fn is_scheduled(&self) -> bool {
        self.runtime.is_scheduled()
    }

    /// Whether the hosting panel is the active one
    #[wasm_bindgen(js_name = setActive)]
    pub fn set_active(&self, active: bool) {
        self.runtime.set_active(active);
    }

    /// `{remainingMs, fraction}` or `null` when auto-refresh is off
    pub fn countdown(&self) -> Result<JsValue, JsValue> {
        match self.runtime.countdown() {
            Some(countdown) => JsValue::from_serde(&countdown).map_err(js_err),
            None => Ok(JsValue::NULL),
        }
    }

    #[wasm_bindgen(js_name = syncState)]
    pub fn sync_state(&self) -> Result<JsValue, JsValue> {
        let session = self.runtime.session().borrow();
        JsValue::from_serde(session.sync_state()).map_err(js_err)
    }

    pub fn invalidate(&self) {
        self.runtime.session().borrow_mut().invalidate();
    }

    #[wasm_bindgen(js_name = listSources)]
    pub fn list_sources(&self) -> Promise {
        let runtime = Rc::clone(&self.runtime);
        future_to_promise(async move {
            let sources = runtime.source().list_sources().await.map_err(js_err)?;
            let names: Vec<&str> = sources.iter().map(SourceId::value).collect();
            JsValue::from_serde(&names).map_err(js_err)
        })
    }

    /// First analysed file, else the first listed one; `null` if none
    #[wasm_bindgen(js_name = defaultSource)]
    pub fn default_source(&self) -> Promise {
        let runtime = Rc::clone(&self.runtime);
        future_to_promise(async move {
            let sources = runtime.source().list_sources().await.map_err(js_err)?;
            Ok(market_data::default_source(&sources).map_or(JsValue::NULL, |s| JsValue::from_str(s.value())))
        })
    }

    pub fn dispose(&self) {
        self.runtime.dispose();
        log_info!(COMPONENT, "disposed");
    }
}
