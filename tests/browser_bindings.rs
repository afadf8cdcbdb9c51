#![cfg(target_arch = "wasm32")]

use dashboard_chart_wasm::application::scheduler::VisibilityProbe;
use dashboard_chart_wasm::infrastructure::{
    rendering::plotly_format::layout_json,
    services::{BrowserClock, DocumentVisibility},
};
use dashboard_chart_wasm::{application::clock::Clock, domain::chart::ChartLayout};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn test_page_is_visible() {
    assert!(DocumentVisibility.is_visible());
}

#[wasm_bindgen_test]
fn browser_clock_tracks_date_now() {
    let now = BrowserClock.now_ms();
    assert!((now - js_sys::Date::now()).abs() < 1_000.0);
}

#[wasm_bindgen_test]
fn placeholder_layout_round_trips_to_js() {
    use gloo::utils::format::JsValueSerdeExt;
    let layout = layout_json(&ChartLayout::placeholder("No data"));
    let js = wasm_bindgen::JsValue::from_serde(&layout).unwrap();
    assert!(js.is_object());
}

#[wasm_bindgen_test]
async fn reload_rejects_an_empty_source_before_touching_state() {
    use dashboard_chart_wasm::ChartView;
    use wasm_bindgen::JsValue;
    use wasm_bindgen_futures::JsFuture;

    let view = ChartView::new("chart".to_string(), JsValue::UNDEFINED).unwrap();
    let snapshot = |view: &ChartView| js_sys::JSON::stringify(&view.sync_state().unwrap()).unwrap().as_string();
    let before = snapshot(&view);
    let result = JsFuture::from(view.reload(String::new(), 100, JsValue::UNDEFINED, false)).await;

    assert!(result.is_err());
    assert_eq!(snapshot(&view), before);
}
