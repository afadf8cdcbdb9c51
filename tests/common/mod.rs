#![allow(dead_code)]

use dashboard_chart_wasm::application::{clock::ManualClock, config::SessionConfig, session::ChartSession};
use dashboard_chart_wasm::domain::{
    errors::{FetchError, FetchResult},
    market_data::{Candle, CandleSource, Ohlc, Price, SourceId, TailSize, Timestamp, Volume},
};
use dashboard_chart_wasm::infrastructure::rendering::RecordingRenderer;
use std::{cell::RefCell, collections::VecDeque, rc::Rc};

pub const MINUTE: i64 = 60_000;

/// Candle at `i` minutes with close `close` and a one-unit range around it
pub fn candle(i: i64, close: f64) -> Candle {
    Candle::new(
        Timestamp::from(i * MINUTE),
        Ohlc::new(Price::from(close), Price::from(close + 1.0), Price::from(close - 1.0), Price::from(close)),
        Some(Volume::from(10.0 + i as f64)),
    )
}

/// Candles for minutes `from..to`, close rising by one each minute
pub fn series(from: i64, to: i64) -> Vec<Candle> {
    (from..to).map(|i| candle(i, 100.0 + i as f64)).collect()
}

pub fn session(clock: Rc<ManualClock>) -> ChartSession<RecordingRenderer> {
    ChartSession::new(RecordingRenderer::new(), &SessionConfig::default(), clock)
}

/// Candle source answering from a queue of scripted responses
#[derive(Default)]
pub struct ScriptedSource {
    responses: RefCell<VecDeque<FetchResult<Vec<Candle>>>>,
    requests: RefCell<Vec<(SourceId, TailSize)>>,
    sources: Vec<SourceId>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sources(sources: &[&str]) -> Self {
        Self { sources: sources.iter().map(|&s| SourceId::from(s)).collect(), ..Self::default() }
    }

    pub fn push(&self, response: FetchResult<Vec<Candle>>) {
        self.responses.borrow_mut().push_back(response);
    }

    pub fn requests(&self) -> Vec<(SourceId, TailSize)> {
        self.requests.borrow().clone()
    }
}

impl CandleSource for ScriptedSource {
    async fn fetch_tail(&self, source: &SourceId, tail: TailSize) -> FetchResult<Vec<Candle>> {
        self.requests.borrow_mut().push((source.clone(), tail));
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::Transport("no scripted response".to_string())))
    }

    async fn list_sources(&self) -> FetchResult<Vec<SourceId>> {
        Ok(self.sources.clone())
    }
}
