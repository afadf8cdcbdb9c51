use super::dto::{backend_error, decode_candles, decode_source_list};
use crate::domain::{
    errors::{FetchError, FetchResult},
    logging::LogComponent,
    market_data::{Candle, CandleSource, SourceId, TailSize},
};
use crate::{log_debug, log_warn};
use gloo_net::http::{Request, Response};
use serde_json::Value;

const COMPONENT: LogComponent = LogComponent::Infrastructure("DashboardHttpClient");

/// gloo-net client for the dashboard backend
#[derive(Debug, Clone, Default)]
pub struct DashboardHttpClient {
    base_url: String,
}

impl DashboardHttpClient {
    /// Empty `base_url` requests the page's own origin
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self { base_url: base_url.trim_end_matches('/').to_string() }
    }

    pub fn candles_url(&self) -> String {
        format!("{}/api/candles", self.base_url)
    }

    pub fn source_list_url(&self) -> String {
        format!("{}/csv_list", self.base_url)
    }

    async fn read_json(response: Response) -> FetchResult<Value> {
        if !response.ok() {
            let status = FetchError::Status { status: response.status(), status_text: response.status_text() };
            let body = response.json::<Value>().await.ok();
            return Err(body.as_ref().and_then(backend_error).map_or(status, FetchError::Backend));
        }
        response.json::<Value>().await.map_err(|e| FetchError::Decode(e.to_string()))
    }
}

impl CandleSource for DashboardHttpClient {
    async fn fetch_tail(&self, source: &SourceId, tail: TailSize) -> FetchResult<Vec<Candle>> {
        log_debug!(COMPONENT, "fetching {} rows of {}", tail, source);

        let tail = tail.to_string();
        let response = Request::get(&self.candles_url())
            .query([("file", source.value()), ("tail", tail.as_str())])
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let candles = decode_candles(Self::read_json(response).await?)?;
        log_debug!(COMPONENT, "received {} candles for {}", candles.len(), source);
        Ok(candles)
    }

    async fn list_sources(&self) -> FetchResult<Vec<SourceId>> {
        let response = Request::get(&self.source_list_url())
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let names = decode_source_list(Self::read_json(response).await?)?;
        let sources: Vec<SourceId> = names.into_iter().filter_map(|n| SourceId::new(n).ok()).collect();
        if sources.is_empty() {
            log_warn!(COMPONENT, "backend lists no data sources");
        }
        Ok(sources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_drop_trailing_slash() {
        let client = DashboardHttpClient::new("http://127.0.0.1:5000/");
        assert_eq!(client.candles_url(), "http://127.0.0.1:5000/api/candles");
        assert_eq!(client.source_list_url(), "http://127.0.0.1:5000/csv_list");
    }

    #[test]
    fn same_origin_paths() {
        let client = DashboardHttpClient::default();
        assert_eq!(client.candles_url(), "/api/candles");
    }
}
