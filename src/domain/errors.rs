//! Error taxonomy of the chart engine.
//!
//! Every variant is recovered locally by the session: the chart is purged
//! and a placeholder is shown. Nothing here is fatal to the host page.

use crate::domain::market_data::SourceId;
use derive_more::{Display, From};

/// Candle retrieval failed
#[derive(Debug, Clone, PartialEq, Display)]
pub enum FetchError {
    #[display(fmt = "request failed: {}", _0)]
    Transport(String),
    #[display(fmt = "HTTP error: {} {}", status, status_text)]
    Status { status: u16, status_text: String },
    #[display(fmt = "failed to decode response: {}", _0)]
    Decode(String),
    /// The backend answered with an `{"error": ...}` object
    #[display(fmt = "backend error: {}", _0)]
    Backend(String),
}

impl std::error::Error for FetchError {}

/// Downstream rendering failure
#[derive(Debug, Clone, PartialEq, Display)]
#[display(fmt = "{}", _0)]
pub struct RenderError(pub String);

impl RenderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl std::error::Error for RenderError {}

/// Root error of a draw
#[derive(Debug, Clone, PartialEq, Display, From)]
pub enum ChartError {
    #[display(fmt = "Fetch Error: {}", _0)]
    Fetch(FetchError),
    #[from(ignore)]
    #[display(fmt = "No data for {}", source_id)]
    EmptyResult { source_id: SourceId },
    #[display(fmt = "Rendering Error: {}", _0)]
    Render(RenderError),
}

impl std::error::Error for ChartError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChartError::Fetch(e) => Some(e),
            ChartError::Render(e) => Some(e),
            ChartError::EmptyResult { .. } => None,
        }
    }
}

impl ChartError {
    /// Text shown in the chart placeholder
    pub fn placeholder_message(&self) -> String {
        match self {
            ChartError::EmptyResult { .. } => "No data".to_string(),
            other => other.to_string(),
        }
    }
}

pub type FetchResult<T> = Result<T, FetchError>;
pub type RenderResult<T> = Result<T, RenderError>;
