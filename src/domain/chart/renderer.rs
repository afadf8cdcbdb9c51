use super::{ChartLayout, TraceExtension, TraceSet};
use crate::domain::errors::RenderResult;

/// Narrow drawing capability the session talks to.
///
/// Implementations: Plotly in the browser, an in-memory recorder for
/// headless use and tests.
pub trait ChartRenderer {
    /// Replace every trace and the layout
    fn set_traces(&mut self, traces: &TraceSet, layout: &ChartLayout) -> RenderResult<()>;

    /// Append points to existing traces
    fn extend_traces(&mut self, extension: &TraceExtension) -> RenderResult<()>;

    fn relayout(&mut self, layout: &ChartLayout) -> RenderResult<()>;

    /// Remove all traces
    fn purge(&mut self) -> RenderResult<()>;
}
