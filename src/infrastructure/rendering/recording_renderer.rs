//! In-memory [`ChartRenderer`] that keeps the drawn trace set and a call log.

use crate::domain::{
    chart::{ChartLayout, ChartRenderer, TraceExtension, TraceSet},
    errors::{RenderError, RenderResult},
};

#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    SetTraces { names: Vec<String>, points: usize },
    ExtendTraces { indices: Vec<usize>, rows: usize },
    Relayout { placeholder: bool },
    Purge,
}

#[derive(Debug, Default)]
pub struct RecordingRenderer {
    traces: TraceSet,
    layout: Option<ChartLayout>,
    calls: Vec<RenderCall>,
    fail_with: Option<String>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every subsequent call fails until [`RecordingRenderer::recover`]
    pub fn fail_with(&mut self, message: impl Into<String>) {
        self.fail_with = Some(message.into());
    }

    pub fn recover(&mut self) {
        self.fail_with = None;
    }

    pub fn traces(&self) -> &TraceSet {
        &self.traces
    }

    pub fn layout(&self) -> Option<&ChartLayout> {
        self.layout.as_ref()
    }

    pub fn calls(&self) -> &[RenderCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Points of the price trace as currently drawn
    pub fn visible_points(&self) -> usize {
        self.traces.point_count()
    }

    fn check(&self) -> RenderResult<()> {
        match &self.fail_with {
            Some(message) => Err(RenderError::new(message.clone())),
            None => Ok(()),
        }
    }
}

impl ChartRenderer for RecordingRenderer {
    fn set_traces(&mut self, traces: &TraceSet, layout: &ChartLayout) -> RenderResult<()> {
        self.check()?;
        self.calls.push(RenderCall::SetTraces {
            names: traces.names().into_iter().map(str::to_string).collect(),
            points: traces.point_count(),
        });
        self.traces = traces.clone();
        self.layout = Some(layout.clone());
        Ok(())
    }

    fn extend_traces(&mut self, extension: &TraceExtension) -> RenderResult<()> {
        self.check()?;
        for (&index, patch) in extension.indices.iter().zip(&extension.patches) {
            let trace = self
                .traces
                .traces
                .get_mut(index)
                .ok_or_else(|| RenderError::new(format!("no trace at index {index}")))?;
            if !trace.append(patch, extension.max_points) {
                return Err(RenderError::new(format!("patch shape does not match trace {index}")));
            }
        }
        self.calls.push(RenderCall::ExtendTraces {
            indices: extension.indices.clone(),
            rows: extension.appended_rows(),
        });
        Ok(())
    }

    fn relayout(&mut self, layout: &ChartLayout) -> RenderResult<()> {
        self.check()?;
        self.calls.push(RenderCall::Relayout { placeholder: layout.is_placeholder() });
        self.layout = Some(layout.clone());
        Ok(())
    }

    fn purge(&mut self) -> RenderResult<()> {
        self.check()?;
        self.calls.push(RenderCall::Purge);
        self.traces = TraceSet::default();
        self.layout = None;
        Ok(())
    }
}
