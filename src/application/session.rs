//! One mounted chart view.
//!
//! A draw is split in two halves so that no `RefCell` borrow is held while
//! the fetch is in flight: [`ChartSession::issue`] hands out a generation
//! ticket, the caller awaits the candle source, then
//! [`ChartSession::complete`] applies the result unless a newer completion
//! has already been applied.

use super::{
    clock::Clock,
    config::SessionConfig,
    reveal::{REVEAL_INITIAL_POINTS, RevealAnimator, RevealStep},
    traces::TraceBuilder,
};
use crate::domain::{
    chart::{ChartLayout, ChartRenderer, RenderConfig, TraceSet},
    errors::{ChartError, FetchResult, RenderError},
    logging::LogComponent,
    market_data::{Candle, CandleSource, CandleWindow, SourceId, services::DataValidationService},
    sync::{SyncController, SyncDecision, SyncState},
};
use crate::{log_debug, log_error, log_info, log_warn};
use std::{cell::RefCell, rc::Rc};

const COMPONENT: LogComponent = LogComponent::Application("ChartSession");

#[derive(Debug, Clone, PartialEq)]
pub struct DrawRequest {
    pub source: SourceId,
    pub config: RenderConfig,
    pub animate: bool,
    pub force_full: bool,
}

impl DrawRequest {
    pub fn new(source: SourceId, config: RenderConfig, animate: bool) -> Self {
        Self { source, config, animate, force_full: false }
    }

    /// Scheduler refresh: no animation, extend when possible
    pub fn passive(source: SourceId, config: RenderConfig) -> Self {
        Self::new(source, config, false)
    }

    /// An animated draw always replaces the trace set
    pub fn forces_rebuild(&self) -> bool {
        self.force_full || self.animate
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    pub generation: u64,
    pub request: DrawRequest,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOutcome {
    Rebuilt { points: usize, animated: bool },
    Extended { appended: usize, retained: usize },
    Unchanged,
    Placeholder(ChartError),
    /// Superseded by a newer completion; nothing was touched
    Stale,
}

impl DrawOutcome {
    /// Short status string handed back to JavaScript
    pub fn summary(&self) -> String {
        match self {
            DrawOutcome::Rebuilt { points, animated: true } => format!("rebuilt {points} (animated)"),
            DrawOutcome::Rebuilt { points, .. } => format!("rebuilt {points}"),
            DrawOutcome::Extended { appended, retained } => format!("extended +{appended} ({retained})"),
            DrawOutcome::Unchanged => "unchanged".to_string(),
            DrawOutcome::Placeholder(err) => format!("placeholder: {}", err.placeholder_message()),
            DrawOutcome::Stale => "stale".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// No reveal in progress
    Idle,
    Running { shown: usize, total: usize },
    Finished { total: usize },
    /// The renderer failed mid-reveal; a placeholder is shown instead
    Aborted,
}

impl FrameStatus {
    pub fn wants_next_frame(&self) -> bool {
        matches!(self, FrameStatus::Running { .. })
    }
}

/// What the drawing surface currently shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Surface {
    Empty,
    Placeholder,
    Traces,
}

struct ActiveReveal {
    animator: RevealAnimator,
    traces: TraceSet,
    layout: ChartLayout,
}

pub struct ChartSession<R: ChartRenderer> {
    renderer: R,
    controller: SyncController,
    builder: TraceBuilder,
    validation: DataValidationService,
    window: CandleWindow,
    /// Configuration the current trace set was built with
    config: Option<RenderConfig>,
    surface: Surface,
    issued: u64,
    applied: u64,
    disposed: bool,
    reveal: Option<ActiveReveal>,
    reveal_duration_ms: f64,
    clock: Rc<dyn Clock>,
}

impl<R: ChartRenderer> ChartSession<R> {
    pub fn new(renderer: R, settings: &SessionConfig, clock: Rc<dyn Clock>) -> Self {
        Self {
            renderer,
            controller: SyncController::new(),
            builder: TraceBuilder::new(settings.periods()),
            validation: DataValidationService::new(),
            window: CandleWindow::new(settings.default_tail.value()),
            config: None,
            surface: Surface::Empty,
            issued: 0,
            applied: 0,
            disposed: false,
            reveal: None,
            reveal_duration_ms: f64::from(settings.reveal_duration_ms),
            clock,
        }
    }

    pub fn sync_state(&self) -> &SyncState {
        self.controller.state()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn is_revealing(&self) -> bool {
        self.reveal.is_some()
    }

    /// Start a draw; the returned ticket must be passed back to `complete`
    pub fn issue(&mut self, request: DrawRequest) -> FetchTicket {
        self.issued += 1;
        log_debug!(COMPONENT, "issue #{} for {}", self.issued, request.source);
        FetchTicket { generation: self.issued, request }
    }

    /// Apply a fetch result, or drop it if a newer one was already applied
    pub fn complete(&mut self, ticket: FetchTicket, result: FetchResult<Vec<Candle>>) -> DrawOutcome {
        if self.disposed || ticket.generation <= self.applied {
            log_debug!(
                COMPONENT,
                "discarding stale completion #{} (applied #{})",
                ticket.generation,
                self.applied
            );
            return DrawOutcome::Stale;
        }
        self.applied = ticket.generation;
        self.finish_reveal();

        let request = ticket.request;
        let rows = match result {
            Ok(rows) => rows,
            Err(err) => {
                log_warn!(COMPONENT, "fetch for {} failed: {}", request.source, err);
                return self.show_placeholder(ChartError::Fetch(err));
            }
        };

        let (rows, dropped) = self.validation.normalize_sequence(rows);
        if dropped > 0 {
            log_warn!(COMPONENT, "dropped {} invalid or out-of-order rows", dropped);
        }
        let candles = self.validation.take_tail(rows, request.config.tail_size.value());
        if candles.is_empty() {
            return self.show_placeholder(ChartError::EmptyResult { source_id: request.source });
        }

        if self.config.is_some_and(|current| current != request.config) {
            log_info!(COMPONENT, "render configuration changed, invalidating");
            self.invalidate();
        }

        let trace_visible = self.surface == Surface::Traces;
        match self.controller.decide(&request.source, &candles, request.forces_rebuild(), trace_visible) {
            SyncDecision::Unchanged => DrawOutcome::Unchanged,
            SyncDecision::Extend { from_index, new_max } => {
                match self.extend(&candles[from_index..], &request.config) {
                    Ok(appended) => {
                        self.controller.commit_extend(new_max, self.window.len());
                        DrawOutcome::Extended { appended, retained: self.window.len() }
                    }
                    Err(err) => self.show_placeholder(ChartError::Render(err)),
                }
            }
            SyncDecision::Rebuild(reason) => {
                log_info!(COMPONENT, "rebuilding {} ({})", request.source, reason);
                match self.rebuild(&candles, &request) {
                    Ok(outcome) => {
                        self.controller.commit_rebuild(&request.source, &candles, self.window.len());
                        self.config = Some(request.config);
                        outcome
                    }
                    Err(err) => self.show_placeholder(ChartError::Render(err)),
                }
            }
        }
    }

    /// Advance a running reveal to the frame at `now`
    pub fn animation_frame(&mut self, now: f64) -> FrameStatus {
        let Some(active) = self.reveal.as_mut() else {
            return FrameStatus::Idle;
        };

        let total = active.animator.total();
        let (status, rendered) = match active.animator.step(now) {
            RevealStep::Show(k) => (
                FrameStatus::Running { shown: k, total },
                self.renderer.set_traces(&active.traces.prefix(k), &active.layout),
            ),
            RevealStep::Finish(_) => (
                FrameStatus::Finished { total },
                self.renderer.set_traces(&active.traces, &active.layout),
            ),
        };

        match rendered {
            Err(err) => {
                log_error!(COMPONENT, "reveal frame failed: {}", err);
                self.show_placeholder(ChartError::Render(err));
                FrameStatus::Aborted
            }
            Ok(()) => {
                if let FrameStatus::Finished { .. } = status {
                    self.reveal = None;
                }
                status
            }
        }
    }

    /// Forget the rendered state; the next draw rebuilds
    pub fn invalidate(&mut self) {
        self.controller.invalidate();
        self.config = None;
    }

    /// Tear down: purge the surface and drop all state. Late completions are stale.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.reveal = None;
        if let Err(err) = self.renderer.purge() {
            log_warn!(COMPONENT, "purge on dispose failed: {}", err);
        }
        self.invalidate();
        self.window.clear();
        self.surface = Surface::Empty;
        self.disposed = true;
    }

    fn extend(&mut self, new_rows: &[Candle], config: &RenderConfig) -> Result<usize, RenderError> {
        let extension = self.builder.extension(new_rows, config);
        self.renderer.extend_traces(&extension)?;
        let evicted = self.window.extend(new_rows);

        let layout = ChartLayout::compose(self.window.candles(), config);
        self.renderer.relayout(&layout)?;
        log_debug!(
            COMPONENT,
            "appended {} rows, evicted {}, {} retained",
            new_rows.len(),
            evicted,
            self.window.len()
        );
        Ok(extension.appended_rows())
    }

    fn rebuild(&mut self, candles: &[Candle], request: &DrawRequest) -> Result<DrawOutcome, RenderError> {
        let traces = self.builder.build(candles, &request.config);
        let layout = ChartLayout::compose(candles, &request.config);
        let points = traces.point_count();
        let animated = request.animate && points > REVEAL_INITIAL_POINTS;

        if animated {
            let (animator, first) = RevealAnimator::start(points, self.clock.now_ms(), self.reveal_duration_ms);
            self.renderer.set_traces(&traces.prefix(first), &layout)?;
            self.reveal = Some(ActiveReveal { animator, traces, layout });
        } else {
            self.renderer.set_traces(&traces, &layout)?;
        }

        self.window.reset(candles, request.config.tail_size.value());
        self.surface = Surface::Traces;
        Ok(DrawOutcome::Rebuilt { points, animated })
    }

    /// Render the complete series of an interrupted reveal
    fn finish_reveal(&mut self) {
        if let Some(active) = self.reveal.take()
            && let Err(err) = self.renderer.set_traces(&active.traces, &active.layout)
        {
            log_warn!(COMPONENT, "could not finish reveal: {}", err);
        }
    }

    /// Purge the chart and show a message; sync state is left as it was
    fn show_placeholder(&mut self, error: ChartError) -> DrawOutcome {
        self.reveal = None;
        if let Err(err) = self.renderer.purge() {
            log_error!(COMPONENT, "purge failed: {}", err);
        }
        if let Err(err) = self.renderer.relayout(&ChartLayout::placeholder(error.placeholder_message())) {
            log_error!(COMPONENT, "placeholder layout failed: {}", err);
        }
        self.surface = Surface::Placeholder;
        DrawOutcome::Placeholder(error)
    }
}

/// Issue, fetch without holding a borrow, complete
pub async fn draw<R, S>(session: &Rc<RefCell<ChartSession<R>>>, source: &S, request: DrawRequest) -> DrawOutcome
where
    R: ChartRenderer,
    S: CandleSource,
{
    let ticket = session.borrow_mut().issue(request);
    let result = source.fetch_tail(&ticket.request.source, ticket.request.config.tail_size).await;
    session.borrow_mut().complete(ticket, result)
}
