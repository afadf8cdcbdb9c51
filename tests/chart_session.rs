mod common;

use common::{MINUTE, ScriptedSource, series};
use dashboard_chart_wasm::application::{
    clock::ManualClock,
    session::{ChartSession, DrawOutcome, DrawRequest, FrameStatus, draw},
};
use dashboard_chart_wasm::domain::{
    chart::{LowerPanelMode, RenderConfig},
    errors::{ChartError, FetchError, RenderError},
    market_data::{SourceId, TailSize, Timestamp},
    sync::SyncPhase,
};
use dashboard_chart_wasm::infrastructure::rendering::{RecordingRenderer, RenderCall};
use futures::executor::block_on;
use std::{cell::RefCell, rc::Rc};

struct Harness {
    clock: Rc<ManualClock>,
    session: Rc<RefCell<ChartSession<RecordingRenderer>>>,
    source: ScriptedSource,
}

impl Harness {
    fn new() -> Self {
        let clock = Rc::new(ManualClock::new(0.0));
        let session = Rc::new(RefCell::new(common::session(clock.clone())));
        Self { clock, session, source: ScriptedSource::new() }
    }

    fn draw(&self, request: DrawRequest) -> DrawOutcome {
        block_on(draw(&self.session, &self.source, request))
    }

    fn visible_points(&self) -> usize {
        self.session.borrow().renderer().visible_points()
    }
}

fn src() -> SourceId {
    SourceId::from("btc_anal.csv")
}

fn passive(config: RenderConfig) -> DrawRequest {
    DrawRequest::passive(src(), config)
}

#[test]
fn second_fetch_extends_and_caps_at_tail() {
    let h = Harness::new();
    let config = RenderConfig::default().with_tail(TailSize::new(60));
    h.source.push(Ok(series(0, 50)));
    h.source.push(Ok(series(5, 65)));

    assert_eq!(h.draw(passive(config)), DrawOutcome::Rebuilt { points: 50, animated: false });
    assert_eq!(h.draw(passive(config)), DrawOutcome::Extended { appended: 15, retained: 60 });

    assert_eq!(h.visible_points(), 60);
    let session = h.session.borrow();
    assert_eq!(session.sync_state().last_seen, Some(Timestamp::from(64 * MINUTE)));
    assert_eq!(session.sync_state().retained_points, 60);
    assert!(matches!(
        session.renderer().calls().last(),
        Some(RenderCall::Relayout { placeholder: false })
    ));
    assert_eq!(h.source.requests()[1], (src(), TailSize::new(60)));
}

#[test]
fn extend_appends_only_new_rows() {
    let h = Harness::new();
    let config = RenderConfig::default();
    h.source.push(Ok(series(1, 3)));
    h.source.push(Ok(series(1, 5)));

    h.draw(passive(config));
    h.session.borrow_mut().renderer_mut().clear_calls();
    assert_eq!(h.draw(passive(config)), DrawOutcome::Extended { appended: 2, retained: 4 });

    let session = h.session.borrow();
    assert_eq!(
        session.renderer().calls()[0],
        RenderCall::ExtendTraces { indices: vec![0, 1], rows: 2 }
    );
    let price = &session.renderer().traces().traces[0];
    assert_eq!(price.x.last(), Some(&Timestamp::from(4 * MINUTE)));
}

#[test]
fn same_watermark_is_unchanged() {
    let h = Harness::new();
    let config = RenderConfig::default();
    h.source.push(Ok(series(0, 10)));
    h.source.push(Ok(series(0, 10)));

    h.draw(passive(config));
    h.session.borrow_mut().renderer_mut().clear_calls();
    assert_eq!(h.draw(passive(config)), DrawOutcome::Unchanged);
    assert!(h.session.borrow().renderer().calls().is_empty());
}

#[test]
fn empty_result_shows_placeholder_and_keeps_state() {
    let h = Harness::new();
    let config = RenderConfig::default();
    h.source.push(Ok(series(0, 50)));
    h.source.push(Ok(Vec::new()));
    h.source.push(Ok(series(0, 51)));

    h.draw(passive(config));
    let before = h.session.borrow().sync_state().clone();

    let outcome = h.draw(passive(config));
    assert_eq!(outcome, DrawOutcome::Placeholder(ChartError::EmptyResult { source_id: src() }));
    assert_eq!(h.session.borrow().sync_state(), &before);
    assert_eq!(h.visible_points(), 0);
    {
        let session = h.session.borrow();
        let calls = session.renderer().calls();
        assert_eq!(calls[calls.len() - 2..], [RenderCall::Purge, RenderCall::Relayout { placeholder: true }]);
        assert_eq!(session.renderer().layout().and_then(|l| l.message.clone()), Some("No data".to_string()));
    }

    // traces are gone, so the next draw rebuilds even though state is STABLE
    assert_eq!(h.draw(passive(config)), DrawOutcome::Rebuilt { points: 51, animated: false });
}

#[test]
fn fetch_error_shows_message() {
    let h = Harness::new();
    h.source.push(Err(FetchError::Status { status: 500, status_text: "INTERNAL SERVER ERROR".into() }));

    let err = match h.draw(passive(RenderConfig::default())) {
        DrawOutcome::Placeholder(err) => err,
        other => panic!("expected placeholder, got {other:?}"),
    };
    assert_eq!(err.placeholder_message(), "Fetch Error: HTTP error: 500 INTERNAL SERVER ERROR");
    assert_eq!(h.session.borrow().sync_state().phase(), SyncPhase::Initial);
}

#[test]
fn stale_completion_changes_nothing() {
    let clock = Rc::new(ManualClock::new(0.0));
    let mut session = common::session(clock);
    let request = passive(RenderConfig::default());

    let older = session.issue(request.clone());
    let newer = session.issue(request);
    assert_eq!(session.complete(newer, Ok(series(0, 50))), DrawOutcome::Rebuilt { points: 50, animated: false });

    let state = session.sync_state().clone();
    let calls = session.renderer().calls().len();
    assert_eq!(session.complete(older, Ok(series(0, 80))), DrawOutcome::Stale);
    assert_eq!(session.sync_state(), &state);
    assert_eq!(session.renderer().calls().len(), calls);
}

#[test]
fn source_change_rebuilds() {
    let h = Harness::new();
    let config = RenderConfig::default();
    h.source.push(Ok(series(0, 50)));
    h.source.push(Ok(series(0, 51)));

    h.draw(passive(config));
    let other = DrawRequest::passive(SourceId::from("eth_anal.csv"), config);
    assert_eq!(h.draw(other), DrawOutcome::Rebuilt { points: 51, animated: false });
    assert_eq!(h.session.borrow().sync_state().source, Some(SourceId::from("eth_anal.csv")));
}

#[test]
fn config_change_rebuilds_with_new_panel() {
    let h = Harness::new();
    let volume = RenderConfig::default();
    let oscillator = RenderConfig { lower_panel: LowerPanelMode::Oscillator, ..volume };
    h.source.push(Ok(series(0, 50)));
    h.source.push(Ok(series(0, 55)));

    h.draw(passive(volume));
    assert_eq!(h.draw(passive(oscillator)), DrawOutcome::Rebuilt { points: 55, animated: false });

    let session = h.session.borrow();
    assert_eq!(session.renderer().traces().traces[1].name, "rsi14");
}

#[test]
fn animated_draw_reveals_progressively() {
    let h = Harness::new();
    h.source.push(Ok(series(0, 100)));

    let outcome = h.draw(DrawRequest::new(src(), RenderConfig::default(), true));
    assert_eq!(outcome, DrawOutcome::Rebuilt { points: 100, animated: true });
    assert_eq!(h.visible_points(), 2);

    h.clock.set(550.0);
    let status = h.session.borrow_mut().animation_frame(550.0);
    assert_eq!(status, FrameStatus::Running { shown: 13, total: 100 });
    assert_eq!(h.visible_points(), 13);

    let status = h.session.borrow_mut().animation_frame(1_100.0);
    assert_eq!(status, FrameStatus::Finished { total: 100 });
    assert_eq!(h.visible_points(), 100);
    assert_eq!(h.session.borrow_mut().animation_frame(1_200.0), FrameStatus::Idle);
}

#[test]
fn draw_during_reveal_finishes_it_first() {
    let h = Harness::new();
    let config = RenderConfig::default();
    h.source.push(Ok(series(0, 100)));
    h.source.push(Ok(series(0, 105)));

    h.draw(DrawRequest::new(src(), config, true));
    assert!(h.session.borrow().is_revealing());

    assert_eq!(h.draw(passive(config)), DrawOutcome::Extended { appended: 5, retained: 105 });
    assert!(!h.session.borrow().is_revealing());
    assert_eq!(h.visible_points(), 105);
}

#[test]
fn render_failure_keeps_state_and_recovers() {
    let h = Harness::new();
    let config = RenderConfig::default();
    h.source.push(Ok(series(0, 50)));
    h.source.push(Ok(series(0, 60)));
    h.source.push(Ok(series(0, 60)));

    h.draw(passive(config));
    let before = h.session.borrow().sync_state().clone();

    h.session.borrow_mut().renderer_mut().fail_with("context lost");
    assert_eq!(
        h.draw(passive(config)),
        DrawOutcome::Placeholder(ChartError::Render(RenderError::new("context lost")))
    );
    assert_eq!(h.session.borrow().sync_state(), &before);

    h.session.borrow_mut().renderer_mut().recover();
    assert_eq!(h.draw(passive(config)), DrawOutcome::Rebuilt { points: 60, animated: false });
}

#[test]
fn dispose_purges_and_ignores_late_results() {
    let clock = Rc::new(ManualClock::new(0.0));
    let mut session = common::session(clock);
    let request = passive(RenderConfig::default());

    let first = session.issue(request.clone());
    session.complete(first, Ok(series(0, 50)));
    let late = session.issue(request);

    session.dispose();
    assert_eq!(session.renderer().calls().last(), Some(&RenderCall::Purge));
    assert_eq!(session.sync_state().phase(), SyncPhase::Initial);
    assert_eq!(session.complete(late, Ok(series(0, 60))), DrawOutcome::Stale);
}

#[test]
fn invalidate_forces_rebuild() {
    let h = Harness::new();
    let config = RenderConfig::default();
    h.source.push(Ok(series(0, 50)));
    h.source.push(Ok(series(0, 52)));

    h.draw(passive(config));
    h.session.borrow_mut().invalidate();
    assert_eq!(h.draw(passive(config)), DrawOutcome::Rebuilt { points: 52, animated: false });
}

#[test]
fn forced_request_rebuilds_without_animation() {
    let h = Harness::new();
    let config = RenderConfig::default();
    h.source.push(Ok(series(0, 10)));
    h.source.push(Ok(series(0, 12)));

    h.draw(passive(config));
    let forced = DrawRequest { force_full: true, ..passive(config) };
    assert_eq!(h.draw(forced), DrawOutcome::Rebuilt { points: 12, animated: false });
    assert!(!h.session.borrow().is_revealing());
}
