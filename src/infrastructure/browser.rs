//! Drives a [`ChartSession`] from browser events: the refresh interval,
//! `visibilitychange` and `requestAnimationFrame` for the reveal.
//!
//! Callbacks hold a `Weak` handle to the runtime so that dropping the view
//! tears everything down.

use crate::application::{
    clock::Clock,
    scheduler::{Countdown, PanelVisibility, RefreshScheduler, TickDecision, VisibilityProbe},
    session::{ChartSession, DrawOutcome, DrawRequest, draw},
};
use crate::domain::{
    chart::ChartRenderer,
    logging::LogComponent,
    market_data::CandleSource,
};
use crate::{log_debug, log_info};
use gloo::{events::EventListener, render::AnimationFrame};
use gloo_timers::callback::Interval;
use std::{
    cell::RefCell,
    future::Future,
    rc::Rc,
};

const COMPONENT: LogComponent = LogComponent::Infrastructure("ChartRuntime");

#[cfg(not(target_arch = "wasm32"))]
fn spawn_async<F>(fut: F)
where
    F: Future<Output = ()> + 'static,
{
    futures::executor::block_on(fut);
}

#[cfg(target_arch = "wasm32")]
fn spawn_async<F>(fut: F)
where
    F: Future<Output = ()> + 'static,
{
    wasm_bindgen_futures::spawn_local(fut);
}

pub struct ChartRuntime<R, S, V>
where
    R: ChartRenderer + 'static,
    S: CandleSource + 'static,
    V: VisibilityProbe + 'static,
{
    session: Rc<RefCell<ChartSession<R>>>,
    source: S,
    clock: Rc<dyn Clock>,
    visibility: PanelVisibility<V>,
    scheduler: RefCell<RefreshScheduler>,
    scheduled: RefCell<Option<DrawRequest>>,
    interval: RefCell<Option<Interval>>,
    visibility_listener: RefCell<Option<EventListener>>,
    frame: RefCell<Option<AnimationFrame>>,
}

impl<R, S, V> ChartRuntime<R, S, V>
where
    R: ChartRenderer + 'static,
    S: CandleSource + 'static,
    V: VisibilityProbe + 'static,
{
    pub fn new(
        session: ChartSession<R>,
        source: S,
        document: V,
        scheduler: RefreshScheduler,
        clock: Rc<dyn Clock>,
    ) -> Rc<Self> {
        Rc::new(Self {
            session: Rc::new(RefCell::new(session)),
            source,
            clock,
            visibility: PanelVisibility::new(document),
            scheduler: RefCell::new(scheduler),
            scheduled: RefCell::new(None),
            interval: RefCell::new(None),
            visibility_listener: RefCell::new(None),
            frame: RefCell::new(None),
        })
    }

    pub fn session(&self) -> &Rc<RefCell<ChartSession<R>>> {
        &self.session
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch and apply; starts the frame loop when a reveal began
    pub async fn draw(self: Rc<Self>, request: DrawRequest) -> DrawOutcome {
        let outcome = draw(&self.session, &self.source, request).await;
        if self.session.borrow().is_revealing() {
            self.request_frame();
        }
        log_debug!(COMPONENT, "draw finished: {}", outcome.summary());
        outcome
    }

    fn request_frame(self: &Rc<Self>) {
        if self.frame.borrow().is_some() {
            return;
        }
        let weak = Rc::downgrade(self);
        let handle = gloo::render::request_animation_frame(move |_| {
            if let Some(runtime) = weak.upgrade() {
                runtime.on_frame();
            }
        });
        *self.frame.borrow_mut() = Some(handle);
    }

    fn on_frame(self: &Rc<Self>) {
        self.frame.borrow_mut().take();
        let status = self.session.borrow_mut().animation_frame(self.clock.now_ms());
        if status.wants_next_frame() {
            self.request_frame();
        }
    }

    /// Forget what is drawn, then draw with a forced rebuild
    pub async fn reload(self: Rc<Self>, request: DrawRequest) -> DrawOutcome {
        self.session.borrow_mut().invalidate();
        self.draw(DrawRequest { force_full: true, ..request }).await
    }

    /// Poll `request` every interval while the panel is visible
    pub fn start_scheduler(self: &Rc<Self>, request: DrawRequest) {
        self.stop_scheduler();
        let interval_ms = self.arm_scheduler(request);

        let weak = Rc::downgrade(self);
        *self.interval.borrow_mut() = Some(Interval::new(interval_ms, move || {
            if let Some(runtime) = weak.upgrade() {
                runtime.tick();
            }
        }));

        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            let weak = Rc::downgrade(self);
            *self.visibility_listener.borrow_mut() =
                Some(EventListener::new(&document, "visibilitychange", move |_| {
                    if let Some(runtime) = weak.upgrade() {
                        runtime.visibility_changed();
                    }
                }));
        }
        log_info!(COMPONENT, "auto-refresh every {} ms", interval_ms);
    }

    /// Start the countdown and remember the refresh request; returns the
    /// interval. Timers are installed by `start_scheduler`.
    pub fn arm_scheduler(&self, request: DrawRequest) -> u32 {
        let mut scheduler = self.scheduler.borrow_mut();
        scheduler.start(self.clock.now_ms());
        *self.scheduled.borrow_mut() = Some(request);
        scheduler.interval_ms()
    }

    /// Drops the timer and listener; sync state is kept
    pub fn stop_scheduler(&self) {
        self.scheduler.borrow_mut().stop();
        self.interval.borrow_mut().take();
        self.visibility_listener.borrow_mut().take();
        self.scheduled.borrow_mut().take();
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduler.borrow().is_running()
    }

    pub fn set_active(self: &Rc<Self>, active: bool) {
        self.visibility.set_active(active);
        self.visibility_changed();
    }

    pub fn countdown(&self) -> Option<Countdown> {
        self.scheduler.borrow().countdown(self.clock.now_ms())
    }

    /// Interval callback
    pub fn tick(self: &Rc<Self>) -> TickDecision {
        let decision = self.scheduler.borrow_mut().on_timer(self.clock.now_ms(), &self.visibility);
        match decision {
            TickDecision::Refresh => self.spawn_refresh(),
            TickDecision::Suppressed => {
                log_debug!(COMPONENT, "tick suppressed while hidden");
            }
            TickDecision::Stopped => {}
        }
        decision
    }

    /// `visibilitychange` callback; true when a missed tick was caught up
    pub fn visibility_changed(self: &Rc<Self>) -> bool {
        let catch_up = self.scheduler.borrow_mut().on_visibility_change(self.clock.now_ms(), &self.visibility);
        if catch_up {
            log_debug!(COMPONENT, "visible again, refreshing missed tick");
            self.spawn_refresh();
        }
        catch_up
    }

    fn spawn_refresh(self: &Rc<Self>) {
        let Some(request) = self.scheduled.borrow().clone() else {
            return;
        };
        let runtime = Rc::clone(self);
        spawn_async(async move {
            runtime.draw(request).await;
        });
    }

    pub fn dispose(&self) {
        self.stop_scheduler();
        self.frame.borrow_mut().take();
        self.session.borrow_mut().dispose();
    }
}
