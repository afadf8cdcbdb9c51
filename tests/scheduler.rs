use dashboard_chart_wasm::application::scheduler::{PanelVisibility, RefreshScheduler, TickDecision};
use std::cell::Cell;

#[test]
fn refreshes_only_while_visible() {
    let document_visible = Cell::new(true);
    let panel = PanelVisibility::new(|| document_visible.get());
    let mut scheduler = RefreshScheduler::new(10_000);
    scheduler.start(0.0);

    assert_eq!(scheduler.on_timer(10_000.0, &panel), TickDecision::Refresh);

    document_visible.set(false);
    assert_eq!(scheduler.on_timer(20_000.0, &panel), TickDecision::Suppressed);
    assert!(scheduler.has_missed_tick());

    document_visible.set(true);
    panel.set_active(false);
    assert_eq!(scheduler.on_timer(30_000.0, &panel), TickDecision::Suppressed);
}

#[test]
fn missed_tick_refreshes_once_visible_again() {
    let document_visible = Cell::new(false);
    let panel = PanelVisibility::new(|| document_visible.get());
    let mut scheduler = RefreshScheduler::new(5_000);
    scheduler.start(0.0);

    assert_eq!(scheduler.on_timer(5_000.0, &panel), TickDecision::Suppressed);
    // still hidden
    assert!(!scheduler.on_visibility_change(6_000.0, &panel));

    document_visible.set(true);
    assert!(scheduler.on_visibility_change(7_000.0, &panel));
    assert!(!scheduler.on_visibility_change(7_500.0, &panel));

    let countdown = scheduler.countdown(8_000.0).unwrap();
    assert_eq!(countdown.remaining_ms, 4_000.0);
}

#[test]
fn visible_without_missed_tick_does_nothing() {
    let panel = PanelVisibility::new(|| true);
    let mut scheduler = RefreshScheduler::new(5_000);
    scheduler.start(0.0);
    assert!(!scheduler.on_visibility_change(1_000.0, &panel));
}

#[test]
fn countdown_is_advisory() {
    let panel = PanelVisibility::new(|| true);
    let mut scheduler = RefreshScheduler::new(10_000);
    scheduler.start(0.0);

    // a late timer still refreshes; the countdown never gates it
    assert_eq!(scheduler.countdown(15_000.0).unwrap().remaining_ms, 0.0);
    assert_eq!(scheduler.on_timer(15_000.0, &panel), TickDecision::Refresh);
    assert_eq!(scheduler.countdown(15_000.0).unwrap().fraction, 0.0);
}

#[test]
fn stop_silences_timer_and_countdown() {
    let panel = PanelVisibility::new(|| true);
    let mut scheduler = RefreshScheduler::new(2_000);
    scheduler.start(0.0);
    scheduler.stop();

    assert!(!scheduler.is_running());
    assert_eq!(scheduler.on_timer(2_000.0, &panel), TickDecision::Stopped);
    assert!(scheduler.countdown(2_000.0).is_none());
}
