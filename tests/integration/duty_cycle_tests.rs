//! Wake → sample → checkpoint → sleep, across several simulated wakes.
//!
//! Each "wake" builds a fresh [`AppService`] from retained memory, the
//! way `main` does after deep sleep, so these tests also cover the
//! session record surviving the round trip.

use airnode::app::events::AppEvent;
use airnode::app::service::{AppService, Step};
use airnode::calibration::{MAX_GAS_SENTINEL, MIN_GAS_SENTINEL};
use airnode::config::SystemConfig;
use airnode::events::SharedFlags;

use crate::mock_hw::{MockBoard, MockClock, MockStore, NoopDelay, RecordingSink, reading};

/// One full wake.  Returns the deep-sleep duration the service asked for.
fn wake(
    store: &mut MockStore,
    clock: &MockClock,
    hw: &mut MockBoard,
    flags: &SharedFlags,
    sink: &mut RecordingSink,
) -> (AppService, u32) {
    let mut app = AppService::resume(SystemConfig::default(), &*store, clock, sink);
    if app.fast_sleep_due(flags) {
        let ms = app.prepare_sleep(store, clock, sink, true);
        return (app, ms);
    }
    let mut delay = NoopDelay::default();
    while app.step(hw, clock, &mut delay, flags, sink) == Step::Continue {}
    let ms = app.prepare_sleep(store, clock, sink, false);
    (app, ms)
}

// ── Fresh boot and calibration warm-up ────────────────────────

#[test]
fn fresh_boot_index_appears_on_seventh_sample() {
    let mut store = MockStore::new();
    let clock = MockClock::at(36_000);
    let flags = SharedFlags::new();
    let mut sink = RecordingSink::new();
    let mut hw = MockBoard::with_readings(
        [1000.0, 2000.0, 3000.0, 4000.0, 5000.0, 6000.0, 500.0]
            .into_iter()
            .map(reading),
    );

    // Boot: nothing stored, fast path straight back to sleep.
    let (app, ms) = wake(&mut store, &clock, &mut hw, &flags, &mut sink);
    assert_eq!(ms, 2500);
    assert_eq!(app.calibration().measurement_count, -1);
    assert_eq!(hw.reads, 0, "fast path must not touch the sensor");

    for _ in 0..6 {
        clock.advance(30);
        wake(&mut store, &clock, &mut hw, &flags, &mut sink);
    }
    let (app, _) = wake(&mut store, &clock, &mut hw, &flags, &mut sink);
    // Same clock: nothing elapsed, nothing sampled.
    let cal = app.calibration();
    assert_eq!(cal.measurement_count, 5);
    assert_eq!(cal.air_quality_index, 0.0);
    assert!(!cal.is_ready());

    clock.advance(30);
    let (app, _) = wake(&mut store, &clock, &mut hw, &flags, &mut sink);
    let cal = app.calibration();
    assert_eq!(cal.measurement_count, 6);
    assert_eq!(cal.min_gas, 500.0);
    assert_eq!(cal.max_gas, 6000.0);
    assert_eq!(cal.air_quality_index, 250.0);

    assert_eq!(store.record(), format!("6,500,6000,{},0,0,25000", clock.now()));
    assert_eq!(hw.reads, 7);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::Sampled(_))),
        7,
        "one sample per elapsed period"
    );
}

#[test]
fn first_boot_reports_stale_session() {
    let store = MockStore::new();
    let clock = MockClock::at(43_200);
    let mut sink = RecordingSink::new();
    AppService::resume(SystemConfig::default(), &store, &clock, &mut sink);
    assert_eq!(
        sink.events[0],
        AppEvent::SessionReset { gap_secs: 43_200 }
    );
    // Nothing written until the first checkpoint.
    assert!(store.blob.is_empty());
}

// ── Session timeout rule ──────────────────────────────────────

#[test]
fn sixty_second_gap_carries_calibration_forward() {
    let store = MockStore::with("8,900,5500,2000,10,40,15000");
    let clock = MockClock::at(2060);
    let mut sink = RecordingSink::new();

    let app = AppService::resume(SystemConfig::default(), &store, &clock, &mut sink);
    let cal = app.calibration();
    assert_eq!(cal.measurement_count, 8);
    assert_eq!(cal.min_gas, 900.0);
    assert_eq!(cal.max_gas, 5500.0);
    assert_eq!(cal.gas_score, 0.4);
    assert_eq!(cal.air_quality_index, 150.0);
    assert_eq!(cal.session_uptime_secs, 70);
    assert_eq!(
        sink.events,
        vec![AppEvent::Resumed {
            measurement_count: 8,
            session_uptime_secs: 70,
            gap_secs: 60,
        }]
    );
}

#[test]
fn gap_of_exactly_timeout_is_not_stale() {
    let store = MockStore::with("10,500,6000,1000,5,50,12000");
    let clock = MockClock::at(1120);
    let mut sink = RecordingSink::new();

    let app = AppService::resume(SystemConfig::default(), &store, &clock, &mut sink);
    assert_eq!(app.calibration().measurement_count, 10);
    assert_eq!(app.calibration().session_uptime_secs, 125);
}

#[test]
fn gap_past_timeout_resets_session() {
    let store = MockStore::with("10,500,6000,1000,5,50,12000");
    let clock = MockClock::at(1121);
    let mut sink = RecordingSink::new();

    let app = AppService::resume(SystemConfig::default(), &store, &clock, &mut sink);
    let cal = app.calibration();
    assert_eq!(cal.measurement_count, -1);
    assert_eq!(cal.min_gas, MIN_GAS_SENTINEL);
    assert_eq!(cal.max_gas, MAX_GAS_SENTINEL);
    assert_eq!(cal.session_uptime_secs, 0);
    // Score and index linger until new samples replace them.
    assert_eq!(cal.gas_score, 0.5);
    assert_eq!(cal.air_quality_index, 120.0);
    assert_eq!(sink.events, vec![AppEvent::SessionReset { gap_secs: 121 }]);
}

#[test]
fn gap_across_midnight_never_resets() {
    let store = MockStore::with("10,500,6000,86390,0,50,12000");
    let clock = MockClock::at(5);
    let mut sink = RecordingSink::new();

    let app = AppService::resume(SystemConfig::default(), &store, &clock, &mut sink);
    assert_eq!(app.calibration().measurement_count, 10);
    assert!(matches!(
        sink.events[0],
        AppEvent::Resumed { gap_secs: -86_385, .. }
    ));
}

#[test]
fn malformed_record_starts_fresh() {
    let store = MockStore::with("garbage");
    let clock = MockClock::at(50);
    let mut sink = RecordingSink::new();

    let app = AppService::resume(SystemConfig::default(), &store, &clock, &mut sink);
    assert_eq!(app.calibration().measurement_count, -1);
}

// ── Fast path and sampling cadence ────────────────────────────

#[test]
fn fast_path_checkpoints_elapsed_time() {
    let mut store = MockStore::with("12,500,6000,1000,0,50,12000");
    let clock = MockClock::at(1010);
    let flags = SharedFlags::new();
    let mut sink = RecordingSink::new();
    let mut hw = MockBoard::new();

    let (_, ms) = wake(&mut store, &clock, &mut hw, &flags, &mut sink);
    assert_eq!(ms, 2500);
    assert_eq!(hw.reads, 0);
    assert!(hw.calls.is_empty());
    assert_eq!(store.record(), "12,500,6000,1010,10,50,12000");
    assert_eq!(
        sink.events.last(),
        Some(&AppEvent::Sleeping {
            duration_ms: 2500,
            fast_path: true,
        })
    );

    // 25 s later the accumulated 35 s crosses the sample period.
    clock.advance(25);
    let (app, _) = wake(&mut store, &clock, &mut hw, &flags, &mut sink);
    assert_eq!(hw.reads, 1);
    assert_eq!(app.calibration().measurement_count, 13);
    assert_eq!(app.calibration().session_uptime_secs, 5);
    assert_eq!(
        sink.events.last(),
        Some(&AppEvent::Sleeping {
            duration_ms: 2500,
            fast_path: false,
        })
    );
}

#[test]
fn long_uptime_still_yields_one_sample() {
    let mut store = MockStore::with("12,500,6000,1000,100,50,12000");
    let clock = MockClock::at(1000);
    let flags = SharedFlags::new();
    let mut sink = RecordingSink::new();
    let mut hw = MockBoard::new();

    let (app, _) = wake(&mut store, &clock, &mut hw, &flags, &mut sink);
    assert_eq!(hw.reads, 1);
    assert_eq!(app.calibration().session_uptime_secs, 10);
}

#[test]
fn failed_checkpoint_still_sleeps() {
    let mut store = MockStore::with("12,500,6000,1000,0,50,12000");
    store.fail_writes = true;
    let clock = MockClock::at(1010);
    let flags = SharedFlags::new();
    let mut sink = RecordingSink::new();
    let mut hw = MockBoard::new();

    let (app, ms) = wake(&mut store, &clock, &mut hw, &flags, &mut sink);
    assert_eq!(ms, 2500);
    assert_eq!(store.record(), "12,500,6000,1000,0,50,12000");
    assert_eq!(app.calibration().last_logged_time_of_day, 1010);
}

#[test]
fn healthy_battery_raises_no_warning() {
    let mut store = MockStore::with("12,500,6000,1000,0,50,12000");
    let clock = MockClock::at(1010);
    let flags = SharedFlags::new();
    let mut sink = RecordingSink::new();
    let mut hw = MockBoard::new();
    // 3.5 V at the pin is 7 V at the cell: clamps to full.
    hw.adc_uv = 3_500_000;

    flags.request_display();
    let mut app = AppService::resume(SystemConfig::default(), &store, &clock, &mut sink);
    let mut delay = NoopDelay::default();
    for _ in 0..3 {
        app.step(&mut hw, &clock, &mut delay, &flags, &mut sink);
        flags.on_page_tick();
    }
    app.step(&mut hw, &clock, &mut delay, &flags, &mut sink);
    assert_eq!(hw.screen(), vec!["Battery".to_owned(), "100%".to_owned()]);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::Warning(_))), 0);
    assert_eq!(hw.buzzer_pulses(), 0);
    assert_eq!(delay.total_ms(), 0);

    app.prepare_sleep(&mut store, &clock, &mut sink, false);
}
