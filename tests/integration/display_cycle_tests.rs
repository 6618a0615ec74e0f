//! Motion → display cycle → teardown, driven through the shared flags the
//! way the PIR ISR and the page timer drive them on hardware.

use airnode::alert::WARNING_DUTY;
use airnode::app::events::{AppEvent, WarningCause};
use airnode::app::ports::LedDuty;
use airnode::app::service::{AppService, Step};
use airnode::config::SystemConfig;
use airnode::display::Page;
use airnode::events::SharedFlags;

use crate::mock_hw::{BoardCall, MockBoard, MockClock, MockStore, NoopDelay, RecordingSink};

struct Rig {
    app: AppService,
    hw: MockBoard,
    clock: MockClock,
    flags: SharedFlags,
    delay: NoopDelay,
    sink: RecordingSink,
}

impl Rig {
    /// Resume from `record` ten seconds after it was written, with the
    /// climate pages primed by one sensor read.
    fn resume(record: &str, last_logged: i64) -> Self {
        let store = MockStore::with(record);
        let clock = MockClock::at(last_logged + 10);
        let mut sink = RecordingSink::new();
        let mut app = AppService::resume(SystemConfig::default(), &store, &clock, &mut sink);
        let mut hw = MockBoard::new();
        app.refresh_reading(&mut hw);
        Self {
            app,
            hw,
            clock,
            flags: SharedFlags::new(),
            delay: NoopDelay::default(),
            sink,
        }
    }

    fn step(&mut self) -> Step {
        self.app.step(
            &mut self.hw,
            &self.clock,
            &mut self.delay,
            &self.flags,
            &mut self.sink,
        )
    }

    fn pages_shown(&self) -> Vec<Page> {
        self.sink
            .events
            .iter()
            .filter_map(|e| match e {
                AppEvent::PageShown(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    fn warnings(&self) -> Vec<WarningCause> {
        self.sink
            .events
            .iter()
            .filter_map(|e| match e {
                AppEvent::Warning(w) => Some(*w),
                _ => None,
            })
            .collect()
    }
}

const WARM: &str = "8,900,5500,1000,0,40,15000";
const BAD_AIR: &str = "20,900,5500,1000,0,90,45000";
const FRESH: &str = "2,1000000000,0,1000,0,0,0";

// ── Page sequence ─────────────────────────────────────────────

#[test]
fn no_motion_means_sleep() {
    let mut rig = Rig::resume(WARM, 1000);
    assert_eq!(rig.step(), Step::Sleep);
    assert!(rig.hw.calls.is_empty());
    assert!(!rig.app.is_display_active());
}

#[test]
fn full_cycle_walks_five_pages_then_tears_down() {
    let mut rig = Rig::resume(WARM, 1000);
    rig.flags.request_display();

    assert_eq!(rig.step(), Step::Continue);
    assert!(rig.app.is_display_active());
    assert_eq!(rig.hw.count(&BoardCall::PowerOn), 1);
    assert_eq!(rig.hw.count(&BoardCall::TimerStart(5000)), 1);
    assert_eq!(rig.hw.screen(), vec!["Temp".to_owned(), "23.00'C".to_owned()]);

    for _ in 0..4 {
        rig.flags.on_page_tick();
        assert_eq!(rig.step(), Step::Continue);
    }
    assert_eq!(
        rig.pages_shown(),
        vec![
            Page::Temperature,
            Page::Humidity,
            Page::Pressure,
            Page::Battery,
            Page::AirQuality,
        ]
    );
    assert_eq!(
        rig.hw.screen(),
        vec!["IAQ".to_owned(), "30.00%".to_owned(), "150".to_owned()]
    );

    // Fifth tick ends the cycle.
    rig.flags.on_page_tick();
    assert!(!rig.flags.display_requested());
    assert_eq!(rig.step(), Step::Sleep);
    assert!(!rig.app.is_display_active());
    assert_eq!(rig.hw.count(&BoardCall::TimerStop), 1);
    assert_eq!(rig.hw.count(&BoardCall::PowerOff), 1);
    assert_eq!(rig.hw.led(), LedDuty::OFF);
    assert!(!rig.hw.buzzer_enabled());
    assert_eq!(rig.sink.events.last(), Some(&AppEvent::DisplayOff));
}

#[test]
fn polling_without_tick_redraws_nothing() {
    let mut rig = Rig::resume(WARM, 1000);
    rig.flags.request_display();
    rig.step();
    let drawn = rig.hw.count(&BoardCall::Show);
    for _ in 0..10 {
        assert_eq!(rig.step(), Step::Continue);
    }
    assert_eq!(rig.hw.count(&BoardCall::Show), drawn);
}

#[test]
fn motion_during_cycle_does_not_restart_it() {
    let mut rig = Rig::resume(WARM, 1000);
    rig.flags.request_display();
    rig.step();
    rig.flags.on_page_tick();
    rig.flags.request_display();
    rig.step();
    assert_eq!(rig.hw.count(&BoardCall::PowerOn), 1);
    assert_eq!(rig.flags.current_page(), Page::Humidity);
}

#[test]
fn ready_session_lights_indicator_on_entry() {
    let mut rig = Rig::resume(WARM, 1000);
    rig.flags.request_display();
    rig.step();
    // Index 150 sits in the moderate tier.
    assert_eq!(
        rig.hw.led(),
        LedDuty {
            red: 1 << 15,
            green: 1 << 12,
            blue: 0,
        }
    );
    assert!(rig.warnings().is_empty());
}

#[test]
fn warming_session_shows_countdown_and_no_indicator() {
    let mut rig = Rig::resume(FRESH, 1000);
    rig.flags.request_display();
    rig.step();
    assert!(
        !rig
            .hw
            .calls
            .iter()
            .any(|c| matches!(c, BoardCall::SetLed(_)))
    );

    for _ in 0..4 {
        rig.flags.on_page_tick();
        rig.step();
    }
    // Four samples to go at 30 s each, 10 s already accumulated.
    assert_eq!(
        rig.hw.screen(),
        vec!["Warming".to_owned(), "up".to_owned(), "110s".to_owned()]
    );
}

// ── Warnings ──────────────────────────────────────────────────

#[test]
fn bad_air_alarms_before_display_comes_up() {
    let mut rig = Rig::resume(BAD_AIR, 1000);
    rig.flags.request_display();
    rig.step();

    assert_eq!(rig.warnings(), vec![WarningCause::PoorAirQuality]);
    assert_eq!(rig.delay.total_ms(), 4000);
    assert_eq!(rig.hw.buzzer_pulses(), 2);
    assert_eq!(rig.hw.count(&BoardCall::EnableBuzzer(2000)), 1);
    assert!(!rig.hw.buzzer_enabled());
    assert_eq!(
        rig.hw.led(),
        LedDuty {
            red: 1 << 15,
            green: 0,
            blue: 0,
        }
    );

    // Warning first, then the panel.
    let warned = rig
        .hw
        .calls
        .iter()
        .position(|c| *c == BoardCall::SetBuzzer(WARNING_DUTY));
    let powered = rig.hw.calls.iter().position(|c| *c == BoardCall::PowerOn);
    assert!(warned < powered);
}

#[test]
fn immature_session_never_alarms() {
    // High index but not enough samples yet.
    let mut rig = Rig::resume("10,900,5500,1000,0,90,45000", 1000);
    rig.flags.request_display();
    rig.step();
    assert!(rig.warnings().is_empty());
    assert_eq!(rig.delay.total_ms(), 0);
}

#[test]
fn low_battery_page_warns() {
    let mut rig = Rig::resume(FRESH, 1000);
    // 1.3 V at the pin is 2.6 V at the cell: 6 %.
    rig.hw.adc_uv = 1_300_000;
    rig.flags.request_display();
    rig.step();
    for _ in 0..3 {
        rig.flags.on_page_tick();
        rig.step();
    }

    assert_eq!(rig.pages_shown().last(), Some(&Page::Battery));
    assert_eq!(rig.warnings(), vec![WarningCause::LowBattery]);
    assert_eq!(rig.delay.total_ms(), 4000);
    assert!(!rig.hw.buzzer_enabled());
    // Not calibrated: LED stays dark after the pulse.
    assert_eq!(rig.hw.led(), LedDuty::OFF);
    assert!(rig.app.is_display_active());
}

#[test]
fn low_battery_restores_indicator_when_ready() {
    let mut rig = Rig::resume(WARM, 1000);
    rig.hw.adc_uv = 1_300_000;
    rig.flags.request_display();
    rig.step();
    for _ in 0..3 {
        rig.flags.on_page_tick();
        rig.step();
    }
    assert_eq!(rig.warnings(), vec![WarningCause::LowBattery]);
    assert_eq!(
        rig.hw.led(),
        LedDuty {
            red: 1 << 15,
            green: 1 << 12,
            blue: 0,
        }
    );
}

#[test]
fn sample_due_during_cycle_is_taken() {
    let mut rig = Rig::resume(WARM, 1000);
    rig.flags.request_display();
    rig.step();
    assert_eq!(rig.hw.reads, 1, "only the boot refresh");

    rig.clock.advance(30);
    rig.step();
    assert_eq!(rig.hw.reads, 2);
    assert_eq!(rig.app.calibration().measurement_count, 9);
    assert!(rig.app.is_display_active());
}
