//! Application service: the hexagonal core.
//!
//! [`AppService`] owns the [`DeviceContext`] and runs the duty cycle one
//! superloop iteration at a time.  All I/O flows through port traits
//! injected at call sites, so the whole wake/sample/display/sleep cycle is
//! testable with mock adapters.
//!
//! ```text
//!  RetainedStore ─▶ ┌──────────────────────────┐ ──▶ EventSink
//!  ClockPort ─────▶ │        AppService        │
//!  Board ◀────────▶ │ calibration · display ·  │
//!  SharedFlags ───▶ │ alerts · duty cycle      │
//!                   └──────────────────────────┘
//! ```
//!
//! A wake looks like this from `main`:
//!
//! 1. [`AppService::resume`]: load the session, apply the timeout rule.
//! 2. [`AppService::fast_sleep_due`]: if true, [`AppService::prepare_sleep`]
//!    and deep-sleep right away.
//! 3. Otherwise call [`AppService::step`] until it returns [`Step::Sleep`],
//!    then [`AppService::prepare_sleep`] and deep-sleep.

use embedded_hal::delay::DelayNs;
use log::{debug, info, warn};

use crate::alert;
use crate::calibration::CalibrationState;
use crate::config::SystemConfig;
use crate::display::{self, Page};
use crate::events::SharedFlags;
use crate::power;
use crate::sensors::SensorReading;
use crate::sensors::battery;
use crate::session;

use super::events::{AppEvent, SampleData, WarningCause};
use super::ports::{
    ActuatorPort, Board, ClockPort, DisplayPort, DisplayTimer, EventSink, RetainedStore,
    SensorPort,
};

// ───────────────────────────────────────────────────────────────
// Device context
// ───────────────────────────────────────────────────────────────

/// Everything the node knows during one wake.
///
/// Only `calibration` survives deep sleep; the rest is rebuilt on every
/// wake.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DeviceContext {
    pub calibration: CalibrationState,
    /// Latest sensor values, shown on the climate pages.
    pub reading: SensorReading,
    /// True while the page timer is armed and the panel powered.
    pub display_active: bool,
    /// Seconds-of-day up to which uptime has been accounted.
    clock_mark: i64,
}

/// Outcome of one superloop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The display is being served; poll again shortly.
    Continue,
    /// Nothing left to do this wake.
    Sleep,
}

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    config: SystemConfig,
    ctx: DeviceContext,
}

impl AppService {
    // ── Lifecycle ─────────────────────────────────────────────

    /// Restore the session from retained memory and account for the time
    /// spent asleep.
    ///
    /// If more than `session_timeout_secs` passed since the last
    /// checkpoint the calibration restarts; otherwise the gap counts as
    /// session uptime.
    pub fn resume(
        config: SystemConfig,
        store: &impl RetainedStore,
        clock: &impl ClockPort,
        sink: &mut impl EventSink,
    ) -> Self {
        let mut calibration = session::load_session(store);
        let now = clock.seconds_of_day();
        let gap_secs = session::gap_secs(&calibration, now);

        if session::apply_timeout(&mut calibration, now, config.session_timeout_secs) {
            info!("session: stale after {}s, recalibrating", gap_secs);
            sink.emit(&AppEvent::SessionReset { gap_secs });
        } else {
            calibration.session_uptime_secs += gap_secs;
            sink.emit(&AppEvent::Resumed {
                measurement_count: calibration.measurement_count,
                session_uptime_secs: calibration.session_uptime_secs,
                gap_secs,
            });
        }
        calibration.last_logged_time_of_day = now;

        Self {
            config,
            ctx: DeviceContext {
                calibration,
                clock_mark: now,
                ..DeviceContext::default()
            },
        }
    }

    /// No display requested and no sample due: go back to sleep without
    /// bringing up the sensor.
    pub fn fast_sleep_due(&self, flags: &SharedFlags) -> bool {
        power::fast_sleep_due(
            flags.display_requested(),
            &self.ctx.calibration,
            self.config.sample_period_secs,
        )
    }

    /// Take a fresh reading for the climate pages without counting it as
    /// a calibration sample.
    pub fn refresh_reading(&mut self, sensor: &mut impl SensorPort) {
        self.ctx.reading = sensor.read();
    }

    /// Checkpoint the session and return the deep-sleep duration.
    ///
    /// On the fast path only the timing fields have changed, but the whole
    /// record is rewritten with the new time stamp so the next wake does not
    /// count this gap again.
    pub fn prepare_sleep(
        &mut self,
        store: &mut impl RetainedStore,
        clock: &impl ClockPort,
        sink: &mut impl EventSink,
        fast_path: bool,
    ) -> u32 {
        let now = clock.seconds_of_day();
        self.account_uptime(now);
        self.checkpoint(store, now);
        let duration_ms = self.config.sleep_interval_ms;
        sink.emit(&AppEvent::Sleeping {
            duration_ms,
            fast_path,
        });
        duration_ms
    }

    // ── Superloop ─────────────────────────────────────────────

    /// One superloop iteration.
    ///
    /// Accounts elapsed time, takes a calibration sample when one is due,
    /// and drives the display state machine from the shared flags.  Only
    /// the warning routine blocks; everything else returns promptly.
    pub fn step(
        &mut self,
        hw: &mut impl Board,
        clock: &impl ClockPort,
        delay: &mut impl DelayNs,
        flags: &SharedFlags,
        sink: &mut impl EventSink,
    ) -> Step {
        self.account_uptime(clock.seconds_of_day());

        if power::take_sample_tick(&mut self.ctx.calibration, self.config.sample_period_secs) {
            self.sample(hw, sink);
        }

        // Timer ended the cycle since the last iteration.
        if self.ctx.display_active && !flags.cycle_active() {
            self.end_display(hw, sink);
        }

        if flags.display_requested() && !self.ctx.display_active {
            self.begin_display(hw, delay, flags, sink);
        }

        if self.ctx.display_active {
            if let Some(page) = flags.take_page_change() {
                self.render_page(page, hw, delay, sink);
            }
            Step::Continue
        } else {
            Step::Sleep
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn calibration(&self) -> &CalibrationState {
        &self.ctx.calibration
    }

    pub fn is_display_active(&self) -> bool {
        self.ctx.display_active
    }

    // ── Internals ─────────────────────────────────────────────

    fn account_uptime(&mut self, now: i64) {
        self.ctx.calibration.session_uptime_secs += now - self.ctx.clock_mark;
        self.ctx.clock_mark = now;
    }

    fn checkpoint(&mut self, store: &mut impl RetainedStore, now: i64) {
        if let Err(e) = session::save_session(store, &self.ctx.calibration, now) {
            warn!("session: checkpoint failed: {}", e);
        }
        self.ctx.calibration.last_logged_time_of_day = now;
    }

    fn sample(&mut self, sensor: &mut impl SensorPort, sink: &mut impl EventSink) {
        let reading = sensor.read();
        self.ctx.reading = reading;
        let cal = &mut self.ctx.calibration;
        cal.update(&reading);
        debug!(
            "sample #{}: gas={:.0} bounds=[{:.0}, {:.0}] score={:.3} iaq={:.1}",
            cal.measurement_count,
            reading.gas_ohm,
            cal.min_gas,
            cal.max_gas,
            cal.gas_score,
            cal.air_quality_index,
        );
        sink.emit(&AppEvent::Sampled(SampleData {
            measurement_count: cal.measurement_count,
            gas_ohm: reading.gas_ohm,
            min_gas: cal.min_gas,
            max_gas: cal.max_gas,
            gas_score: cal.gas_score,
            air_quality_index: cal.air_quality_index,
        }));
    }

    fn begin_display(
        &mut self,
        hw: &mut impl Board,
        delay: &mut impl DelayNs,
        flags: &SharedFlags,
        sink: &mut impl EventSink,
    ) {
        let cal = self.ctx.calibration;
        if cal.is_ready() {
            if alert::alarm_due(&cal) {
                alert::warning(hw, delay, self.config.buzzer_freq_hz);
                sink.emit(&AppEvent::Warning(WarningCause::PoorAirQuality));
            }
            alert::render_indicator(hw, cal.air_quality_index);
        }

        flags.begin_cycle();
        DisplayPort::power_on(hw);
        DisplayTimer::start(hw, self.config.page_period_ms);
        self.ctx.display_active = true;
        info!("display: on");
        sink.emit(&AppEvent::DisplayOn);
    }

    fn end_display(&mut self, hw: &mut impl Board, sink: &mut impl EventSink) {
        DisplayTimer::stop(hw);
        DisplayPort::power_off(hw);
        ActuatorPort::all_off(hw);
        self.ctx.display_active = false;
        info!("display: off");
        sink.emit(&AppEvent::DisplayOff);
    }

    fn render_page(
        &mut self,
        page: Page,
        hw: &mut impl Board,
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) {
        let reading = self.ctx.reading;
        match page {
            Page::Temperature => display::temperature_screen(reading.temperature_c).draw(hw),
            Page::Humidity => display::humidity_screen(reading.humidity_pct).draw(hw),
            Page::Pressure => display::pressure_screen(reading.pressure_hpa).draw(hw),
            Page::Battery => {
                let percent = battery::sample_battery_percentage(hw);
                let low = percent <= alert::LOW_BATTERY_PCT;
                display::battery_screen(percent, low).draw(hw);
                if low {
                    warn!("battery low: {}%", percent);
                    alert::warning_then_indicate(
                        hw,
                        delay,
                        self.config.buzzer_freq_hz,
                        &self.ctx.calibration,
                    );
                    sink.emit(&AppEvent::Warning(WarningCause::LowBattery));
                }
            }
            Page::AirQuality => {
                display::air_quality_screen(&self.ctx.calibration, self.config.sample_period_secs)
                    .draw(hw);
            }
        }
        sink.emit(&AppEvent::PageShown(page));
    }
}
