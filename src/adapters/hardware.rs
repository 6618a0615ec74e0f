//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the environment sensor, the display, the PWM outputs, the battery
//! ADC and the page timer, and exposes them through the port traits that
//! make up [`Board`](crate::app::ports::Board).  The sensor and display
//! are generic so host tests can plug in fakes; the PWM, ADC and timer
//! drivers use cfg-gated simulation stubs off-target.
//!
//! [`PwmOutputs`] is split out so the fatal-init path can still run the
//! warning routine when neither I²C device came up.

use crate::app::ports::{
    ActuatorPort, AnalogPort, DisplayPort, DisplayTimer, LedDuty, SensorPort,
};
use crate::drivers::buzzer::BuzzerDriver;
use crate::drivers::hw_init;
use crate::drivers::hw_timer::PageTimer;
use crate::drivers::status_led::StatusLed;
use crate::sensors::SensorReading;

/// The PWM outputs on their own, usable before the I²C devices are up.
pub struct PwmOutputs {
    led: StatusLed,
    buzzer: BuzzerDriver,
}

impl Default for PwmOutputs {
    fn default() -> Self {
        Self::new()
    }
}

impl PwmOutputs {
    pub fn new() -> Self {
        Self {
            led: StatusLed::new(),
            buzzer: BuzzerDriver::new(),
        }
    }

    pub fn led(&self) -> LedDuty {
        self.led.current()
    }

    pub fn buzzer(&self) -> &BuzzerDriver {
        &self.buzzer
    }
}

impl ActuatorPort for PwmOutputs {
    fn set_led(&mut self, duty: LedDuty) {
        self.led.set(duty);
    }

    fn enable_buzzer(&mut self, freq_hz: u32) {
        self.buzzer.attach(freq_hz);
    }

    fn set_buzzer(&mut self, duty: u16) {
        self.buzzer.set_duty(duty);
    }

    fn disable_buzzer(&mut self) {
        self.buzzer.detach();
    }

    fn all_off(&mut self) {
        self.led.off();
        self.buzzer.detach();
    }
}

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<S, D> {
    sensor: S,
    display: D,
    outputs: PwmOutputs,
    timer: PageTimer,
}

impl<S, D> HardwareAdapter<S, D>
where
    S: SensorPort,
    D: DisplayPort,
{
    pub fn new(sensor: S, display: D) -> Self {
        Self {
            sensor,
            display,
            outputs: PwmOutputs::new(),
            timer: PageTimer::new(),
        }
    }

    pub fn outputs(&self) -> &PwmOutputs {
        &self.outputs
    }

    pub fn timer(&self) -> &PageTimer {
        &self.timer
    }

    pub fn display(&self) -> &D {
        &self.display
    }
}

// ── SensorPort / AnalogPort ───────────────────────────────────

impl<S: SensorPort, D> SensorPort for HardwareAdapter<S, D> {
    fn read(&mut self) -> SensorReading {
        self.sensor.read()
    }
}

impl<S, D> AnalogPort for HardwareAdapter<S, D> {
    fn read_microvolts(&mut self) -> u32 {
        hw_init::battery_adc_read_uv()
    }
}

// ── ActuatorPort ──────────────────────────────────────────────

impl<S, D> ActuatorPort for HardwareAdapter<S, D> {
    fn set_led(&mut self, duty: LedDuty) {
        self.outputs.set_led(duty);
    }

    fn enable_buzzer(&mut self, freq_hz: u32) {
        self.outputs.enable_buzzer(freq_hz);
    }

    fn set_buzzer(&mut self, duty: u16) {
        self.outputs.set_buzzer(duty);
    }

    fn disable_buzzer(&mut self) {
        self.outputs.disable_buzzer();
    }

    fn all_off(&mut self) {
        self.outputs.all_off();
    }
}

// ── DisplayPort / DisplayTimer ────────────────────────────────

impl<S, D: DisplayPort> DisplayPort for HardwareAdapter<S, D> {
    fn clear(&mut self) {
        self.display.clear();
    }

    fn text(&mut self, x: i32, y: i32, text: &str) {
        self.display.text(x, y, text);
    }

    fn show(&mut self) {
        self.display.show();
    }

    fn power_on(&mut self) {
        self.display.power_on();
    }

    fn power_off(&mut self) {
        self.display.power_off();
    }
}

impl<S, D> DisplayTimer for HardwareAdapter<S, D> {
    fn start(&mut self, period_ms: u32) {
        self.timer.start(period_ms);
    }

    fn stop(&mut self) {
        self.timer.stop();
    }
}
