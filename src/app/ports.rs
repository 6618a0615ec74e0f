//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (sensor, display, PWM outputs, ADC, RTC, retained
//! memory, event sinks) implement these traits.  The
//! [`AppService`](super::service::AppService) consumes them via generics,
//! so the duty-cycle core never touches hardware directly.

use crate::sensors::SensorReading;

// ───────────────────────────────────────────────────────────────
// Sensor ports (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Combined gas / temperature / humidity / pressure sensor.
pub trait SensorPort {
    /// Take one measurement of all four quantities.
    ///
    /// Implementations log driver failures and return the previous good
    /// reading; the core has no recovery path beyond boot-time init.
    fn read(&mut self) -> SensorReading;
}

/// Single analog input wired to the battery voltage divider.
pub trait AnalogPort {
    /// One calibrated conversion, in microvolts at the ADC pin.
    fn read_microvolts(&mut self) -> u32;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// 16-bit PWM duty for each of the three indicator LED channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LedDuty {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
}

impl LedDuty {
    /// All channels dark.
    pub const OFF: Self = Self {
        red: 0,
        green: 0,
        blue: 0,
    };
}

/// Write-side port: indicator LEDs and buzzer.
pub trait ActuatorPort {
    /// Drive all three LED channels at once.
    fn set_led(&mut self, duty: LedDuty);

    /// Attach the buzzer PWM at `freq_hz` with zero duty.
    fn enable_buzzer(&mut self, freq_hz: u32);

    /// Set the buzzer duty (0–65535).
    fn set_buzzer(&mut self, duty: u16);

    /// Detach the buzzer PWM (pin idles low).
    fn disable_buzzer(&mut self);

    /// LEDs dark and buzzer detached.
    fn all_off(&mut self) {
        self.set_led(LedDuty::OFF);
        self.disable_buzzer();
    }
}

// ───────────────────────────────────────────────────────────────
// Display ports
// ───────────────────────────────────────────────────────────────

/// Text-mode view of the status display.
///
/// Drawing calls only touch the frame buffer; nothing reaches the panel
/// until [`show`](DisplayPort::show).
pub trait DisplayPort {
    fn clear(&mut self);
    fn text(&mut self, x: i32, y: i32, text: &str);
    fn show(&mut self);
    fn power_on(&mut self);
    fn power_off(&mut self);
}

/// Periodic hardware timer that drives the page cycle.
///
/// The timer callback must only call
/// [`SharedFlags::on_page_tick`](crate::events::SharedFlags::on_page_tick).
pub trait DisplayTimer {
    /// Arm the periodic callback.
    fn start(&mut self, period_ms: u32);

    /// Disarm and release the timer.  No callback may fire afterwards.
    fn stop(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Wall-clock time of day as reported by the RTC.  No date component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeOfDay {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

impl TimeOfDay {
    /// Seconds since midnight.
    pub fn seconds_of_day(self) -> i64 {
        i64::from(self.seconds) + i64::from(self.minutes) * 60 + i64::from(self.hours) * 3600
    }
}

/// The RTC keeps running through deep sleep.
pub trait ClockPort {
    fn time_of_day(&self) -> TimeOfDay;

    /// Seconds since midnight (`s + 60·m + 3600·h`).
    fn seconds_of_day(&self) -> i64 {
        self.time_of_day().seconds_of_day()
    }
}

// ───────────────────────────────────────────────────────────────
// Retained memory port
// ───────────────────────────────────────────────────────────────

/// A single opaque blob that survives deep sleep but not power loss.
pub trait RetainedStore {
    /// Copy the blob into `buf`.  Returns the number of bytes written;
    /// `Ok(0)` means nothing has been stored since power-on.
    fn read(&self, buf: &mut [u8]) -> Result<usize, StorageError>;

    /// Replace the blob.
    fn write(&mut self, data: &[u8]) -> Result<(), StorageError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Board bundle
// ───────────────────────────────────────────────────────────────

/// Every peripheral port the superloop drives, bundled so the service can
/// take a single `&mut` without double borrows.
pub trait Board: SensorPort + AnalogPort + ActuatorPort + DisplayPort + DisplayTimer {}

impl<T> Board for T where T: SensorPort + AnalogPort + ActuatorPort + DisplayPort + DisplayTimer {}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`RetainedStore`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Generic I/O error from the backend.
    Io,
    /// The blob does not fit the retained region.
    TooLarge,
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Io => write!(f, "I/O error"),
            Self::TooLarge => write!(f, "blob exceeds retained capacity"),
        }
    }
}
