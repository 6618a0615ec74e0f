//! AirNode Firmware: Main Entry Point
//!
//! Hexagonal architecture with a deep-sleep duty cycle.  Every run of
//! `main` is one wake: RAM starts empty, the session comes back from RTC
//! memory, and the function ends in deep sleep.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter          LogEventSink   RtcMemory   RtcClock  │
//! │  (Sensor+Actuator+        (EventSink)    (Retained)  (Clock)   │
//! │   Display+Analog+Timer)                                        │
//! │  Bme680Sensor  OledDisplay  ── shared I²C0 ──                  │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  Calibration · Session · Display pages · Alerts        │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  PIR ISR · page timer  ──▶  SharedFlags (atomics)              │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::prelude::*;
use log::{error, info, warn};

use airnode::adapters::environment::Bme680Sensor;
use airnode::adapters::hardware::{HardwareAdapter, PwmOutputs};
use airnode::adapters::log_sink::LogEventSink;
use airnode::adapters::oled::OledDisplay;
use airnode::adapters::rtc_memory::RtcMemory;
use airnode::adapters::time::RtcClock;
use airnode::alert;
use airnode::app::ports::ActuatorPort;
use airnode::app::service::{AppService, Step};
use airnode::config::SystemConfig;
use airnode::drivers::{hw_init, motion};
use airnode::events::FLAGS;
use airnode::pins;
use airnode::power::{self, WakeReason};

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    let config = SystemConfig::default();
    config.validate()?;

    let wake_reason = WakeReason::determine();
    info!("AirNode v{} | wake: {:?}", env!("CARGO_PKG_VERSION"), wake_reason);

    // ── 2. Cheap peripherals: clock, PWM, ADC, PIR ISR ────────
    if let Err(rc) = power::set_cpu_frequency(config.cpu_freq_mhz) {
        warn!("power: CPU clock not set (rc={}), keeping boot clock", rc);
    }
    if let Err(e) = hw_init::init_peripherals() {
        error!("HAL init failed: {}, halting", e);
        halt();
    }
    motion::configure(config.motion_settle_ms);
    if let Err(e) = hw_init::init_isr_service() {
        error!("ISR service init failed: {}, continuing without motion", e);
    }

    // ── 3. Restore session ────────────────────────────────────
    let mut store = RtcMemory::new();
    let clock = RtcClock::new();
    let mut sink = LogEventSink::new();
    let buzzer_freq_hz = config.buzzer_freq_hz;
    let poll_ms = config.loop_poll_ms;
    let mut app = AppService::resume(config, &store, &clock, &mut sink);

    if app.fast_sleep_due(&FLAGS) {
        let duration_ms = app.prepare_sleep(&mut store, &clock, &mut sink, true);
        power::deep_sleep(duration_ms);
    }

    // ── 4. I²C devices ────────────────────────────────────────
    // Any failure from here until both devices answer is fatal.
    let mut delay = FreeRtos;
    let mut hw = match init_devices() {
        Ok((sensor, display)) => HardwareAdapter::new(sensor, display),
        Err(e) => {
            error!("I2C init failed: {}, halting", e);
            alert::fatal(&mut PwmOutputs::new(), &mut delay, buzzer_freq_hz);
            halt();
        }
    };
    app.refresh_reading(&mut hw);

    // ── 5. Superloop ──────────────────────────────────────────
    while app.step(&mut hw, &clock, &mut delay, &FLAGS, &mut sink) == Step::Continue {
        FreeRtos::delay_ms(poll_ms);
    }

    // ── 6. Checkpoint and sleep ───────────────────────────────
    hw.all_off();
    let duration_ms = app.prepare_sleep(&mut store, &clock, &mut sink, false);
    power::deep_sleep(duration_ms)
}

/// Bring up I²C0 and both devices on it.  The bus manager is leaked so
/// the proxies can be `'static`.
fn init_devices() -> Result<(Bme680Sensor, OledDisplay)> {
    let peripherals = Peripherals::take()?;
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio21, // pins::I2C_SDA_GPIO
        peripherals.pins.gpio22, // pins::I2C_SCL_GPIO
        &I2cConfig::new().baudrate(pins::I2C_FREQ_HZ.Hz()),
    )?;
    let bus: &'static shared_bus::BusManagerStd<I2cDriver<'static>> =
        Box::leak(Box::new(shared_bus::BusManagerStd::new(i2c)));

    let sensor = Bme680Sensor::new(bus.acquire_i2c()).map_err(airnode::error::Error::from)?;
    let display = OledDisplay::new(bus.acquire_i2c())?;
    Ok((sensor, display))
}

/// Park the main task until an external reset.
fn halt() -> ! {
    loop {
        FreeRtos::delay_ms(1000);
    }
}
