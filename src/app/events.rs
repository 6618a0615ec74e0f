//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them.

use crate::display::Page;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Session restored from retained memory.
    Resumed {
        measurement_count: i32,
        session_uptime_secs: i64,
        gap_secs: i64,
    },

    /// The prior session was stale; calibration restarts.
    SessionReset { gap_secs: i64 },

    /// One calibration sample was taken.
    Sampled(SampleData),

    /// The display was powered on and the page timer armed.
    DisplayOn,

    /// A page was rendered.
    PageShown(Page),

    /// The page cycle finished; display and timer torn down.
    DisplayOff,

    /// The blocking warning routine ran.
    Warning(WarningCause),

    /// State checkpointed; the device is about to deep-sleep.
    Sleeping { duration_ms: u32, fast_path: bool },
}

/// Calibration outcome of one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleData {
    pub measurement_count: i32,
    pub gas_ohm: f32,
    pub min_gas: f32,
    pub max_gas: f32,
    pub gas_score: f32,
    pub air_quality_index: f32,
}

/// Why the warning routine was invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningCause {
    /// Air quality index above the alarm threshold on display entry.
    PoorAirQuality,
    /// Battery page found the charge at or below the low threshold.
    LowBattery,
}
