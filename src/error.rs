//! Unified error types for the AirNode firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping
//! the top-level control loop's error handling uniform.  All variants are
//! `Copy` so they can be passed around without allocation.
//!
//! Only [`Error::Init`] is fatal; everything else is handled where it
//! occurs and at most logged.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Peripheral or bus initialisation failed (sensor, display, ADC, LEDC).
    Init(&'static str),
    /// The environment sensor could not be read.
    Sensor(SensorError),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// I²C transaction with the sensor failed.
    BusFault,
    /// The forced measurement did not produce new data.
    NoNewData,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BusFault => write!(f, "I2C bus fault"),
            Self::NoNewData => write!(f, "no new data"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
