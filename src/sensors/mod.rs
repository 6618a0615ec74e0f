//! Sensor subsystem: the environment reading and the battery sampler.
//!
//! The environment sensor itself sits behind
//! [`SensorPort`](crate::app::ports::SensorPort); the BME680 driver
//! adapter lives in [`crate::adapters::environment`].

pub mod battery;

/// One measurement from the combined gas / climate sensor.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SensorReading {
    /// °C
    pub temperature_c: f32,
    /// Relative humidity, %
    pub humidity_pct: f32,
    /// hPa
    pub pressure_hpa: f32,
    /// Heated-plate gas resistance, Ω.  Higher means cleaner air.
    pub gas_ohm: f32,
}
