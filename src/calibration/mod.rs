//! Self-calibrating gas score.
//!
//! The BME680 gas resistance has no absolute scale: it drifts with sensor
//! age, temperature and the heater history.  The node therefore tracks the
//! lowest and highest resistance seen during the current session and
//! scores each reading by where it falls in that range.
//!
//! ```text
//!  count: -1  0  1  2  3 │ 4  5 │ 6  7 ...
//!         ─── no bounds ─┤ bounds + score │ index
//!                        └─ warm-up ──────┘
//! ```
//!
//! The first four samples after a reset only advance the counter (the
//! heater is still settling).  From the fifth the bounds and score update;
//! from the seventh the composite index is recomputed as well.

pub mod index;

use crate::sensors::SensorReading;

pub use index::{calculate_index, normalize};

/// `measurement_count` at the start of a session (no samples yet).
pub const COUNT_UNSET: i32 = -1;
/// Initial `min_gas`: larger than any real reading.
pub const MIN_GAS_SENTINEL: f32 = 1_000_000_000.0;
/// Initial `max_gas`: smaller than any real reading.
pub const MAX_GAS_SENTINEL: f32 = 0.0;

/// Bounds and score update once the count exceeds this.
pub const BOUNDS_AFTER: i32 = 3;
/// The index is meaningful once the count exceeds this.
pub const INDEX_AFTER: i32 = 5;

/// Calibration state carried across deep-sleep cycles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationState {
    pub measurement_count: i32,
    pub min_gas: f32,
    pub max_gas: f32,
    pub gas_score: f32,
    pub air_quality_index: f32,
    /// RTC seconds-of-day at the last checkpoint.
    pub last_logged_time_of_day: i64,
    /// Active seconds accumulated since the last sample.
    pub session_uptime_secs: i64,
}

impl Default for CalibrationState {
    fn default() -> Self {
        Self {
            measurement_count: COUNT_UNSET,
            min_gas: MIN_GAS_SENTINEL,
            max_gas: MAX_GAS_SENTINEL,
            gas_score: 0.0,
            air_quality_index: 0.0,
            last_logged_time_of_day: 0,
            session_uptime_secs: 0,
        }
    }
}

impl CalibrationState {
    /// Fold one sensor reading into the session.
    ///
    /// Only one bound moves per sample: a reading above `max_gas` never
    /// also lowers `min_gas`.  Equal bounds divide by zero and the score
    /// becomes non-finite until they separate.
    pub fn update(&mut self, reading: &SensorReading) {
        self.measurement_count += 1;

        if self.measurement_count > BOUNDS_AFTER {
            let measured = reading.gas_ohm;
            if measured > self.max_gas {
                self.max_gas = measured;
            } else if measured < self.min_gas {
                self.min_gas = measured;
            }
            self.gas_score = (measured - self.min_gas) / (self.max_gas - self.min_gas);
        }

        if self.measurement_count > INDEX_AFTER {
            self.air_quality_index =
                calculate_index(1.0 - self.gas_score, reading.humidity_pct, reading.temperature_c);
        }
    }

    /// Forget bounds, count and uptime; keep the last score and index
    /// until the next samples recompute them.
    pub fn reset_session(&mut self) {
        self.measurement_count = COUNT_UNSET;
        self.min_gas = MIN_GAS_SENTINEL;
        self.max_gas = MAX_GAS_SENTINEL;
        self.session_uptime_secs = 0;
    }

    /// True once the warm-up window has passed and the index is valid.
    pub fn is_ready(&self) -> bool {
        self.measurement_count > INDEX_AFTER
    }
}
