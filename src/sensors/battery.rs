//! Battery charge estimate from the ADC.
//!
//! The cell sits behind a 1:2 resistive divider on an ADC1 pin.  A single
//! conversion on the ESP32 is noisy (±30 mV is common), so each estimate
//! oversamples, sorts, and averages the middle third of the readings.
//!
//! ## Mapping
//!
//! ```text
//!   battery mV = sensed mV × 2
//!   2500 mV →   0 %
//!   4100 mV → 100 %   (linear between, clamped outside, truncated)
//! ```

use log::debug;

use crate::app::ports::AnalogPort;

/// Conversions per estimate.
pub const SAMPLE_COUNT: usize = 50;

/// Divider ratio between the cell and the ADC pin.
const DIVIDER_RATIO: u64 = 2;
/// Cell voltage treated as empty.
pub const MIN_BATTERY_MV: u32 = 2500;
/// Cell voltage treated as full.
pub const MAX_BATTERY_MV: u32 = 4100;

/// Three estimates of the sensed voltage from one batch of samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdcStats {
    pub mean_uv: u32,
    /// `sorted[n / 2]`
    pub median_uv: u32,
    /// Mean of `sorted[n/3 .. 2·(n/3)]`.  The one used downstream.
    pub trimmed_mean_uv: u32,
}

impl AdcStats {
    /// Sorts `samples` in place and computes all three estimates.
    ///
    /// With fewer than three samples the trimmed window is empty and the
    /// median stands in for it.
    pub fn from_samples(samples: &mut [u32]) -> Self {
        let n = samples.len();
        if n == 0 {
            return Self::default();
        }
        samples.sort_unstable();

        let median_uv = samples[n / 2];
        let window = &samples[n / 3..2 * (n / 3)];
        let trimmed_mean_uv = if window.is_empty() {
            median_uv
        } else {
            mean(window)
        };

        Self {
            mean_uv: mean(samples),
            median_uv,
            trimmed_mean_uv,
        }
    }
}

fn mean(values: &[u32]) -> u32 {
    let sum: u64 = values.iter().map(|&v| u64::from(v)).sum();
    (sum / values.len() as u64) as u32
}

/// Charge percentage for a sensed (pin-side) voltage.
pub fn battery_percentage(sensed_uv: u32) -> u8 {
    let battery_mv = u64::from(sensed_uv) * DIVIDER_RATIO / 1000;
    let lo = u64::from(MIN_BATTERY_MV);
    let hi = u64::from(MAX_BATTERY_MV);
    if battery_mv <= lo {
        return 0;
    }
    if battery_mv >= hi {
        return 100;
    }
    ((battery_mv - lo) * 100 / (hi - lo)) as u8
}

/// Take [`SAMPLE_COUNT`] conversions and return the charge percentage.
pub fn sample_battery_percentage<A: AnalogPort + ?Sized>(adc: &mut A) -> u8 {
    let mut samples = [0u32; SAMPLE_COUNT];
    for s in &mut samples {
        *s = adc.read_microvolts();
    }
    let stats = AdcStats::from_samples(&mut samples);
    let pct = battery_percentage(stats.trimmed_mean_uv);
    debug!(
        "battery: mean={}uV median={}uV trimmed={}uV -> {}%",
        stats.mean_uv, stats.median_uv, stats.trimmed_mean_uv, pct
    );
    pct
}
