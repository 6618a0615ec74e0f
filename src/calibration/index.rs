//! Composite air-quality index.
//!
//! ```text
//! IAQ = 500 × ( 0.50 · gas
//!             + 0.25 · |normalize(humidity,    30, 45, 60)|
//!             + 0.25 · |normalize(temperature, 18, 23, 28)| )
//! ```
//!
//! `gas` is the inverted gas score: 0 = cleanest air seen this session,
//! 1 = dirtiest.  Humidity and temperature contribute by how far they are
//! from a comfortable midpoint.  Result is in `[0, 500]` for `gas ∈ [0, 1]`.

/// Upper end of the index scale.
pub const INDEX_SCALE: f32 = 500.0;

const GAS_WEIGHT: f32 = 0.5;
const HUMIDITY_WEIGHT: f32 = 0.25;
const TEMPERATURE_WEIGHT: f32 = 0.25;

/// Comfort band for relative humidity (%): min, mid, max.
pub const HUMIDITY_BAND: (f32, f32, f32) = (30.0, 45.0, 60.0);
/// Comfort band for temperature (°C): min, mid, max.
pub const TEMPERATURE_BAND: (f32, f32, f32) = (18.0, 23.0, 28.0);

/// Map `value` onto `[-1, 1]` around `mid`.
///
/// Below `mid` the distance is scaled by `mid - min`, at or above by
/// `max - mid`.  Anything beyond the band clamps to ±1.
pub fn normalize(value: f32, min: f32, mid: f32, max: f32) -> f32 {
    let n = if value < mid {
        (value - mid) / (mid - min)
    } else {
        (value - mid) / (max - mid)
    };
    n.clamp(-1.0, 1.0)
}

/// Weighted composite index from the inverted gas score and climate.
pub fn calculate_index(gas: f32, humidity: f32, temperature: f32) -> f32 {
    let (h_min, h_mid, h_max) = HUMIDITY_BAND;
    let (t_min, t_mid, t_max) = TEMPERATURE_BAND;
    let h = normalize(humidity, h_min, h_mid, h_max).abs();
    let t = normalize(temperature, t_min, t_mid, t_max).abs();
    INDEX_SCALE * (GAS_WEIGHT * gas + HUMIDITY_WEIGHT * h + TEMPERATURE_WEIGHT * t)
}
