//! GPIO / peripheral pin assignments for the AirNode board (ESP32-WROOM).
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// I²C bus (BME680 + SSD1306 share it)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 21;
pub const I2C_SCL_GPIO: i32 = 22;
/// Bus clock.  Both devices are happy at standard mode.
pub const I2C_FREQ_HZ: u32 = 100_000;

// ---------------------------------------------------------------------------
// Indicator LED (discrete RGB, common cathode)
// ---------------------------------------------------------------------------

pub const LED_R_GPIO: i32 = 27;
pub const LED_G_GPIO: i32 = 25;
pub const LED_B_GPIO: i32 = 32;

// ---------------------------------------------------------------------------
// Piezo buzzer
// ---------------------------------------------------------------------------

pub const BUZZER_GPIO: i32 = 33;

// ---------------------------------------------------------------------------
// Battery sense (1:2 divider): ADC1 channel 6
// ---------------------------------------------------------------------------

pub const BATTERY_ADC_GPIO: i32 = 34;
pub const BATTERY_ADC_CHANNEL: u32 = 6;

// ---------------------------------------------------------------------------
// PIR motion sensor: digital output, HIGH while motion is seen
// ---------------------------------------------------------------------------

pub const PIR_GPIO: i32 = 0;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits).  The domain speaks 16-bit duty and the
/// driver shifts it down.
pub const PWM_RESOLUTION_BITS: u32 = 13;
/// LED PWM frequency.
pub const LED_PWM_FREQ_HZ: u32 = 2_000;
