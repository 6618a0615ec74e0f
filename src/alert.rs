//! LED air-quality indicator and the blocking warning routine.
//!
//! ## Indicator tiers
//!
//! | Index      | Red     | Green   | Colour       |
//! |------------|---------|---------|--------------|
//! | `< 100`    | 0       | 2^14    | green        |
//! | `< 200`    | 2^15    | 2^12    | yellow       |
//! | `< 300`    | 2^15    | 2^8     | orange       |
//! | `≥ 300`    | 2^15    | 0       | red          |
//!
//! ## Warning routine
//!
//! Buzzer on at 2 kHz, LEDs dark, then four one-second steps with the red
//! LED and the buzzer both at duty `2^15, 0, 2^15, 0`.  The routine blocks
//! the main loop for four seconds; nothing else runs meanwhile.

use embedded_hal::delay::DelayNs;
use log::info;

use crate::app::ports::{ActuatorPort, LedDuty};
use crate::calibration::CalibrationState;

/// Index above which the warning fires on display entry.
pub const ALARM_INDEX: f32 = 400.0;
/// The alarm needs more than this many samples in the session.
pub const ALARM_MIN_COUNT: i32 = 15;
/// Battery page warns at or below this charge.
pub const LOW_BATTERY_PCT: u8 = 10;

/// "On" duty for the warning pulse (half of full scale).
pub const WARNING_DUTY: u16 = 1 << 15;
const WARNING_PATTERN: [u16; 4] = [WARNING_DUTY, 0, WARNING_DUTY, 0];
const WARNING_STEP_MS: u32 = 1000;

const TIER_GOOD: f32 = 100.0;
const TIER_MODERATE: f32 = 200.0;
const TIER_POOR: f32 = 300.0;

/// LED colour for an air-quality index.
pub fn indicator_duty(index: f32) -> LedDuty {
    let (red, green) = if index < TIER_GOOD {
        (0, 1 << 14)
    } else if index < TIER_MODERATE {
        (1 << 15, 1 << 12)
    } else if index < TIER_POOR {
        (1 << 15, 1 << 8)
    } else {
        (1 << 15, 0)
    };
    LedDuty {
        red,
        green,
        blue: 0,
    }
}

/// Show the index colour on the LED.
pub fn render_indicator<A: ActuatorPort + ?Sized>(hw: &mut A, index: f32) {
    hw.set_led(indicator_duty(index));
}

/// True when the session is mature enough and the air bad enough to alarm.
pub fn alarm_due(state: &CalibrationState) -> bool {
    state.measurement_count > ALARM_MIN_COUNT && state.air_quality_index > ALARM_INDEX
}

/// Four-second red/buzzer pulse.  Leaves the buzzer detached and the LEDs
/// dark.
pub fn warning<A, D>(hw: &mut A, delay: &mut D, buzzer_freq_hz: u32)
where
    A: ActuatorPort + ?Sized,
    D: DelayNs,
{
    info!("alert: warning pulse");
    hw.enable_buzzer(buzzer_freq_hz);
    hw.set_led(LedDuty::OFF);
    for duty in WARNING_PATTERN {
        hw.set_led(LedDuty {
            red: duty,
            ..LedDuty::OFF
        });
        hw.set_buzzer(duty);
        delay.delay_ms(WARNING_STEP_MS);
    }
    hw.disable_buzzer();
}

/// Boot could not bring the node up: one [`warning`], then every output
/// off.  The caller halts afterwards.
pub fn fatal<A, D>(hw: &mut A, delay: &mut D, buzzer_freq_hz: u32)
where
    A: ActuatorPort + ?Sized,
    D: DelayNs,
{
    log::error!("alert: fatal init failure");
    warning(hw, delay, buzzer_freq_hz);
    hw.all_off();
}

/// [`warning`], then restore the indicator if the index is valid.
pub fn warning_then_indicate<A, D>(
    hw: &mut A,
    delay: &mut D,
    buzzer_freq_hz: u32,
    state: &CalibrationState,
) where
    A: ActuatorPort + ?Sized,
    D: DelayNs,
{
    warning(hw, delay, buzzer_freq_hz);
    if state.is_ready() {
        render_indicator(hw, state.air_quality_index);
    }
}
