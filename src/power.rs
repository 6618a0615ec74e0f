//! Duty-cycle decisions and the deep-sleep primitive.
//!
//! The node spends almost all of its life in deep sleep.  Every
//! `sleep_interval_ms` it wakes, restores the session and either goes
//! straight back to sleep (fast path) or stays up long enough to take one
//! calibration sample and, if someone is in front of it, serve the display.
//!
//! ```text
//!   wake ─▶ resume ─┬─ no motion, uptime < period ─▶ checkpoint ─▶ sleep
//!                   └─ superloop ─┬─ uptime ≥ period ─▶ sample, uptime %= period
//!                                 ├─ display served ─▶ loop again
//!                                 └─ otherwise ─────▶ checkpoint ─▶ sleep
//! ```
//!
//! Deep sleep is a full restart: nothing in RAM survives, only the RTC
//! and retained memory.

use crate::calibration::CalibrationState;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

/// What woke the chip this time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeReason {
    /// Cold boot or external reset.
    PowerOn,
    /// Deep-sleep timer expired.
    Timer,
    /// Any other wake source.
    Other,
}

impl WakeReason {
    /// Read the wake cause from the sleep controller.
    #[cfg(target_os = "espidf")]
    pub fn determine() -> Self {
        // SAFETY: read-only query of the RTC sleep controller.
        let cause = unsafe { esp_sleep_get_wakeup_cause() };
        #[allow(non_upper_case_globals)]
        match cause {
            esp_sleep_source_t_ESP_SLEEP_WAKEUP_UNDEFINED => Self::PowerOn,
            esp_sleep_source_t_ESP_SLEEP_WAKEUP_TIMER => Self::Timer,
            _ => Self::Other,
        }
    }

    /// Simulation always starts cold.
    #[cfg(not(target_os = "espidf"))]
    pub fn determine() -> Self {
        Self::PowerOn
    }
}

/// Consume one sample period from the accumulated uptime.
///
/// Returns `true` when a sample is due.  At most one sample is taken per
/// call no matter how much uptime has piled up.
pub fn take_sample_tick(state: &mut CalibrationState, sample_period_secs: i64) -> bool {
    if state.session_uptime_secs >= sample_period_secs {
        state.session_uptime_secs %= sample_period_secs;
        true
    } else {
        false
    }
}

/// Nothing to do this wake: no one asked for the display and no sample
/// is due.
pub fn fast_sleep_due(
    display_requested: bool,
    state: &CalibrationState,
    sample_period_secs: i64,
) -> bool {
    !display_requested && state.session_uptime_secs < sample_period_secs
}

/// Lock the CPU clock at `mhz` with automatic light sleep off.
///
/// Needs `CONFIG_PM_ENABLE`; without it the call fails and the chip keeps
/// its boot clock (`CONFIG_ESP_DEFAULT_CPU_FREQ_MHZ_80` in
/// `sdkconfig.defaults`).
#[cfg(target_os = "espidf")]
pub fn set_cpu_frequency(mhz: u32) -> Result<(), i32> {
    let cfg = esp_pm_config_t {
        max_freq_mhz: mhz as i32,
        min_freq_mhz: mhz as i32,
        light_sleep_enable: false,
    };
    // SAFETY: cfg outlives the call; esp_pm_configure copies it.
    let ret = unsafe { esp_pm_configure((&raw const cfg).cast()) };
    if ret != ESP_OK {
        return Err(ret);
    }
    log::info!("power: CPU clock locked at {}MHz", mhz);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn set_cpu_frequency(mhz: u32) -> Result<(), i32> {
    log::info!("power(sim): CPU clock {}MHz", mhz);
    Ok(())
}

/// Enter timed deep sleep.  Does not return; the next wake restarts
/// `main`.
#[cfg(target_os = "espidf")]
pub fn deep_sleep(duration_ms: u32) -> ! {
    log::info!("power: deep sleep for {}ms", duration_ms);
    // SAFETY: no peripherals are mid-transaction; the main loop is the only caller.
    unsafe { esp_deep_sleep(u64::from(duration_ms) * 1000) }
}

/// Host stand-in: there is no restart to fall into, so end the process.
#[cfg(not(target_os = "espidf"))]
pub fn deep_sleep(duration_ms: u32) -> ! {
    log::info!("power(sim): deep sleep for {}ms, exiting", duration_ms);
    std::process::exit(0)
}
