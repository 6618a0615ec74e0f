//! System configuration parameters
//!
//! Timing parameters of the duty cycle.  The defaults reproduce the
//! node's fixed behaviour; there is no provisioning channel, so the
//! config is built once at boot and validated before use.
//!
//! Alert thresholds (LED tiers, alarm index, low battery) are not
//! configurable and live as constants in [`crate::alert`].

use crate::error::Error;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemConfig {
    // --- Duty cycle ---
    /// Accumulated active seconds between two calibration samples.
    pub sample_period_secs: i64,
    /// Gap (seconds) after which the calibration session is considered stale.
    pub session_timeout_secs: i64,
    /// Deep-sleep interval between wake cycles (milliseconds).
    pub sleep_interval_ms: u32,
    /// Superloop poll interval while the display is being served (milliseconds).
    pub loop_poll_ms: u32,

    // --- Display ---
    /// Period of the page-advance timer (milliseconds).
    pub page_period_ms: u32,

    // --- Motion sensor ---
    /// Settle time between the PIR rising edge and the level re-check.
    pub motion_settle_ms: u32,

    // --- Buzzer ---
    /// PWM frequency of the buzzer while the warning routine runs.
    pub buzzer_freq_hz: u32,

    // --- Power ---
    /// CPU clock locked at boot.  One of [`CPU_FREQS_MHZ`].
    pub cpu_freq_mhz: u32,
}

/// Clock speeds the ESP32 PLL can run the CPU at.
pub const CPU_FREQS_MHZ: [u32; 3] = [80, 160, 240];

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Duty cycle
            sample_period_secs: 30,
            session_timeout_secs: 120,
            sleep_interval_ms: 2500,
            loop_poll_ms: 50,

            // Display
            page_period_ms: 5000,

            // Motion
            motion_settle_ms: 10,

            // Buzzer
            buzzer_freq_hz: 2000,

            // Power
            cpu_freq_mhz: 80,
        }
    }
}

impl SystemConfig {
    /// Reject parameter combinations that would stall or thrash the duty cycle.
    pub fn validate(&self) -> Result<(), Error> {
        if self.sample_period_secs <= 0 {
            return Err(Error::Config("sample_period_secs must be > 0"));
        }
        if self.session_timeout_secs <= self.sample_period_secs {
            return Err(Error::Config(
                "session_timeout_secs must be > sample_period_secs",
            ));
        }
        if self.sleep_interval_ms == 0 {
            return Err(Error::Config("sleep_interval_ms must be > 0"));
        }
        if self.page_period_ms == 0 {
            return Err(Error::Config("page_period_ms must be > 0"));
        }
        if self.buzzer_freq_hz == 0 {
            return Err(Error::Config("buzzer_freq_hz must be > 0"));
        }
        if !CPU_FREQS_MHZ.contains(&self.cpu_freq_mhz) {
            return Err(Error::Config("cpu_freq_mhz must be 80, 160 or 240"));
        }
        Ok(())
    }
}
