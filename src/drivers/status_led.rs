//! RGB indicator LED driver.
//!
//! Three LEDC PWM channels (CH0-2) drive discrete R/G/B LEDs (or a
//! common-cathode RGB LED).  Duty is given in 16 bits and scaled to the
//! timer resolution by [`hw_init::ledc_set`].
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives three LEDC PWM channels via hw_init.
//! On host/test: tracks state in-memory only.

use crate::app::ports::LedDuty;
use crate::drivers::hw_init;

pub struct StatusLed {
    current: LedDuty,
}

impl Default for StatusLed {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusLed {
    pub fn new() -> Self {
        Self {
            current: LedDuty::OFF,
        }
    }

    pub fn set(&mut self, duty: LedDuty) {
        hw_init::ledc_set(hw_init::LEDC_CH_LED_R, duty.red);
        hw_init::ledc_set(hw_init::LEDC_CH_LED_G, duty.green);
        hw_init::ledc_set(hw_init::LEDC_CH_LED_B, duty.blue);
        self.current = duty;
    }

    pub fn off(&mut self) {
        self.set(LedDuty::OFF);
    }

    pub fn current(&self) -> LedDuty {
        self.current
    }
}
