//! Piezo buzzer on its own LEDC timer.
//!
//! The buzzer only sounds during the warning routine.  Outside of it the
//! channel is stopped with the pin held low so the piezo draws nothing.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: retunes LEDC timer 1 and drives CH3 via hw_init.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuzzerState {
    Detached,
    Attached { freq_hz: u32, duty: u16 },
}

pub struct BuzzerDriver {
    state: BuzzerState,
}

impl Default for BuzzerDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl BuzzerDriver {
    pub fn new() -> Self {
        Self {
            state: BuzzerState::Detached,
        }
    }

    pub fn attach(&mut self, freq_hz: u32) {
        hw_init::buzzer_attach(freq_hz);
        self.state = BuzzerState::Attached { freq_hz, duty: 0 };
    }

    /// Ignored while detached.
    pub fn set_duty(&mut self, duty: u16) {
        if let BuzzerState::Attached { freq_hz, .. } = self.state {
            hw_init::ledc_set(hw_init::LEDC_CH_BUZZER, duty);
            self.state = BuzzerState::Attached { freq_hz, duty };
        }
    }

    pub fn detach(&mut self) {
        hw_init::buzzer_detach();
        self.state = BuzzerState::Detached;
    }

    pub fn state(&self) -> BuzzerState {
        self.state
    }
}
