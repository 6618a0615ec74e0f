//! PIR motion input.
//!
//! The PIR output rises when it sees movement.  A short spike on the line
//! can fire the edge interrupt without a real detection, so the handler
//! waits a few milliseconds and only raises the display request if the
//! pin is still high.
//!
//! The handler never samples sensors, never touches calibration and never
//! sleeps the device; it only sets [`SharedFlags::request_display`].

use core::sync::atomic::{AtomicU32, Ordering};

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;

use crate::events::SharedFlags;

/// Default settle time between the edge and the level re-check.
pub const MOTION_SETTLE_MS: u32 = 10;

/// Settle time used by the ISR, set from config at boot.
static SETTLE_MS: AtomicU32 = AtomicU32::new(MOTION_SETTLE_MS);

/// Set the settle time the ISR uses.  Call before installing the ISR.
pub fn configure(settle_ms: u32) {
    SETTLE_MS.store(settle_ms, Ordering::Relaxed);
}

pub fn settle_ms() -> u32 {
    SETTLE_MS.load(Ordering::Relaxed)
}

/// Confirm a rising edge and raise the display request.
///
/// Returns `true` if motion was confirmed.  A pin read error counts as
/// "no motion".
pub fn confirm_motion<P, D>(flags: &SharedFlags, pin: &mut P, delay: &mut D, settle_ms: u32) -> bool
where
    P: InputPin,
    D: DelayNs,
{
    delay.delay_ms(settle_ms);
    let high = pin.is_high().unwrap_or(false);
    if high {
        flags.request_display();
    }
    high
}

// ── ISR glue (ESP-IDF) ────────────────────────────────────────

#[cfg(target_os = "espidf")]
mod isr {
    use core::convert::Infallible;

    use embedded_hal::delay::DelayNs;
    use embedded_hal::digital::{ErrorType, InputPin};
    use esp_idf_svc::sys::{esp_rom_delay_us, gpio_get_level};

    /// Raw level read usable from interrupt context.
    pub struct IsrPin(pub i32);

    impl ErrorType for IsrPin {
        type Error = Infallible;
    }

    impl InputPin for IsrPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            // SAFETY: gpio_get_level is a register read; safe in ISR context.
            Ok(unsafe { gpio_get_level(self.0) } != 0)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            self.is_high().map(|h| !h)
        }
    }

    /// ROM busy-wait; the only delay allowed inside an ISR.
    pub struct RomDelay;

    impl DelayNs for RomDelay {
        fn delay_ns(&mut self, ns: u32) {
            // SAFETY: pure busy loop in ROM.
            unsafe { esp_rom_delay_us(ns.div_ceil(1000)) }
        }
    }
}

/// PIR rising-edge handler, called from the GPIO ISR.
#[cfg(target_os = "espidf")]
pub fn on_motion_isr() {
    let mut pin = isr::IsrPin(crate::pins::PIR_GPIO);
    confirm_motion(
        &crate::events::FLAGS,
        &mut pin,
        &mut isr::RomDelay,
        settle_ms(),
    );
}
