//! RTC time-of-day adapter.
//!
//! Implements [`ClockPort`].  Only hours, minutes and seconds are used:
//! the node never needs a date and has no network time source.
//!
//! - **`target_os = "espidf"`**: `gettimeofday()` + `localtime_r()`.  The
//!   RTC keeps counting through deep sleep.
//! - **`not(target_os = "espidf")`**: system clock (UTC) for host-side
//!   simulation.

use crate::app::ports::{ClockPort, TimeOfDay};

/// Time adapter for the ESP32 RTC.
#[derive(Debug, Default, Clone, Copy)]
pub struct RtcClock;

impl RtcClock {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(target_os = "espidf")]
impl ClockPort for RtcClock {
    fn time_of_day(&self) -> TimeOfDay {
        use core::ptr;
        let mut tv = esp_idf_svc::sys::timeval {
            tv_sec: 0,
            tv_usec: 0,
        };
        // SAFETY: plain libc call writing into a stack value.
        if unsafe { esp_idf_svc::sys::gettimeofday(&mut tv, ptr::null_mut()) } != 0 {
            log::warn!("time: gettimeofday failed");
            return TimeOfDay::default();
        }
        let secs = tv.tv_sec as esp_idf_svc::sys::time_t;
        // SAFETY: `tm` is plain data; localtime_r fills it or returns null.
        let mut tm: esp_idf_svc::sys::tm = unsafe { core::mem::zeroed() };
        if unsafe { esp_idf_svc::sys::localtime_r(&secs, &mut tm) }.is_null() {
            log::warn!("time: localtime_r failed");
            return TimeOfDay::default();
        }
        TimeOfDay {
            hours: tm.tm_hour.clamp(0, 23) as u8,
            minutes: tm.tm_min.clamp(0, 59) as u8,
            seconds: tm.tm_sec.clamp(0, 59) as u8,
        }
    }
}

#[cfg(not(target_os = "espidf"))]
impl ClockPort for RtcClock {
    fn time_of_day(&self) -> TimeOfDay {
        let secs = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        from_seconds_of_day(secs % 86_400)
    }
}

/// Split seconds since midnight into h/m/s.
pub fn from_seconds_of_day(secs: u64) -> TimeOfDay {
    let secs = secs % 86_400;
    TimeOfDay {
        hours: (secs / 3600) as u8,
        minutes: (secs / 60 % 60) as u8,
        seconds: (secs % 60) as u8,
    }
}
