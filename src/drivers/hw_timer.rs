//! Display page timer using ESP-IDF's esp_timer API.
//!
//! A periodic timer advances the page while the display is served.  The
//! callback runs in the esp_timer task (not ISR) and only calls
//! [`SharedFlags::on_page_tick`](crate::events::SharedFlags::on_page_tick).
//!
//! The timer is created on [`start`](DisplayTimer::start) and deleted on
//! [`stop`](DisplayTimer::stop), so no callback outlives a page cycle.
//! On simulation targets it only tracks whether it is armed.

use log::info;

use crate::app::ports::DisplayTimer;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
unsafe extern "C" fn page_tick_cb(_arg: *mut core::ffi::c_void) {
    crate::events::FLAGS.on_page_tick();
}

/// Owner of the periodic page timer.
pub struct PageTimer {
    #[cfg(target_os = "espidf")]
    handle: esp_timer_handle_t,
    armed: bool,
}

impl Default for PageTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl PageTimer {
    pub fn new() -> Self {
        Self {
            #[cfg(target_os = "espidf")]
            handle: core::ptr::null_mut(),
            armed: false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }
}

#[cfg(target_os = "espidf")]
impl DisplayTimer for PageTimer {
    fn start(&mut self, period_ms: u32) {
        if self.armed {
            return;
        }
        // SAFETY: the handle is owned by this struct and only touched from
        // the main task.  The callback only flips atomics.
        unsafe {
            let args = esp_timer_create_args_t {
                callback: Some(page_tick_cb),
                arg: core::ptr::null_mut(),
                dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
                name: c"page".as_ptr(),
                skip_unhandled_events: true,
            };
            let ret = esp_timer_create(&args, &mut self.handle);
            if ret != ESP_OK {
                log::error!("hw_timer: page timer create failed (rc={})", ret);
                return;
            }
            let ret = esp_timer_start_periodic(self.handle, u64::from(period_ms) * 1000);
            if ret != ESP_OK {
                log::error!("hw_timer: page timer start failed (rc={})", ret);
                esp_timer_delete(self.handle);
                self.handle = core::ptr::null_mut();
                return;
            }
        }
        self.armed = true;
        info!("hw_timer: page timer started ({}ms)", period_ms);
    }

    fn stop(&mut self) {
        // SAFETY: null-check prevents double-free; main task only.
        unsafe {
            if !self.handle.is_null() {
                esp_timer_stop(self.handle);
                esp_timer_delete(self.handle);
                self.handle = core::ptr::null_mut();
            }
        }
        self.armed = false;
        info!("hw_timer: page timer stopped");
    }
}

#[cfg(not(target_os = "espidf"))]
impl DisplayTimer for PageTimer {
    fn start(&mut self, period_ms: u32) {
        self.armed = true;
        info!("hw_timer(sim): page timer armed ({}ms, ticks driven by caller)", period_ms);
    }

    fn stop(&mut self) {
        self.armed = false;
        info!("hw_timer(sim): page timer stopped");
    }
}
