//! Interrupt-driven display flags.
//!
//! Two asynchronous sources talk to the main loop:
//! - the PIR GPIO ISR (motion → "display requested")
//! - the periodic display timer (page advance / end of cycle)
//!
//! Neither touches sensors, calibration or retained memory; they only
//! flip the atomics below.  The main loop polls them once per iteration
//! and tolerates seeing a value one iteration late.
//!
//! ```text
//! ┌─────────────┐  request_display   ┌──────────────┐
//! │ PIR ISR     │───────────────────▶│              │
//! └─────────────┘                    │ SharedFlags  │──▶ Main loop
//! ┌─────────────┐  on_page_tick      │  (atomics)   │
//! │ Page timer  │───────────────────▶│              │
//! └─────────────┘                    └──────────────┘
//! ```

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use crate::display::{PAGE_COUNT, Page};

/// Flag cells shared between ISR/timer context and the main loop.
pub struct SharedFlags {
    display_requested: AtomicBool,
    cycle_active: AtomicBool,
    page: AtomicU8,
    page_changed: AtomicBool,
}

/// The single instance wired to the real ISR and timer callbacks.
pub static FLAGS: SharedFlags = SharedFlags::new();

impl Default for SharedFlags {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedFlags {
    pub const fn new() -> Self {
        Self {
            display_requested: AtomicBool::new(false),
            cycle_active: AtomicBool::new(false),
            page: AtomicU8::new(0),
            page_changed: AtomicBool::new(false),
        }
    }

    // ── Producer side (ISR / timer task) ──────────────────────

    /// Motion confirmed.  Safe in ISR context.
    pub fn request_display(&self) {
        self.display_requested.store(true, Ordering::Release);
    }

    /// Page timer fired.  Advances the page, or ends the cycle after the
    /// last one.  Ticks outside an active cycle are ignored.
    pub fn on_page_tick(&self) {
        if !self.cycle_active.load(Ordering::Acquire) {
            return;
        }
        let next = self.page.load(Ordering::Relaxed) + 1;
        if usize::from(next) >= PAGE_COUNT {
            self.page.store(0, Ordering::Relaxed);
            self.page_changed.store(false, Ordering::Relaxed);
            // Clear the request before the cycle so the main loop never
            // sees "inactive but still requested" from this cycle.
            self.display_requested.store(false, Ordering::Release);
            self.cycle_active.store(false, Ordering::Release);
        } else {
            self.page.store(next, Ordering::Relaxed);
            self.page_changed.store(true, Ordering::Release);
        }
    }

    // ── Consumer side (main loop) ─────────────────────────────

    pub fn display_requested(&self) -> bool {
        self.display_requested.load(Ordering::Acquire)
    }

    pub fn cycle_active(&self) -> bool {
        self.cycle_active.load(Ordering::Acquire)
    }

    /// Start a page cycle on the first page.  The first page is reported
    /// as changed so it renders immediately.
    pub fn begin_cycle(&self) {
        self.page.store(0, Ordering::Relaxed);
        self.page_changed.store(true, Ordering::Relaxed);
        self.cycle_active.store(true, Ordering::Release);
    }

    /// The current page, if it changed since the last call.
    pub fn take_page_change(&self) -> Option<Page> {
        if self.page_changed.swap(false, Ordering::AcqRel) {
            Some(self.current_page())
        } else {
            None
        }
    }

    pub fn current_page(&self) -> Page {
        Page::from_index(self.page.load(Ordering::Acquire))
    }
}
