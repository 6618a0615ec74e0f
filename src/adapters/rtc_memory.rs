//! Retained-memory adapter.
//!
//! Implements [`RetainedStore`] for the session record.
//!
//! - **`target_os = "espidf"`**: a fixed buffer in RTC slow memory
//!   (`.rtc.data`).  It keeps its contents through deep sleep and is
//!   zeroed on power-on, which reads back as "nothing stored".
//! - **`not(target_os = "espidf")`**: an in-memory buffer for host tests
//!   and simulation.

use crate::app::ports::{RetainedStore, StorageError};
use crate::session::SESSION_CAPACITY;

#[cfg(target_os = "espidf")]
#[unsafe(link_section = ".rtc.data")]
static mut RTC_BLOB: [u8; SESSION_CAPACITY] = [0; SESSION_CAPACITY];

#[cfg(target_os = "espidf")]
#[unsafe(link_section = ".rtc.data")]
static mut RTC_LEN: usize = 0;

/// Handle to the retained session blob.
pub struct RtcMemory {
    #[cfg(not(target_os = "espidf"))]
    blob: heapless::Vec<u8, SESSION_CAPACITY>,
}

impl Default for RtcMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl RtcMemory {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            blob: heapless::Vec::new(),
        }
    }
}

#[cfg(target_os = "espidf")]
impl RetainedStore for RtcMemory {
    fn read(&self, buf: &mut [u8]) -> Result<usize, StorageError> {
        // SAFETY: RTC_BLOB/RTC_LEN are only touched by the main task through
        // this adapter; no ISR or timer callback reads them.
        let (blob, len) = unsafe { (&*(&raw const RTC_BLOB), *(&raw const RTC_LEN)) };
        let n = len.min(SESSION_CAPACITY).min(buf.len());
        buf[..n].copy_from_slice(&blob[..n]);
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<(), StorageError> {
        if data.len() > SESSION_CAPACITY {
            return Err(StorageError::TooLarge);
        }
        // SAFETY: see `read`.
        unsafe {
            let blob = &mut *(&raw mut RTC_BLOB);
            blob[..data.len()].copy_from_slice(data);
            *(&raw mut RTC_LEN) = data.len();
        }
        Ok(())
    }
}

#[cfg(not(target_os = "espidf"))]
impl RetainedStore for RtcMemory {
    fn read(&self, buf: &mut [u8]) -> Result<usize, StorageError> {
        let n = self.blob.len().min(buf.len());
        buf[..n].copy_from_slice(&self.blob[..n]);
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<(), StorageError> {
        self.blob.clear();
        self.blob
            .extend_from_slice(data)
            .map_err(|()| StorageError::TooLarge)
    }
}
