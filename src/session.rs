//! Session persistence across deep sleep.
//!
//! Deep sleep is a full restart: RAM is lost and `main` runs from the top.
//! The calibration state therefore travels through retained memory as a
//! short ASCII record:
//!
//! ```text
//! count,min_gas,max_gas,last_logged,uptime,gas×100,index×100
//! 7,850,6200,43512,12,41,18533
//! ```
//!
//! All seven fields are signed decimal integers.  Floats are truncated
//! toward zero (NaN becomes 0), so the score and index keep two decimals
//! and the gas bounds lose their fraction.
//!
//! Missing or unreadable content is never fatal: the node starts a fresh
//! session with sentinel bounds.

use core::fmt::Write as _;

use log::{info, warn};

use crate::app::ports::{RetainedStore, StorageError};
use crate::calibration::CalibrationState;

/// Bytes of retained memory reserved for the session record.
pub const SESSION_CAPACITY: usize = 128;

const FIELD_COUNT: usize = 7;
const FIXED_POINT: f32 = 100.0;

/// Why a stored session could not be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// Nothing stored since power-on.
    Missing,
    /// Content present but not a valid record.
    Malformed,
    /// The backend failed.
    Storage(StorageError),
}

impl core::fmt::Display for SessionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Missing => write!(f, "no session stored"),
            Self::Malformed => write!(f, "malformed session record"),
            Self::Storage(e) => write!(f, "storage: {e}"),
        }
    }
}

impl From<StorageError> for SessionError {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

// ── Codec ─────────────────────────────────────────────────────

/// Render `state` as a session record, stamping `now` as the last-logged
/// time of day.
pub fn encode(
    state: &CalibrationState,
    now: i64,
) -> Result<heapless::String<SESSION_CAPACITY>, StorageError> {
    let mut out = heapless::String::new();
    write!(
        out,
        "{},{},{},{},{},{},{}",
        state.measurement_count,
        state.min_gas as i64,
        state.max_gas as i64,
        now,
        state.session_uptime_secs,
        (state.gas_score * FIXED_POINT) as i64,
        (state.air_quality_index * FIXED_POINT) as i64,
    )
    .map_err(|_| StorageError::TooLarge)?;
    Ok(out)
}

/// Parse a session record.
pub fn decode(bytes: &[u8]) -> Result<CalibrationState, SessionError> {
    if bytes.is_empty() {
        return Err(SessionError::Missing);
    }
    let text = core::str::from_utf8(bytes).map_err(|_| SessionError::Malformed)?;

    let mut fields = [0i64; FIELD_COUNT];
    let mut n = 0;
    for token in text.split(',') {
        if n == FIELD_COUNT {
            return Err(SessionError::Malformed);
        }
        fields[n] = token.parse().map_err(|_| SessionError::Malformed)?;
        n += 1;
    }
    if n != FIELD_COUNT {
        return Err(SessionError::Malformed);
    }

    let [count, min_gas, max_gas, last_logged, uptime, gas, index] = fields;
    Ok(CalibrationState {
        measurement_count: i32::try_from(count).map_err(|_| SessionError::Malformed)?,
        min_gas: min_gas as f32,
        max_gas: max_gas as f32,
        gas_score: gas as f32 / FIXED_POINT,
        air_quality_index: index as f32 / FIXED_POINT,
        last_logged_time_of_day: last_logged,
        session_uptime_secs: uptime,
    })
}

// ── Store access ──────────────────────────────────────────────

/// Restore the session, or start a fresh one if nothing usable is stored.
pub fn load_session<S: RetainedStore + ?Sized>(store: &S) -> CalibrationState {
    match try_load(store) {
        Ok(state) => state,
        Err(SessionError::Missing) => {
            info!("session: none stored, starting fresh");
            CalibrationState::default()
        }
        Err(e) => {
            warn!("session: {e}, starting fresh");
            CalibrationState::default()
        }
    }
}

fn try_load<S: RetainedStore + ?Sized>(store: &S) -> Result<CalibrationState, SessionError> {
    let mut buf = [0u8; SESSION_CAPACITY];
    let len = store.read(&mut buf)?;
    decode(&buf[..len.min(SESSION_CAPACITY)])
}

/// Persist the full state with `now` as the last-logged time of day.
pub fn save_session<S: RetainedStore + ?Sized>(
    store: &mut S,
    state: &CalibrationState,
    now: i64,
) -> Result<(), StorageError> {
    let record = encode(state, now)?;
    store.write(record.as_bytes())
}

// ── Timeout rule ──────────────────────────────────────────────

/// Seconds of wall clock since the last checkpoint.
///
/// Time of day only: a gap spanning midnight comes out negative.
pub fn gap_secs(state: &CalibrationState, now: i64) -> i64 {
    now - state.last_logged_time_of_day
}

/// Reset the session if more than `timeout_secs` passed since the last
/// checkpoint.  Returns `true` when it did.
pub fn apply_timeout(state: &mut CalibrationState, now: i64, timeout_secs: i64) -> bool {
    if gap_secs(state, now) > timeout_secs {
        state.reset_session();
        true
    } else {
        false
    }
}
