//! Fuzz target: session record decoder
//!
//! Retained memory survives deep sleep but not brown-outs, so the first
//! wake after a bad reset can see anything.  Verifies:
//! - `decode` never panics on arbitrary bytes
//! - a record that decodes re-encodes without overflowing the retained
//!   region, and decodes again to the same integer fields
//!
//! cargo fuzz run fuzz_session_decode

#![no_main]

use airnode::session::{self, SESSION_CAPACITY};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(state) = session::decode(data) else {
        return;
    };

    let now = state.last_logged_time_of_day;
    let Ok(record) = session::encode(&state, now) else {
        // Seven i64 fields can exceed the region; the node then keeps
        // running on the previous checkpoint.
        return;
    };
    assert!(record.len() <= SESSION_CAPACITY);

    let again = session::decode(record.as_bytes()).expect("own record must decode");
    assert_eq!(again.measurement_count, state.measurement_count);
    assert_eq!(again.last_logged_time_of_day, now);
    assert_eq!(again.session_uptime_secs, state.session_uptime_secs);
});
