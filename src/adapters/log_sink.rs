//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART in production), one line per
//! event with a fixed tag for easy grepping.

use log::{info, warn};

use crate::app::events::{AppEvent, WarningCause};
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Resumed {
                measurement_count,
                session_uptime_secs,
                gap_secs,
            } => {
                info!(
                    "WAKE | resumed | count={} uptime={}s gap={}s",
                    measurement_count, session_uptime_secs, gap_secs
                );
            }
            AppEvent::SessionReset { gap_secs } => {
                info!("WAKE | session reset | gap={}s", gap_secs);
            }
            AppEvent::Sampled(s) => {
                info!(
                    "SAMPLE | #{} | gas={:.0}\u{03a9} [{:.0}, {:.0}] | score={:.2} | iaq={:.1}",
                    s.measurement_count, s.gas_ohm, s.min_gas, s.max_gas, s.gas_score, s.air_quality_index,
                );
            }
            AppEvent::DisplayOn => info!("DISPLAY | on"),
            AppEvent::PageShown(page) => info!("DISPLAY | page={:?}", page),
            AppEvent::DisplayOff => info!("DISPLAY | off"),
            AppEvent::Warning(cause) => match cause {
                WarningCause::PoorAirQuality => warn!("ALERT | poor air quality"),
                WarningCause::LowBattery => warn!("ALERT | low battery"),
            },
            AppEvent::Sleeping {
                duration_ms,
                fast_path,
            } => {
                info!(
                    "SLEEP | {}ms{}",
                    duration_ms,
                    if *fast_path { " (fast path)" } else { "" }
                );
            }
        }
    }
}
