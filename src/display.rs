//! Status pages for the 64x48 panel.
//!
//! While a person is in front of the node the display cycles through five
//! pages, one every timer period, then switches itself off:
//!
//! ```text
//! Off ─▶ Temperature ─▶ Humidity ─▶ Pressure ─▶ Battery ─▶ AirQuality ─▶ Off
//! ```
//!
//! Each page is at most three short lines of 6x10 text.  Screens are built
//! as plain data first ([`Screen`]) and then drawn through
//! [`DisplayPort`], so the layout is testable without a panel.

use core::fmt::{self, Write as _};

use crate::app::ports::DisplayPort;
use crate::calibration::{CalibrationState, INDEX_AFTER, index::INDEX_SCALE};

/// Number of pages in one cycle.
pub const PAGE_COUNT: usize = 5;

/// Title / value / extra line positions.
const TITLE_Y: i32 = 0;
const VALUE_Y: i32 = 25;
const EXTRA_Y: i32 = 40;

const LINE_CAPACITY: usize = 16;
const MAX_LINES: usize = 3;

/// One page of the display cycle, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Page {
    Temperature = 0,
    Humidity = 1,
    Pressure = 2,
    Battery = 3,
    AirQuality = 4,
}

impl Page {
    /// Page for a cycle position.  Out-of-range positions wrap to the
    /// first page.
    pub fn from_index(index: u8) -> Self {
        match index {
            1 => Self::Humidity,
            2 => Self::Pressure,
            3 => Self::Battery,
            4 => Self::AirQuality,
            _ => Self::Temperature,
        }
    }
}

/// One positioned line of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub x: i32,
    pub y: i32,
    pub text: heapless::String<LINE_CAPACITY>,
}

/// A fully laid-out page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Screen {
    lines: heapless::Vec<Line, MAX_LINES>,
}

impl Screen {
    fn line(mut self, y: i32, args: fmt::Arguments<'_>) -> Self {
        let mut text = heapless::String::new();
        // A fragment that would overflow the line is dropped whole, so the
        // line keeps whatever was written before it.  Every page fits.
        let _ = text.write_fmt(args);
        let _ = self.lines.push(Line { x: 0, y, text });
        self
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Clear the frame, draw every line, and flush to the panel.
    pub fn draw<D: DisplayPort + ?Sized>(&self, display: &mut D) {
        display.clear();
        for line in &self.lines {
            display.text(line.x, line.y, &line.text);
        }
        display.show();
    }
}

pub fn temperature_screen(temperature_c: f32) -> Screen {
    Screen::default()
        .line(TITLE_Y, format_args!("Temp"))
        .line(VALUE_Y, format_args!("{temperature_c:.2}'C"))
}

pub fn humidity_screen(humidity_pct: f32) -> Screen {
    Screen::default()
        .line(TITLE_Y, format_args!("Humidity"))
        .line(VALUE_Y, format_args!("{humidity_pct:.2}%"))
}

pub fn pressure_screen(pressure_hpa: f32) -> Screen {
    Screen::default()
        .line(TITLE_Y, format_args!("Pressure"))
        .line(VALUE_Y, format_args!("{pressure_hpa:.0}hPa"))
}

pub fn battery_screen(percent: u8, low: bool) -> Screen {
    let screen = Screen::default()
        .line(TITLE_Y, format_args!("Battery"))
        .line(VALUE_Y, format_args!("{percent}%"));
    if low {
        screen.line(EXTRA_Y, format_args!("Low!"))
    } else {
        screen
    }
}

/// Index page, or a warm-up countdown while the index is not valid yet.
///
/// The index is valid once the count passes [`INDEX_AFTER`]; the countdown
/// assumes one sample per `sample_period_secs` of active time until then
/// and never goes below zero.
pub fn air_quality_screen(state: &CalibrationState, sample_period_secs: i64) -> Screen {
    if state.measurement_count <= INDEX_AFTER {
        let samples_left = i64::from(INDEX_AFTER + 1 - state.measurement_count);
        let remaining = (sample_period_secs * samples_left - state.session_uptime_secs).max(0);
        return Screen::default()
            .line(0, format_args!("Warming"))
            .line(20, format_args!("up"))
            .line(40, format_args!("{remaining}s"));
    }
    let index = state.air_quality_index;
    let percent = 100.0 * index / INDEX_SCALE;
    Screen::default()
        .line(TITLE_Y, format_args!("IAQ"))
        .line(VALUE_Y, format_args!("{percent:.2}%"))
        .line(EXTRA_Y, format_args!("{index:.0}"))
}
