//! Mock adapters for integration tests.
//!
//! Records every board call so tests can assert on the full command
//! history without touching real GPIO/PWM/I²C.

use std::cell::Cell;
use std::collections::VecDeque;

use airnode::app::events::AppEvent;
use airnode::app::ports::{
    ActuatorPort, AnalogPort, ClockPort, DisplayPort, DisplayTimer, EventSink, LedDuty,
    RetainedStore, SensorPort, StorageError, TimeOfDay,
};
use airnode::sensors::SensorReading;
use embedded_hal::delay::DelayNs;

// ── Board call record ─────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum BoardCall {
    SetLed(LedDuty),
    EnableBuzzer(u32),
    SetBuzzer(u16),
    DisableBuzzer,
    Clear,
    Text(i32, i32, String),
    Show,
    PowerOn,
    PowerOff,
    TimerStart(u32),
    TimerStop,
}

// ── MockBoard ─────────────────────────────────────────────────

pub struct MockBoard {
    pub calls: Vec<BoardCall>,
    /// Served front to back; the last one repeats once the queue drains.
    readings: VecDeque<SensorReading>,
    last: SensorReading,
    /// Value returned for every ADC conversion.
    pub adc_uv: u32,
    pub reads: usize,
}

#[allow(dead_code)]
impl MockBoard {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            readings: VecDeque::new(),
            last: reading(5000.0),
            // 3.5 V battery behind the 1:2 divider.
            adc_uv: 1_750_000,
            reads: 0,
        }
    }

    pub fn with_readings(readings: impl IntoIterator<Item = SensorReading>) -> Self {
        let mut board = Self::new();
        board.readings.extend(readings);
        board
    }

    pub fn push_reading(&mut self, r: SensorReading) {
        self.readings.push_back(r);
    }

    /// Text lines drawn since the last `Clear`.
    pub fn screen(&self) -> Vec<String> {
        let start = self
            .calls
            .iter()
            .rposition(|c| *c == BoardCall::Clear)
            .map_or(0, |i| i + 1);
        self.calls[start..]
            .iter()
            .filter_map(|c| match c {
                BoardCall::Text(_, _, t) => Some(t.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn led(&self) -> LedDuty {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                BoardCall::SetLed(d) => Some(*d),
                _ => None,
            })
            .unwrap_or(LedDuty::OFF)
    }

    pub fn buzzer_enabled(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                BoardCall::EnableBuzzer(_) => Some(true),
                BoardCall::DisableBuzzer => Some(false),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn count(&self, call: &BoardCall) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }

    pub fn buzzer_pulses(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, BoardCall::SetBuzzer(d) if *d > 0))
            .count()
    }
}

impl Default for MockBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockBoard {
    fn read(&mut self) -> SensorReading {
        self.reads += 1;
        if let Some(r) = self.readings.pop_front() {
            self.last = r;
        }
        self.last
    }
}

impl AnalogPort for MockBoard {
    fn read_microvolts(&mut self) -> u32 {
        self.adc_uv
    }
}

impl ActuatorPort for MockBoard {
    fn set_led(&mut self, duty: LedDuty) {
        self.calls.push(BoardCall::SetLed(duty));
    }

    fn enable_buzzer(&mut self, freq_hz: u32) {
        self.calls.push(BoardCall::EnableBuzzer(freq_hz));
    }

    fn set_buzzer(&mut self, duty: u16) {
        self.calls.push(BoardCall::SetBuzzer(duty));
    }

    fn disable_buzzer(&mut self) {
        self.calls.push(BoardCall::DisableBuzzer);
    }
}

impl DisplayPort for MockBoard {
    fn clear(&mut self) {
        self.calls.push(BoardCall::Clear);
    }

    fn text(&mut self, x: i32, y: i32, text: &str) {
        self.calls.push(BoardCall::Text(x, y, text.to_owned()));
    }

    fn show(&mut self) {
        self.calls.push(BoardCall::Show);
    }

    fn power_on(&mut self) {
        self.calls.push(BoardCall::PowerOn);
    }

    fn power_off(&mut self) {
        self.calls.push(BoardCall::PowerOff);
    }
}

impl DisplayTimer for MockBoard {
    fn start(&mut self, period_ms: u32) {
        self.calls.push(BoardCall::TimerStart(period_ms));
    }

    fn stop(&mut self) {
        self.calls.push(BoardCall::TimerStop);
    }
}

/// A reading at the comfort midpoints, so only gas moves the index.
pub fn reading(gas_ohm: f32) -> SensorReading {
    SensorReading {
        temperature_c: 23.0,
        humidity_pct: 45.0,
        pressure_hpa: 1013.0,
        gas_ohm,
    }
}

// ── MockClock ─────────────────────────────────────────────────

#[derive(Default)]
pub struct MockClock {
    secs: Cell<i64>,
}

#[allow(dead_code)]
impl MockClock {
    pub fn at(secs: i64) -> Self {
        Self {
            secs: Cell::new(secs),
        }
    }

    pub fn set(&self, secs: i64) {
        self.secs.set(secs);
    }

    pub fn advance(&self, secs: i64) {
        self.secs.set(self.secs.get() + secs);
    }

    pub fn now(&self) -> i64 {
        self.secs.get()
    }
}

impl ClockPort for MockClock {
    fn time_of_day(&self) -> TimeOfDay {
        let s = self.secs.get().rem_euclid(86_400);
        TimeOfDay {
            hours: (s / 3600) as u8,
            minutes: (s / 60 % 60) as u8,
            seconds: (s % 60) as u8,
        }
    }
}

// ── MockStore ─────────────────────────────────────────────────

/// Retained memory backed by a `Vec`.
#[derive(Default)]
pub struct MockStore {
    pub blob: Vec<u8>,
    pub fail_writes: bool,
}

#[allow(dead_code)]
impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(record: &str) -> Self {
        Self {
            blob: record.as_bytes().to_vec(),
            fail_writes: false,
        }
    }

    pub fn record(&self) -> &str {
        core::str::from_utf8(&self.blob).unwrap_or("<binary>")
    }
}

impl RetainedStore for MockStore {
    fn read(&self, buf: &mut [u8]) -> Result<usize, StorageError> {
        let n = self.blob.len().min(buf.len());
        buf[..n].copy_from_slice(&self.blob[..n]);
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Io);
        }
        self.blob = data.to_vec();
        Ok(())
    }
}

// ── Delay / sink ──────────────────────────────────────────────

/// Returns immediately; remembers how long the caller wanted to wait.
#[derive(Default)]
pub struct NoopDelay {
    pub total_ns: u64,
}

#[allow(dead_code)]
impl NoopDelay {
    pub fn total_ms(&self) -> u64 {
        self.total_ns / 1_000_000
    }
}

impl DelayNs for NoopDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}

/// Collects every emitted event.
#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
