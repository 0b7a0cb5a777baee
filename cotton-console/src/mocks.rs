//! Mock and fake implementations of the platform traits, for testing
//!
//! The mockall mocks are for checking exactly which calls get made (or,
//! often, that some call *doesn't* get made); the hand-written fakes are
//! for checking what ends up on the serial port or in the log.
use crate::log::Level;
use crate::platform::SerialConfig;
use mockall::mock;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

mock! {
    pub SerialPort {}

    impl fmt::Write for SerialPort {
        fn write_str(&mut self, s: &str) -> fmt::Result;
    }

    impl crate::platform::SerialPort for SerialPort {
        fn begin(&mut self, config: &SerialConfig);
        fn is_connected(&self) -> bool;
        fn is_ready(&self) -> bool;
    }
}

mock! {
    pub Uptime {}

    impl crate::platform::Uptime for Uptime {
        fn millis(&self) -> u64;
    }
}

mock! {
    pub CloudFunction {}

    impl crate::registry::CloudFunction for CloudFunction {
        fn call(&mut self, argument: &str) -> i32;
    }
}

mock! {
    pub Background {}

    impl crate::idle::Background for Background {
        fn process(&mut self);
    }
}

mock! {
    pub Delay {}

    impl embedded_hal::delay::DelayNs for Delay {
        fn delay_ns(&mut self, ns: u32);
    }
}

/// A serial port which records everything written to it
///
/// Clones share the same recording, so one clone can be handed to the
/// code under test while the test keeps another to look at.
#[derive(Clone, Default)]
pub struct CaptureSerial {
    output: Rc<RefCell<String>>,
    ready: Rc<Cell<bool>>,
    connected: Rc<Cell<bool>>,
    config: Rc<Cell<Option<SerialConfig>>>,
}

impl CaptureSerial {
    /// A port which is open, ready, and has a terminal attached
    pub fn ready() -> Self {
        let s = Self::default();
        s.set_ready(true);
        s.set_connected(true);
        s
    }

    /// Change what `is_ready` reports
    pub fn set_ready(&self, ready: bool) {
        self.ready.set(ready);
    }

    /// Change what `is_connected` reports
    pub fn set_connected(&self, connected: bool) {
        self.connected.set(connected);
    }

    /// Everything written so far
    pub fn output(&self) -> String {
        self.output.borrow().clone()
    }

    /// Everything written so far, split into CRLF-terminated lines
    pub fn lines(&self) -> Vec<String> {
        self.output
            .borrow()
            .split_terminator("\r\n")
            .map(str::to_string)
            .collect()
    }

    /// The settings passed to the most recent `begin`, if any
    pub fn config(&self) -> Option<SerialConfig> {
        self.config.get()
    }
}

impl fmt::Write for CaptureSerial {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.output.borrow_mut().push_str(s);
        Ok(())
    }
}

impl crate::platform::SerialPort for CaptureSerial {
    fn begin(&mut self, config: &SerialConfig) {
        self.config.set(Some(*config));
    }

    fn is_connected(&self) -> bool {
        self.connected.get()
    }

    fn is_ready(&self) -> bool {
        self.ready.get()
    }
}

/// A diagnostic log which records every entry
#[derive(Debug, Default)]
pub struct RecordingLog {
    /// The entries, oldest first
    pub entries: Vec<(Level, String)>,
}

impl RecordingLog {
    /// The entries at exactly this level
    pub fn at(&self, level: Level) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, s)| s.as_str())
            .collect()
    }
}

impl crate::log::DiagnosticLog for RecordingLog {
    fn log(&mut self, level: Level, args: fmt::Arguments<'_>) {
        self.entries.push((level, args.to_string()));
    }
}

/// A clock which only moves when something delays on it
///
/// Implements both `Uptime` and `DelayNs`; clones share the same time.
#[derive(Clone, Default)]
pub struct ManualClock {
    now_ns: Rc<Cell<u64>>,
}

impl ManualClock {
    /// A clock starting at `ms` milliseconds of uptime
    pub fn at(ms: u64) -> Self {
        let c = Self::default();
        c.now_ns.set(ms * 1_000_000);
        c
    }

    /// Move the clock on
    pub fn advance_ms(&self, ms: u64) {
        self.now_ns.set(self.now_ns.get() + ms * 1_000_000);
    }
}

impl crate::platform::Uptime for ManualClock {
    fn millis(&self) -> u64 {
        self.now_ns.get() / 1_000_000
    }
}

impl embedded_hal::delay::DelayNs for ManualClock {
    fn delay_ns(&mut self, ns: u32) {
        self.now_ns.set(self.now_ns.get() + u64::from(ns));
    }
}
