use core::fmt;

/// Severity of a diagnostic log entry
///
/// Ordered: `Trace < Info < Warn < Error`.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// Chatty detail
    Trace,
    /// Normal operation
    Info,
    /// Something didn't happen that should have
    Warn,
    /// Something went wrong
    Error,
}

impl Level {
    /// The upper-case name used in log lines, e.g. "WARN"
    pub const fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The diagnostic log channel
///
/// This is separate from the serial port proper: on a device it is
/// whatever the logging transport is (defmt over RTT, say), and it
/// mirrors, rather than replaces, what gets printed to serial.
pub trait DiagnosticLog {
    /// Record one entry
    fn log(&mut self, level: Level, args: fmt::Arguments<'_>);

    /// Record an informational entry
    fn info(&mut self, args: fmt::Arguments<'_>) {
        self.log(Level::Info, args);
    }

    /// Record a warning
    fn warn(&mut self, args: fmt::Arguments<'_>) {
        self.log(Level::Warn, args);
    }
}

impl<T: DiagnosticLog + ?Sized> DiagnosticLog for &mut T {
    fn log(&mut self, level: Level, args: fmt::Arguments<'_>) {
        (**self).log(level, args);
    }
}

/// A log which discards everything
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Default, Copy, Clone)]
pub struct NoLog;

impl DiagnosticLog for NoLog {
    fn log(&mut self, _level: Level, _args: fmt::Arguments<'_>) {}
}

/// A log which passes on only entries at or above a minimum level
pub struct LevelFilter<L: DiagnosticLog> {
    inner: L,
    min: Level,
}

impl<L: DiagnosticLog> LevelFilter<L> {
    /// Wrap `inner`, dropping anything less severe than `min`
    pub fn new(inner: L, min: Level) -> Self {
        Self { inner, min }
    }

    /// The minimum level passed on
    pub fn level(&self) -> Level {
        self.min
    }

    /// Recover the wrapped log
    pub fn into_inner(self) -> L {
        self.inner
    }
}

impl<L: DiagnosticLog> DiagnosticLog for LevelFilter<L> {
    fn log(&mut self, level: Level, args: fmt::Arguments<'_>) {
        if level >= self.min {
            self.inner.log(level, args);
        }
    }
}

/// Diagnostic log over defmt
///
/// The entries are formatted on the device (defmt usually defers
/// formatting to the host) because the arguments are already a
/// `core::fmt::Arguments`.
#[cfg(feature = "defmt")]
#[derive(Default, Copy, Clone)]
pub struct DefmtLog;

#[cfg(feature = "defmt")]
impl DiagnosticLog for DefmtLog {
    fn log(&mut self, level: Level, args: fmt::Arguments<'_>) {
        let args = defmt::Display2Format(&args);
        match level {
            Level::Trace => defmt::trace!("[app] {}", args),
            Level::Info => defmt::info!("[app] {}", args),
            Level::Warn => defmt::warn!("[app] {}", args),
            Level::Error => defmt::error!("[app] {}", args),
        }
    }
}

/// Diagnostic log on the host's standard error
///
/// Lines look like `[app] INFO: Setup complete.`, which is how device
/// logs appear in a serial monitor.
#[cfg(feature = "std")]
#[derive(Debug, Default, Copy, Clone)]
pub struct StdLog;

#[cfg(feature = "std")]
impl DiagnosticLog for StdLog {
    fn log(&mut self, level: Level, args: fmt::Arguments<'_>) {
        std::eprintln!("[app] {level}: {args}");
    }
}

#[cfg(all(test, feature = "std"))]
#[path = "tests/log.rs"]
mod tests;
