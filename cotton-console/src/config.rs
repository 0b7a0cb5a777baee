use crate::log::Level;
use crate::platform::SerialConfig;

/// Serial rate; 9600 is what every terminal program defaults to
pub const SERIAL_BAUD: u32 = 9600;

/// Longest wait for a terminal to attach at boot
pub const CONNECT_TIMEOUT_MS: u32 = 3000;

/// How often to check for the terminal during that wait
pub const CONNECT_POLL_MS: u32 = 50;

/// Sleep per iteration of the idle loop
pub const IDLE_PERIOD_MS: u32 = 50;

/// The name the echo function is registered under
pub const FUNCTION_NAME: &str = "printMsg";

/// Everything the console setup needs to know
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Line settings for the serial port
    pub serial: SerialConfig,
    /// Longest wait for a terminal at boot; boot carries on regardless
    pub connect_timeout_ms: u32,
    /// Poll interval during the wait for a terminal
    pub connect_poll_ms: u32,
    /// Sleep per iteration of the idle loop
    pub idle_period_ms: u32,
    /// Name under which the echo function is registered
    pub function_name: &'static str,
    /// Least severe diagnostic log entries shown
    pub log_level: Level,
}

impl ConsoleConfig {
    /// The standard settings
    pub const fn new() -> Self {
        Self {
            serial: SerialConfig::new(SERIAL_BAUD),
            connect_timeout_ms: CONNECT_TIMEOUT_MS,
            connect_poll_ms: CONNECT_POLL_MS,
            idle_period_ms: IDLE_PERIOD_MS,
            function_name: FUNCTION_NAME,
            log_level: Level::Info,
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self::new()
    }
}
