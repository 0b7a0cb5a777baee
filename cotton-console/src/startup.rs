//! The boot sequence is, in order:
//!
//!  1. [`open`] the serial port;
//!  2. [`wait_for_terminal`], but not for long;
//!  3. register the echo function (see
//!     [`FunctionRegistry::register`](crate::FunctionRegistry::register));
//!  4. [`announce`] that it's all ready.
//!
//! Step 3 hands the handler, and with it the handler's serial port,
//! over to the registry for good; so step 4 needs a serial port of its
//! own (on a device, typically another handle onto the same port).

use crate::config::ConsoleConfig;
use crate::debug;
use crate::log::DiagnosticLog;
use crate::platform::{SerialPort, Uptime};
use core::fmt;
use embedded_hal::delay::DelayNs;

/// Open the serial port with the configured line settings
pub fn open<S: SerialPort>(serial: &mut S, config: &ConsoleConfig) {
    serial.begin(&config.serial);
}

/// Give a terminal a chance to attach, so it doesn't miss the banner
///
/// Polls the port every `connect_poll_ms` until either it reports a
/// connection or `connect_timeout_ms` have passed. Never blocks
/// indefinitely: with nobody listening, boot just carries on (and
/// background work keeps running, if `delay` is a
/// [`CooperativeDelay`](crate::CooperativeDelay)).
///
/// Returns whether a terminal attached.
pub fn wait_for_terminal<S: SerialPort, U: Uptime, D: DelayNs>(
    serial: &S,
    uptime: &U,
    delay: &mut D,
    config: &ConsoleConfig,
) -> bool {
    let start = uptime.millis();
    while !serial.is_connected() {
        let waited = uptime.millis().wrapping_sub(start);
        if waited >= u64::from(config.connect_timeout_ms) {
            debug::println!("no terminal after {} ms", config.connect_timeout_ms);
            return false;
        }
        delay.delay_ms(config.connect_poll_ms);
    }
    true
}

/// Write the boot banner
pub fn write_banner<W: fmt::Write>(
    out: &mut W,
    config: &ConsoleConfig,
) -> fmt::Result {
    write!(out, "\r\n")?;
    write!(out, "=== Particle Serial Console Basics ===\r\n")?;
    write!(
        out,
        "Baud: {}  |  Data: {}\r\n",
        config.serial.baud, config.serial
    )?;
    write!(
        out,
        "Use 'particle serial monitor --follow' to view output.\r\n"
    )?;
    write!(
        out,
        "Cloud function available: {}(<optional text>)\r\n",
        config.function_name
    )?;
    write!(out, "--------------------------------------\r\n")?;
    write!(out, "\r\n")
}

/// Print the banner and log that setup is complete
///
/// The log entry is made even if the banner couldn't be written.
pub fn announce<S: SerialPort, L: DiagnosticLog>(
    serial: &mut S,
    log: &mut L,
    config: &ConsoleConfig,
) -> fmt::Result {
    let result = write_banner(serial, config);
    log.info(format_args!(
        "Setup complete. Cloud function '{}' is ready.",
        config.function_name
    ));
    result
}

#[cfg(all(test, feature = "std"))]
#[path = "tests/startup.rs"]
mod tests;
