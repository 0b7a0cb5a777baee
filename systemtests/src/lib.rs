//! Host-side helpers for testing cotton-console firmware on real boards
//!
//! The firmware itself is flashed and its defmt output watched by
//! `probe-rs` (see `tests/device`); this crate talks to the other end
//! of the board's USB serial port, just as a terminal program would.
#[cfg(feature = "arm")]
mod console_port;

#[cfg(feature = "arm")]
pub use console_port::ConsolePort;
