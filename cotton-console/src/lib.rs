//! A USB serial console with one remotely-invokable echo function
//!
//! The cotton-console crate contains everything a "serial console
//! basics" firmware needs, apart from the hardware itself: a cloud
//! function ([`EchoHandler`]) which prints a timestamped message to the
//! serial port whenever it is invoked, a small registry through which
//! such functions are looked up by name and called
//! ([`FunctionRegistry`]), the boot-time setup (opening the port,
//! waiting a bounded time for a terminal, printing a banner), and an
//! idle loop which keeps yielding time to background work.
//!
//! The hardware-facing parts -- the serial port, the uptime counter,
//! the diagnostic log, and delays -- are all traits
//! ([`SerialPort`], [`Uptime`], [`DiagnosticLog`], and
//! `embedded_hal::delay::DelayNs`), so the same logic runs on a
//! microcontroller (see `cross/rp2040` in this repository), on a host
//! PC (see the `console-host` example), and under test.
//!
//! ```
//! # use cotton_console::*;
//! # struct Port(bool, String);
//! # impl core::fmt::Write for Port {
//! #     fn write_str(&mut self, s: &str) -> core::fmt::Result {
//! #         self.1.push_str(s);
//! #         Ok(())
//! #     }
//! # }
//! # impl SerialPort for Port {
//! #     fn begin(&mut self, _: &SerialConfig) { self.0 = true; }
//! #     fn is_connected(&self) -> bool { self.0 }
//! #     fn is_ready(&self) -> bool { self.0 }
//! # }
//! # struct Boot;
//! # impl Uptime for Boot { fn millis(&self) -> u64 { 1234 } }
//! let mut port = Port(false, String::new());
//! port.begin(&SerialConfig::new(9600));
//! let mut handler = EchoHandler::new(port, Boot, NoLog);
//! assert_eq!(handler.invoke("Hello Tachyon"), Status::Success);
//! assert_eq!(handler.serial().1, "[1234 ms] Cloud says: Hello Tachyon\r\n");
//! ```
#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod debug;

/// Compile-time settings for the console
pub mod config;
pub use config::ConsoleConfig;

/// The echo cloud function itself
pub mod handler;
pub use handler::{EchoHandler, Error, Status};

/// Idle loop and cooperative sleeping
pub mod idle;
pub use idle::{Background, CooperativeDelay, Idle};

/// Assembling and parsing invocations received as text lines
pub mod invocation;
pub use invocation::{LineBuffer, Request};

/// Diagnostic log channel
pub mod log;
pub use log::{DiagnosticLog, Level, LevelFilter, NoLog};

/// Messages printed by the echo function
pub mod message;
pub use message::Message;

/// Traits standing in for the platform's serial port and clock
pub mod platform;
pub use platform::{Parity, SerialConfig, SerialPort, StopBits, Uptime};

/// Registering cloud functions and dispatching calls to them
pub mod registry;
pub use registry::{CloudFunction, FunctionRegistry, RegistryError};

/// Boot-time bring-up of the serial console
pub mod startup;

#[cfg(feature = "std")]
pub mod mocks;
