use crate::log::DiagnosticLog;
use crate::message::Message;
use crate::platform::{SerialPort, Uptime};
use crate::registry::CloudFunction;

/// Result of a cloud function call, as seen by the remote caller
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone, PartialEq, Eq)]
#[repr(i32)]
pub enum Status {
    /// The message was printed
    Success = 1,
    /// The message was not printed
    Failure = -1,
}

impl From<Status> for i32 {
    fn from(status: Status) -> i32 {
        status as i32
    }
}

/// Errors which can arise when printing a message
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The serial port wasn't ready (e.g. nobody has opened it)
    TransportUnavailable,
}

/// The echo cloud function
///
/// Each call prints one timestamped line to the serial port, for
/// instance `[12345 ms] Cloud says: Hello Tachyon`, and mirrors the
/// message to the diagnostic log. An empty argument prints a default
/// greeting instead.
///
/// The serial port, uptime counter and log are all handed in at
/// construction, and owned by the handler from then on; register the
/// handler with a [`FunctionRegistry`](crate::FunctionRegistry) to make
/// it callable by name.
pub struct EchoHandler<S: SerialPort, U: Uptime, L: DiagnosticLog> {
    serial: S,
    uptime: U,
    log: L,
}

impl<S: SerialPort, U: Uptime, L: DiagnosticLog> EchoHandler<S, U, L> {
    /// Create a new handler around its three collaborators
    pub fn new(serial: S, uptime: U, log: L) -> Self {
        Self {
            serial,
            uptime,
            log,
        }
    }

    /// Print the message for `argument`, returning the status for the caller
    pub fn invoke(&mut self, argument: &str) -> Status {
        match self.try_invoke(argument) {
            Ok(_) => Status::Success,
            Err(Error::TransportUnavailable) => Status::Failure,
        }
    }

    /// Print the message for `argument`, returning the message printed
    ///
    /// Nothing at all is written to the serial port if it isn't
    /// ready; a warning goes to the diagnostic log instead.
    pub fn try_invoke<'a>(
        &mut self,
        argument: &'a str,
    ) -> Result<Message<'a>, Error> {
        if !self.serial.is_ready() {
            self.log.warn(format_args!(
                "Serial not available; message not printed."
            ));
            return Err(Error::TransportUnavailable);
        }

        let msg = Message::for_argument(argument);

        // A failed write after the port said it was ready isn't
        // reported to the caller; the line is simply lost.
        let _ = write!(
            self.serial,
            "[{} ms] {}\r\n",
            self.uptime.millis(),
            msg
        );

        self.log.info(format_args!("Printed to Serial: {msg}"));
        Ok(msg)
    }

    /// The serial port
    pub fn serial(&self) -> &S {
        &self.serial
    }

    /// The serial port, for writing things other than messages (e.g. a
    /// banner)
    pub fn serial_mut(&mut self) -> &mut S {
        &mut self.serial
    }

    /// The diagnostic log
    pub fn log_mut(&mut self) -> &mut L {
        &mut self.log
    }

    /// Take the handler apart again
    pub fn into_parts(self) -> (S, U, L) {
        (self.serial, self.uptime, self.log)
    }
}

impl<S: SerialPort, U: Uptime, L: DiagnosticLog> CloudFunction
    for EchoHandler<S, U, L>
{
    fn call(&mut self, argument: &str) -> i32 {
        self.invoke(argument).into()
    }
}

#[cfg(all(test, feature = "std"))]
#[path = "tests/handler.rs"]
mod tests;
