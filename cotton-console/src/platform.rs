use core::fmt;

/// Parity setting of a serial line
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone, PartialEq, Eq)]
pub enum Parity {
    /// No parity bit
    None,
    /// Even parity
    Even,
    /// Odd parity
    Odd,
}

/// Number of stop bits on a serial line
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone, PartialEq, Eq)]
pub enum StopBits {
    /// One stop bit
    One,
    /// Two stop bits
    Two,
}

/// Line settings passed to [`SerialPort::begin`]
///
/// USB CDC ports ignore most of this (the bytes travel in USB packets
/// either way) but terminal programs still ask for it, so it is kept
/// and reported in the boot banner.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct SerialConfig {
    /// Bits per second
    pub baud: u32,
    /// Data bits per character (usually 8)
    pub data_bits: u8,
    /// Parity bit setting
    pub parity: Parity,
    /// Stop bit setting
    pub stop_bits: StopBits,
}

impl SerialConfig {
    /// A configuration for the given rate, with 8N1 framing
    pub const fn new(baud: u32) -> Self {
        Self {
            baud,
            data_bits: 8,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self::new(9600)
    }
}

/// Renders the framing in the usual shorthand, e.g. "8N1"
impl fmt::Display for SerialConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parity = match self.parity {
            Parity::None => 'N',
            Parity::Even => 'E',
            Parity::Odd => 'O',
        };
        let stop = match self.stop_bits {
            StopBits::One => 1,
            StopBits::Two => 2,
        };
        write!(f, "{}{}{}", self.data_bits, parity, stop)
    }
}

/// A line-oriented text output channel, such as USB CDC serial
///
/// Text is written through the `core::fmt::Write` supertrait, so
/// `write!` and `writeln!` work directly on any `SerialPort`.
pub trait SerialPort: fmt::Write {
    /// Open the port with the given line settings
    fn begin(&mut self, config: &SerialConfig);

    /// Has a terminal on the far end opened the port?
    ///
    /// For USB CDC this is the host's DTR signal.
    fn is_connected(&self) -> bool;

    /// Can the port accept output right now?
    fn is_ready(&self) -> bool;
}

/// A monotonic millisecond counter, starting at boot
pub trait Uptime {
    /// Milliseconds since the device started
    fn millis(&self) -> u64;
}

impl<T: Uptime + ?Sized> Uptime for &T {
    fn millis(&self) -> u64 {
        (**self).millis()
    }
}

#[cfg(all(test, feature = "std"))]
#[path = "tests/platform.rs"]
mod tests;
