/// One function call, as parsed from a line of text
///
/// The line `printMsg Hello Tachyon` calls `printMsg` with the argument
/// `Hello Tachyon`. Everything after the first space is the argument,
/// verbatim (including any further spaces); a line with no space calls
/// the function with an empty argument.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Request<'a> {
    /// The function to call
    pub name: &'a str,
    /// Its argument (possibly empty)
    pub argument: &'a str,
}

impl<'a> Request<'a> {
    /// Parse a line (without its terminator) into a request
    ///
    /// Returns `None` for lines with no function name.
    pub fn parse(line: &'a str) -> Option<Self> {
        let (name, argument) = line.split_once(' ').unwrap_or((line, ""));
        if name.is_empty() {
            return None;
        }
        Some(Self { name, argument })
    }

    /// Parse a line which may still end in a stray carriage return
    ///
    /// Only that one `\r` is removed; any other trailing whitespace is
    /// part of the argument.
    pub fn parse_line(line: &'a str) -> Option<Self> {
        Self::parse(line.strip_suffix('\r').unwrap_or(line))
    }
}

/// Accumulates bytes from a serial port into complete lines
///
/// Either CR or LF ends a line (so CRLF just yields one line and an
/// ignored empty one). Lines longer than `N` bytes are discarded in
/// their entirety, as are lines which aren't valid UTF-8.
pub struct LineBuffer<const N: usize> {
    buffer: [u8; N],
    len: usize,
    overflowed: bool,
    complete: bool,
}

impl<const N: usize> Default for LineBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> LineBuffer<N> {
    /// Create a new, empty buffer
    pub const fn new() -> Self {
        Self {
            buffer: [0u8; N],
            len: 0,
            overflowed: false,
            complete: false,
        }
    }

    /// Add one byte; returns the line if this byte completed one
    pub fn feed(&mut self, byte: u8) -> Option<&str> {
        if self.complete {
            self.len = 0;
            self.complete = false;
        }

        match byte {
            b'\r' | b'\n' => {
                if self.overflowed {
                    self.overflowed = false;
                    self.len = 0;
                    return None;
                }
                if self.len == 0 {
                    return None;
                }
                self.complete = true;
                core::str::from_utf8(&self.buffer[..self.len]).ok()
            }
            _ => {
                if self.overflowed {
                    return None;
                }
                if self.len == N {
                    self.overflowed = true;
                    return None;
                }
                self.buffer[self.len] = byte;
                self.len += 1;
                None
            }
        }
    }

    /// Discard any partial line
    pub fn clear(&mut self) {
        self.len = 0;
        self.overflowed = false;
        self.complete = false;
    }

    /// Bytes held towards the next line
    pub fn pending(&self) -> usize {
        if self.complete {
            0
        } else {
            self.len
        }
    }
}

#[cfg(all(test, feature = "std"))]
#[path = "tests/invocation.rs"]
mod tests;
