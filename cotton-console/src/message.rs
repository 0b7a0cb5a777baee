use core::fmt;

/// Printed when the echo function is called with no argument
pub const DEFAULT_GREETING: &str = "Hello from Particle! (default message)";

/// Prefixed to the caller's argument
pub const CLOUD_LABEL: &str = "Cloud says: ";

/// The body of one line printed by the echo function
///
/// Borrows the caller's argument rather than copying it, so it can be
/// built and printed without any heap.
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone, PartialEq, Eq)]
pub enum Message<'a> {
    /// No argument was given (an empty argument counts as none)
    Default,
    /// The caller's text, verbatim
    Cloud(&'a str),
}

impl<'a> Message<'a> {
    /// Choose the message for an invocation argument
    pub fn for_argument(argument: &'a str) -> Self {
        if argument.is_empty() {
            Message::Default
        } else {
            Message::Cloud(argument)
        }
    }
}

impl fmt::Display for Message<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Default => f.write_str(DEFAULT_GREETING),
            Message::Cloud(text) => {
                f.write_str(CLOUD_LABEL)?;
                f.write_str(text)
            }
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Message<'_> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Message::Default => defmt::write!(f, "{=str}", DEFAULT_GREETING),
            Message::Cloud(text) => {
                defmt::write!(f, "{=str}{=str}", CLOUD_LABEL, text)
            }
        }
    }
}

#[cfg(all(test, feature = "std"))]
#[path = "tests/message.rs"]
mod tests;
