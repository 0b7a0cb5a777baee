// Internal tracing for the console crate itself (as opposed to the
// application's DiagnosticLog):
//
// feature=defmt and os=none? use defmt
//   feature=std? use std
//     neither? use nothing

#[cfg(feature = "std")]
extern crate std;

#[cfg(feature = "std")]
pub use std::println;

#[cfg(all(target_os = "none", feature = "defmt", not(feature = "std")))]
pub use defmt::debug as println;

#[cfg(all(
    not(feature = "std"),
    not(all(target_os = "none", feature = "defmt"))
))]
#[doc(hidden)]
#[macro_export]
macro_rules! console_println {
    ($fmt:expr) => {};
    ($fmt:expr, $($arg:tt)*) => {};
}

#[cfg(all(
    not(feature = "std"),
    not(all(target_os = "none", feature = "defmt"))
))]
pub(crate) use crate::console_println as println;
