#[cfg(feature = "arm")]
mod device_test;

#[cfg(feature = "rp2040")]
mod rp2040;
