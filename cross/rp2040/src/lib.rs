//! RP2040 (Raspberry Pi Pico) glue for cotton-console
//!
//! The Pico's own USB port is the serial port: a CDC-ACM device which
//! appears as `/dev/ttyACM0` or similar on the host. The same port
//! carries function calls in the other direction, one per line (e.g.
//! `printMsg Hello Tachyon`), standing in for a cloud connection.
#![no_std]

use core::cell::RefCell;
use core::fmt;
use cotton_console::registry::{MAX_FUNCTION_ARG_LENGTH, MAX_FUNCTION_NAME_LENGTH};
use cotton_console::{
    Background, FunctionRegistry, LineBuffer, Request, SerialConfig,
    SerialPort, Uptime,
};
use rp2040_hal as hal;
use usb_device::bus::UsbBusAllocator;
use usb_device::device::{
    BuilderError, StringDescriptors, UsbDevice, UsbDeviceBuilder,
    UsbDeviceState, UsbVidPid,
};
use usb_device::UsbError;

/// Longest request line: name, space, argument
pub const LINE_LENGTH: usize =
    MAX_FUNCTION_NAME_LENGTH + 1 + MAX_FUNCTION_ARG_LENGTH;

// Give up on a write after this many USB polls with no progress
const WRITE_RETRIES: u32 = 10_000;

/// The USB device and its one CDC-ACM interface
pub struct UsbPort<'a> {
    device: UsbDevice<'a, hal::usb::UsbBus>,
    serial: usbd_serial::SerialPort<'a, hal::usb::UsbBus>,
}

impl<'a> UsbPort<'a> {
    /// Create the port on the given bus (which must be otherwise unused)
    pub fn new(
        bus: &'a UsbBusAllocator<hal::usb::UsbBus>,
    ) -> Result<Self, BuilderError> {
        // The serial class must be allocated before the device is built
        let serial = usbd_serial::SerialPort::new(bus);
        let device = UsbDeviceBuilder::new(bus, UsbVidPid(0x16c0, 0x27dd))
            .strings(&[StringDescriptors::default()
                .manufacturer("Cotton")
                .product("Serial Console")
                .serial_number("0001")])?
            .device_class(usbd_serial::USB_CLASS_CDC)
            .build();
        Ok(Self { device, serial })
    }

    /// Service the USB bus; returns whether anything happened
    pub fn poll(&mut self) -> bool {
        self.device.poll(&mut [&mut self.serial])
    }

    fn connected(&self) -> bool {
        self.device.state() == UsbDeviceState::Configured && self.serial.dtr()
    }

    fn read(&mut self, buf: &mut [u8]) -> usize {
        self.poll();
        self.serial.read(buf).unwrap_or(0)
    }

    fn write_all(&mut self, mut bytes: &[u8]) -> fmt::Result {
        let mut retries = 0;
        while !bytes.is_empty() {
            match self.serial.write(bytes) {
                Ok(n) => {
                    bytes = &bytes[n..];
                    retries = 0;
                }
                Err(UsbError::WouldBlock) => {
                    // Nobody reading, or just too much at once
                    if !self.connected() || retries >= WRITE_RETRIES {
                        return Err(fmt::Error);
                    }
                    retries += 1;
                    self.poll();
                }
                Err(_) => return Err(fmt::Error),
            }
        }
        Ok(())
    }
}

/// One handle onto the shared [`UsbPort`]
///
/// Several of these can exist at once (the echo handler owns one, boot
/// code uses another); each only borrows the port for the duration of
/// a single call.
#[derive(Copy, Clone)]
pub struct SharedSerial<'p, 'a> {
    port: &'p RefCell<UsbPort<'a>>,
}

impl<'p, 'a> SharedSerial<'p, 'a> {
    /// A handle onto `port`
    pub fn new(port: &'p RefCell<UsbPort<'a>>) -> Self {
        Self { port }
    }
}

impl fmt::Write for SharedSerial<'_, '_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut port = self.port.try_borrow_mut().map_err(|_| fmt::Error)?;
        port.write_all(s.as_bytes())
    }
}

impl SerialPort for SharedSerial<'_, '_> {
    fn begin(&mut self, config: &SerialConfig) {
        // The host picks the line coding for a CDC-ACM port; the
        // request is only recorded
        defmt::info!("serial port opened at {=u32} baud", config.baud);
    }

    fn is_connected(&self) -> bool {
        self.port
            .try_borrow()
            .map(|port| port.connected())
            .unwrap_or(false)
    }

    fn is_ready(&self) -> bool {
        self.is_connected()
    }
}

/// Uptime from the RP2040's 1MHz timer
#[derive(Copy, Clone)]
pub struct TimerUptime(pub hal::Timer);

impl Uptime for TimerUptime {
    fn millis(&self) -> u64 {
        self.0.get_counter().ticks() / 1000
    }
}

/// Keep the timer running while a debugger has the cores halted
///
/// The timer doesn't increment if either RP2040 core is under debug,
/// unless the DBGPAUSE bits are cleared, which they aren't by default.
/// They can't be cleared before `hal::Timer::new` either, because that
/// resets the peripheral; hence the `timer` parameter.
pub fn unpause_timer_in_debug(_timer: &hal::Timer) {
    // SAFETY: only DBGPAUSE is touched, and nothing else uses it
    unsafe {
        hal::pac::TIMER::steal().dbgpause().write(|w| w.bits(0));
    }
}

/// The background work: answering function calls arriving over USB
pub struct UsbDispatcher<'p, 'a, 'f> {
    port: &'p RefCell<UsbPort<'a>>,
    lines: LineBuffer<LINE_LENGTH>,
    registry: FunctionRegistry<'f>,
}

impl<'p, 'a, 'f> UsbDispatcher<'p, 'a, 'f> {
    /// A dispatcher with no functions registered yet
    pub fn new(port: &'p RefCell<UsbPort<'a>>) -> Self {
        Self {
            port,
            lines: LineBuffer::new(),
            registry: FunctionRegistry::new(),
        }
    }

    /// The functions which can be called
    pub fn registry_mut(&mut self) -> &mut FunctionRegistry<'f> {
        &mut self.registry
    }
}

impl Background for UsbDispatcher<'_, '_, '_> {
    fn process(&mut self) {
        let mut buf = [0u8; 64];
        let count = match self.port.try_borrow_mut() {
            Ok(mut port) => port.read(&mut buf),
            Err(_) => return,
        };

        for &byte in &buf[..count] {
            let Some(line) = self.lines.feed(byte) else {
                continue;
            };
            let Some(request) = Request::parse(line) else {
                continue;
            };
            match self.registry.dispatch(&request) {
                Ok(result) => defmt::info!(
                    "{=str}({=str}) returned {=i32}",
                    request.name,
                    request.argument,
                    result
                ),
                Err(e) => defmt::warn!("{=str} not called: {}", request.name, e),
            }
        }
    }
}
