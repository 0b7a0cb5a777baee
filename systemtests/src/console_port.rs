use serialport::{SerialPort, SerialPortType, UsbPortInfo};
use std::io::{self, Read, Write};
use std::thread::sleep;
use std::time::{Duration, Instant};

/// USB vendor id of the cross/rp2040 serial console
pub const USB_VID: u16 = 0x16c0;
/// USB product id of the cross/rp2040 serial console
pub const USB_PID: u16 = 0x27dd;

/// The host end of a board's USB serial port
pub struct ConsolePort {
    port: Box<dyn SerialPort>,
    received: String,
}

impl ConsolePort {
    /// Wait for the board to enumerate, then open its port
    ///
    /// Opening the port raises DTR, which is what the firmware waits
    /// for before printing its banner.
    pub fn open(timeout: Duration) -> io::Result<Self> {
        let start = Instant::now();
        loop {
            if let Some(name) = Self::find()? {
                let port = serialport::new(&name, 9600)
                    .timeout(Duration::from_millis(100))
                    .open()?;
                eprintln!("{:?}: opened {name}", Instant::now());
                return Ok(Self {
                    port,
                    received: String::new(),
                });
            }
            if start.elapsed() > timeout {
                return Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    "no serial console found",
                ));
            }
            sleep(Duration::from_millis(200));
        }
    }

    fn find() -> io::Result<Option<String>> {
        Ok(serialport::available_ports()?
            .into_iter()
            .find(|info| {
                matches!(
                    &info.port_type,
                    SerialPortType::UsbPort(UsbPortInfo { vid, pid, .. })
                        if *vid == USB_VID && *pid == USB_PID
                )
            })
            .map(|info| info.port_name))
    }

    /// Call a function on the board, as `name argument`
    pub fn call(&mut self, name: &str, argument: &str) -> io::Result<()> {
        let line = if argument.is_empty() {
            format!("{name}\n")
        } else {
            format!("{name} {argument}\n")
        };
        self.port.write_all(line.as_bytes())?;
        self.port.flush()
    }

    /// Read until `needle` arrives, returning the line containing it
    ///
    /// Everything up to the end of that line is consumed.
    pub fn expect(&mut self, needle: &str, timeout: Duration) -> io::Result<String> {
        let start = Instant::now();
        loop {
            if let Some(pos) = self.received.find(needle) {
                let begin = self.received[..pos].rfind('\n').map_or(0, |n| n + 1);
                let end = self.received[pos..]
                    .find('\n')
                    .map_or(self.received.len(), |n| pos + n + 1);
                let line = self.received[begin..end].trim_end().to_string();
                self.received.drain(..end);
                eprintln!("OK: {needle}");
                return Ok(line);
            }
            if start.elapsed() > timeout {
                return Err(io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("{needle:?} not in {:?}", self.received),
                ));
            }

            let mut buf = [0u8; 256];
            match self.port.read(&mut buf) {
                Ok(n) => self
                    .received
                    .push_str(&String::from_utf8_lossy(&buf[..n])),
                Err(e) if e.kind() == io::ErrorKind::TimedOut => {}
                Err(e) => return Err(e),
            }
        }
    }
}
