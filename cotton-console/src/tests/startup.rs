use super::*;
use crate::handler::EchoHandler;
use crate::log::Level;
use crate::mocks::{
    CaptureSerial, ManualClock, MockDelay, MockSerialPort, RecordingLog,
};
use crate::platform::SerialConfig;
use crate::registry::FunctionRegistry;

/// A serial port whose terminal turns up at a particular time
struct LateTerminal {
    clock: ManualClock,
    arrives_ms: u64,
}

impl fmt::Write for LateTerminal {
    fn write_str(&mut self, _s: &str) -> fmt::Result {
        Ok(())
    }
}

impl SerialPort for LateTerminal {
    fn begin(&mut self, _config: &SerialConfig) {}

    fn is_connected(&self) -> bool {
        self.clock.millis() >= self.arrives_ms
    }

    fn is_ready(&self) -> bool {
        self.is_connected()
    }
}

#[test]
fn open_uses_configured_settings() {
    let mut serial = CaptureSerial::default();
    open(&mut serial, &ConsoleConfig::default());
    assert_eq!(serial.config(), Some(SerialConfig::new(9600)));
}

#[test]
fn already_connected_no_wait() {
    let mut serial = MockSerialPort::new();
    serial.expect_is_connected().times(1).return_const(true);
    let mut delay = MockDelay::new();
    delay.expect_delay_ns().never();
    let clock = ManualClock::at(500);
    assert!(wait_for_terminal(
        &serial,
        &clock,
        &mut delay,
        &ConsoleConfig::default()
    ));
}

#[test]
fn terminal_arrives_during_wait() {
    let clock = ManualClock::at(100);
    let serial = LateTerminal {
        clock: clock.clone(),
        arrives_ms: 1020,
    };
    let mut delay = clock.clone();
    assert!(wait_for_terminal(
        &serial,
        &clock,
        &mut delay,
        &ConsoleConfig::default()
    ));
    // Polled every 50ms from t=100, so noticed at the first poll after 1020
    assert_eq!(clock.millis(), 1050);
}

#[test]
fn gives_up_after_timeout() {
    let clock = ManualClock::at(0);
    let serial = LateTerminal {
        clock: clock.clone(),
        arrives_ms: u64::MAX,
    };
    let mut delay = clock.clone();
    assert!(!wait_for_terminal(
        &serial,
        &clock,
        &mut delay,
        &ConsoleConfig::default()
    ));
    assert_eq!(clock.millis(), 3000);
}

#[test]
fn timeout_is_configurable() {
    let clock = ManualClock::at(0);
    let serial = LateTerminal {
        clock: clock.clone(),
        arrives_ms: u64::MAX,
    };
    let mut delay = clock.clone();
    let config = ConsoleConfig {
        connect_timeout_ms: 100,
        connect_poll_ms: 30,
        ..ConsoleConfig::default()
    };
    assert!(!wait_for_terminal(&serial, &clock, &mut delay, &config));
    // Bounded by the timeout plus one poll interval
    assert_eq!(clock.millis(), 120);
}

#[test]
fn banner_text() {
    let mut out = String::new();
    write_banner(&mut out, &ConsoleConfig::default()).unwrap();
    assert_eq!(
        out,
        "\r\n\
         === Particle Serial Console Basics ===\r\n\
         Baud: 9600  |  Data: 8N1\r\n\
         Use 'particle serial monitor --follow' to view output.\r\n\
         Cloud function available: printMsg(<optional text>)\r\n\
         --------------------------------------\r\n\
         \r\n"
    );
}

#[test]
fn banner_follows_config() {
    let mut out = String::new();
    let config = ConsoleConfig {
        serial: SerialConfig::new(115200),
        function_name: "echo",
        ..ConsoleConfig::default()
    };
    write_banner(&mut out, &config).unwrap();
    assert!(out.contains("Baud: 115200  |  Data: 8N1\r\n"));
    assert!(out.contains("Cloud function available: echo(<optional text>)"));
}

#[test]
fn announce_logs_ready() {
    let mut serial = CaptureSerial::ready();
    let mut log = RecordingLog::default();
    announce(&mut serial, &mut log, &ConsoleConfig::default()).unwrap();
    assert!(serial.output().contains("=== Particle Serial Console Basics ==="));
    assert_eq!(
        log.at(Level::Info),
        vec!["Setup complete. Cloud function 'printMsg' is ready."]
    );
}

#[test]
fn announce_logs_even_if_banner_fails() {
    let mut serial = MockSerialPort::new();
    serial.expect_write_str().returning(|_| Err(fmt::Error));
    let mut log = RecordingLog::default();
    assert!(announce(&mut serial, &mut log, &ConsoleConfig::default()).is_err());
    assert_eq!(log.entries.len(), 1);
}

#[test]
fn whole_boot_sequence() {
    let config = ConsoleConfig::default();
    let clock = ManualClock::at(0);
    let mut serial = CaptureSerial::default();
    let mut log = RecordingLog::default();

    open(&mut serial, &config);
    let mut delay = clock.clone();
    let attached = wait_for_terminal(&serial, &clock, &mut delay, &config);
    assert!(!attached);

    // A terminal opens the port later on
    serial.set_ready(true);
    serial.set_connected(true);

    let mut handler =
        EchoHandler::new(serial.clone(), clock.clone(), RecordingLog::default());
    let mut registry = FunctionRegistry::<4>::new();
    registry.register(config.function_name, &mut handler).unwrap();
    announce(&mut serial, &mut log, &config).unwrap();

    assert_eq!(registry.call("printMsg", "Hello Tachyon"), Ok(1));

    let lines = serial.lines();
    assert_eq!(lines[1], "=== Particle Serial Console Basics ===");
    assert_eq!(lines.last().unwrap(), "[3000 ms] Cloud says: Hello Tachyon");
}
