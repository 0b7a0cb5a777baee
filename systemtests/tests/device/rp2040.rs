use crate::device_test::{device_test, DeviceTest};
use serial_test::*;
use std::panic;
use std::time::Duration;
use systemtests::ConsolePort;

const FIRMWARE: &str =
    "../cross/rp2040/target/thumbv6m-none-eabi/debug/rp2040-serial-console";

fn rp2040_test<F: FnOnce(DeviceTest) + panic::UnwindSafe>(f: F) {
    device_test("RP2040", "COTTON_PROBE_RP2040", FIRMWARE, f);
}

#[test]
#[serial(rp2040)]
#[cfg_attr(miri, ignore)]
fn arm_rp2040_boots_without_terminal() {
    rp2040_test(|t| {
        t.expect_stderr("Finished in", Duration::from_secs(45));
        t.expect(
            "rp2040-serial-console from cross-rp2040",
            Duration::from_secs(10),
        );
        t.expect("No terminal attached", Duration::from_secs(10));
        t.expect(
            "Setup complete. Cloud function 'printMsg' is ready.",
            Duration::from_secs(5),
        );
    });
}

#[test]
#[serial(rp2040)]
#[cfg_attr(miri, ignore)]
fn arm_rp2040_echo() {
    rp2040_test(|t| {
        t.expect_stderr("Finished in", Duration::from_secs(45));
        t.expect("serial port opened at 9600 baud", Duration::from_secs(10));

        // The firmware waits 3s for a terminal, which is long enough
        // for the port to enumerate and be opened here
        let mut port = ConsolePort::open(Duration::from_secs(3)).unwrap();
        port.expect("=== Particle Serial Console Basics ===", Duration::from_secs(5))
            .unwrap();
        let baud = port.expect("Baud:", Duration::from_secs(1)).unwrap();
        assert_eq!(baud, "Baud: 9600  |  Data: 8N1");
        port.expect("Cloud function available: printMsg", Duration::from_secs(1))
            .unwrap();
        t.expect(
            "Setup complete. Cloud function 'printMsg' is ready.",
            Duration::from_secs(5),
        );

        port.call("printMsg", "Hello Tachyon").unwrap();
        let line = port
            .expect("Cloud says: Hello Tachyon", Duration::from_secs(5))
            .unwrap();
        assert!(line.starts_with('['));
        assert!(line.contains(" ms] "));
        t.expect("Printed to Serial: Cloud says: Hello Tachyon", Duration::from_secs(5));
        t.expect("printMsg(Hello Tachyon) returned 1", Duration::from_secs(5));

        port.call("printMsg", "").unwrap();
        port.expect(
            "Hello from Particle! (default message)",
            Duration::from_secs(5),
        )
        .unwrap();

        port.call("nosuch", "x").unwrap();
        t.expect("nosuch not called", Duration::from_secs(5));
    });
}
