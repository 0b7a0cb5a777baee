//! Serial console basics on a Raspberry Pi Pico
//!
//! Open the Pico's USB serial port in a terminal (at any baud rate)
//! to see the banner, then type `printMsg` or `printMsg some text`
//! followed by Enter to call the echo function.
#![no_std]
#![no_main]

use core::cell::RefCell;
use cotton_console::log::DefmtLog;
use cotton_console::{
    startup, ConsoleConfig, CooperativeDelay, DiagnosticLog, EchoHandler,
    Idle, LevelFilter,
};
use cross_rp2040::{SharedSerial, TimerUptime, UsbDispatcher, UsbPort};
use defmt_rtt as _; // global logger
use panic_probe as _;
use rp2040_hal as hal;
use rp_pico as _; // includes boot2
use usb_device::bus::UsbBusAllocator;

#[hal::entry]
fn main() -> ! {
    defmt::println!(
        "{=str} from {=str} {=str}",
        env!("CARGO_BIN_NAME"),
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
    );

    let config = ConsoleConfig::default();
    let mut device = hal::pac::Peripherals::take().unwrap();
    let mut watchdog = hal::watchdog::Watchdog::new(device.WATCHDOG);

    // Configure the clocks - the default is a 125 MHz system clock
    let clocks = hal::clocks::init_clocks_and_plls(
        rp_pico::XOSC_CRYSTAL_FREQ,
        device.XOSC,
        device.CLOCKS,
        device.PLL_SYS,
        device.PLL_USB,
        &mut device.RESETS,
        &mut watchdog,
    )
    .ok()
    .unwrap();

    let timer = hal::Timer::new(device.TIMER, &mut device.RESETS, &clocks);
    cross_rp2040::unpause_timer_in_debug(&timer);
    let uptime = TimerUptime(timer);

    let usb_bus = UsbBusAllocator::new(hal::usb::UsbBus::new(
        device.USBCTRL_REGS,
        device.USBCTRL_DPRAM,
        clocks.usb_clock,
        true,
        &mut device.RESETS,
    ));
    let port = RefCell::new(UsbPort::new(&usb_bus).unwrap());

    let mut serial = SharedSerial::new(&port);
    let mut log = LevelFilter::new(DefmtLog, config.log_level);
    let mut handler = EchoHandler::new(
        SharedSerial::new(&port),
        uptime,
        LevelFilter::new(DefmtLog, config.log_level),
    );
    let mut delay = CooperativeDelay::new(timer, UsbDispatcher::new(&port));

    startup::open(&mut serial, &config);
    if !startup::wait_for_terminal(&serial, &uptime, &mut delay, &config) {
        log.info(format_args!("No terminal attached; carrying on"));
    }

    if let Err(e) = delay
        .background_mut()
        .registry_mut()
        .register(config.function_name, &mut handler)
    {
        defmt::panic!("could not register {=str}: {}", config.function_name, e);
    }

    if startup::announce(&mut serial, &mut log, &config).is_err() {
        log.warn(format_args!("Banner not printed"));
    }

    Idle::new(config.idle_period_ms).run(&mut delay)
}
