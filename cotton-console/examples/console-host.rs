//! Run the serial console on a PC
//!
//! Standard output plays the part of the serial port, standard error
//! the diagnostic log, and each line typed on standard input is a
//! function call, e.g. `printMsg Hello Tachyon`. Ctrl-D to quit.
use cotton_console::log::StdLog;
use cotton_console::startup;
use cotton_console::*;
use std::fmt;
use std::io::{self, BufRead, Write as _};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::{Duration, Instant};

struct Stdout;

impl fmt::Write for Stdout {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut out = io::stdout().lock();
        out.write_all(s.as_bytes()).map_err(|_| fmt::Error)?;
        out.flush().map_err(|_| fmt::Error)
    }
}

impl SerialPort for Stdout {
    fn begin(&mut self, _config: &SerialConfig) {}

    fn is_connected(&self) -> bool {
        true
    }

    fn is_ready(&self) -> bool {
        true
    }
}

struct Boot(Instant);

impl Uptime for Boot {
    fn millis(&self) -> u64 {
        self.0.elapsed().as_millis() as u64
    }
}

struct Sleep;

impl embedded_hal::delay::DelayNs for Sleep {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(u64::from(ns)));
    }
}

/// Answers the calls typed on standard input
struct Dispatcher<'a> {
    lines: Receiver<String>,
    registry: FunctionRegistry<'a>,
    log: LevelFilter<StdLog>,
}

impl Background for Dispatcher<'_> {
    fn process(&mut self) {
        loop {
            let line = match self.lines.try_recv() {
                Ok(line) => line,
                Err(TryRecvError::Empty) => return,
                Err(TryRecvError::Disconnected) => std::process::exit(0),
            };
            let Some(request) = Request::parse_line(&line) else {
                continue;
            };
            match self.registry.dispatch(&request) {
                Ok(result) => self.log.info(format_args!(
                    "{}() returned {}",
                    request.name, result
                )),
                Err(e) => self.log.warn(format_args!(
                    "{}() not called: {:?}",
                    request.name, e
                )),
            }
        }
    }
}

fn main() {
    let config = ConsoleConfig::default();
    let boot = Boot(Instant::now());

    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines().map_while(Result::ok) {
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut serial = Stdout;
    let mut log = LevelFilter::new(StdLog, config.log_level);
    let mut handler = EchoHandler::new(
        Stdout,
        Boot(boot.0),
        LevelFilter::new(StdLog, config.log_level),
    );

    let mut delay = CooperativeDelay::new(
        Sleep,
        Dispatcher {
            lines: rx,
            registry: FunctionRegistry::new(),
            log: LevelFilter::new(StdLog, config.log_level),
        },
    );

    startup::open(&mut serial, &config);
    startup::wait_for_terminal(&serial, &boot, &mut delay, &config);

    if let Err(e) = delay
        .background_mut()
        .registry
        .register(config.function_name, &mut handler)
    {
        log.warn(format_args!("could not register function: {e:?}"));
        return;
    }

    if startup::announce(&mut serial, &mut log, &config).is_err() {
        log.warn(format_args!("Banner not printed"));
    }

    Idle::new(config.idle_period_ms).run(&mut delay)
}
