use assertables::*;
use nonblock::NonBlockingReader;
use std::env;
use std::panic;
use std::path::Path;
use std::process::{Child, ChildStderr, ChildStdout, Command, Stdio};
use std::sync::Mutex;
use std::thread::sleep;
use std::time::{Duration, Instant};

/// Output of a `probe-rs run`, split by stream
struct Transcript {
    stdout: NonBlockingReader<ChildStdout>,
    output: String,
    stderr: NonBlockingReader<ChildStderr>,
    errors: String,
}

impl Transcript {
    fn poll(&mut self) {
        let mut v = Vec::new();
        self.stdout.read_available(&mut v).unwrap();
        let s = String::from_utf8_lossy(&v);
        if !s.is_empty() {
            eprintln!("{:?}: stdout {s}", Instant::now());
        }
        self.output.push_str(&s);

        let mut v = Vec::new();
        self.stderr.read_available(&mut v).unwrap();
        let s = String::from_utf8_lossy(&v);
        if !s.is_empty() {
            eprintln!("{:?}: stderr {s}", Instant::now());
        }
        self.errors.push_str(&s);
    }

    fn dump(&self) {
        eprintln!("{:?}: FAIL stdout {}", Instant::now(), self.output);
        eprintln!("{:?}: FAIL stderr {}", Instant::now(), self.errors);
    }
}

/// Search `haystack` for `needle`, consuming up to the end of it
fn consume(haystack: &mut String, needle: &str) -> bool {
    match haystack.split_once(needle) {
        Some((_before, after)) => {
            *haystack = after.to_string();
            true
        }
        None => false,
    }
}

/// A board running firmware under `probe-rs`, with its defmt log
pub struct DeviceTest {
    transcript: Mutex<Transcript>,
}

impl DeviceTest {
    fn new(
        chip: &str,
        environment_variable: &str,
        firmware: &str,
    ) -> (Child, Self) {
        let root_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
        let elf = Path::new(&root_dir).join(firmware);

        let mut cmd = Command::new("probe-rs");
        cmd.arg("run");
        if let Ok(serial) = env::var(environment_variable) {
            cmd.arg("--probe");
            cmd.arg(serial);
        }
        let mut child = cmd
            .arg("--chip")
            .arg(chip)
            .arg(elf)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("failed to execute probe-rs");
        let stdout = child.stdout.take().unwrap();
        let stderr = child.stderr.take().unwrap();
        (
            child,
            DeviceTest {
                transcript: Mutex::new(Transcript {
                    stdout: NonBlockingReader::from_fd(stdout).unwrap(),
                    output: String::new(),
                    stderr: NonBlockingReader::from_fd(stderr).unwrap(),
                    errors: String::new(),
                }),
            },
        )
    }

    /// Wait for `needle` in the firmware's log
    pub fn expect(&self, needle: &str, timeout: Duration) {
        self.wait_for(needle, timeout, |t| &mut t.output);
    }

    /// Wait for `needle` in probe-rs's own messages (e.g. "Finished in")
    pub fn expect_stderr(&self, needle: &str, timeout: Duration) {
        self.wait_for(needle, timeout, |t| &mut t.errors);
    }

    fn wait_for(
        &self,
        needle: &str,
        timeout: Duration,
        stream: impl Fn(&mut Transcript) -> &mut String,
    ) {
        let start = Instant::now();
        eprintln!("{:?}: searching for {needle}", Instant::now());

        loop {
            {
                let mut t = self.transcript.lock().unwrap();
                t.poll();
                if consume(stream(&mut t), needle) {
                    eprintln!("OK: {needle}");
                    return;
                }

                if start.elapsed() > timeout {
                    t.dump();
                    let haystack = stream(&mut t).clone();
                    assert_contains!(haystack, needle);
                    return;
                }
            }
            sleep(Duration::from_millis(200));
        }
    }
}

/// Flash `firmware` and run `f` against it, stopping the board after
pub fn device_test<F: FnOnce(DeviceTest) + panic::UnwindSafe>(
    chip: &str,
    environment_variable: &str,
    firmware: &str,
    f: F,
) {
    let (mut child, t) = DeviceTest::new(chip, environment_variable, firmware);
    let result = panic::catch_unwind(|| f(t));
    if let Ok(Some(status)) = child.try_wait() {
        eprintln!("probe-rs exited: {status}");
    } else {
        _ = child.kill();
    }
    assert!(result.is_ok());
}
