use embedded_hal::delay::DelayNs;

/// The platform's background work: servicing USB, the cloud link, etc.
///
/// It gets run whenever the application sleeps through a
/// [`CooperativeDelay`]. Implementations should return promptly.
pub trait Background {
    /// Do whatever work is pending
    fn process(&mut self);
}

impl<T: Background + ?Sized> Background for &mut T {
    fn process(&mut self) {
        (**self).process();
    }
}

/// No background work at all
impl Background for () {
    fn process(&mut self) {}
}

const NS_PER_MS: u32 = 1_000_000;

/// A delay which keeps the background work going while it waits
///
/// Sleeps are chopped into slices of at most one millisecond, and the
/// background work runs before each slice and once more at the end. So
/// even a long sleep never holds off the background for more than a
/// millisecond or so, and a zero-length sleep still yields once.
pub struct CooperativeDelay<D: DelayNs, B: Background> {
    delay: D,
    background: B,
}

impl<D: DelayNs, B: Background> CooperativeDelay<D, B> {
    /// Combine a plain delay with the work to do while delaying
    pub fn new(delay: D, background: B) -> Self {
        Self { delay, background }
    }

    /// The background work, e.g. to register functions with it
    pub fn background_mut(&mut self) -> &mut B {
        &mut self.background
    }

    /// Take the delay apart again
    pub fn into_parts(self) -> (D, B) {
        (self.delay, self.background)
    }
}

impl<D: DelayNs, B: Background> DelayNs for CooperativeDelay<D, B> {
    fn delay_ns(&mut self, mut ns: u32) {
        while ns > 0 {
            self.background.process();
            let slice = ns.min(NS_PER_MS);
            self.delay.delay_ns(slice);
            ns -= slice;
        }
        self.background.process();
    }

    fn delay_ms(&mut self, ms: u32) {
        for _ in 0..ms {
            self.background.process();
            self.delay.delay_ns(NS_PER_MS);
        }
        self.background.process();
    }
}

/// The application's main loop, which has nothing to do but wait
///
/// All the real work (answering function calls) happens in the
/// background, during the sleeps.
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Idle {
    period_ms: u32,
}

impl Idle {
    /// A loop which sleeps for `period_ms` each time round
    pub const fn new(period_ms: u32) -> Self {
        Self { period_ms }
    }

    /// How long each iteration sleeps
    pub const fn period_ms(&self) -> u32 {
        self.period_ms
    }

    /// One iteration of the loop
    pub fn step<D: DelayNs>(&self, delay: &mut D) {
        delay.delay_ms(self.period_ms);
    }

    /// Loop forever
    pub fn run<D: DelayNs>(&self, delay: &mut D) -> ! {
        loop {
            self.step(delay);
        }
    }
}

impl Default for Idle {
    fn default() -> Self {
        Self::new(crate::config::IDLE_PERIOD_MS)
    }
}

#[cfg(all(test, feature = "std"))]
#[path = "tests/idle.rs"]
mod tests;
