use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Clock backing a [`super::FrameClock`].
///
/// `now` returns seconds since an arbitrary epoch as `f64` so that a source
/// running backwards is observable instead of saturating.
pub trait TimeSource {
    fn now(&mut self) -> f64;

    /// Cooperative pacing wait.
    fn sleep(&mut self, duration: Duration);
}

/// Monotonic system clock.
#[derive(Debug, Clone)]
pub struct SystemTimeSource {
    origin: Instant,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemTimeSource {
    #[inline]
    fn now(&mut self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Hand-driven time source.
///
/// Clones share the same time value, so a test can keep one handle and give
/// another to the clock. `sleep` advances time instead of blocking.
#[derive(Debug, Clone, Default)]
pub struct ManualTimeSource {
    now: Rc<Cell<f64>>,
    slept: Rc<Cell<f64>>,
}

impl ManualTimeSource {
    pub fn new(start: f64) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
            slept: Rc::new(Cell::new(0.0)),
        }
    }

    pub fn set(&self, now: f64) {
        self.now.set(now);
    }

    /// Moves time by `delta` seconds; negative values move it backwards.
    pub fn advance(&self, delta: f64) {
        self.now.set(self.now.get() + delta);
    }

    /// Total seconds spent in `sleep`.
    pub fn slept(&self) -> f64 {
        self.slept.get()
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&mut self) -> f64 {
        self.now.get()
    }

    fn sleep(&mut self, duration: Duration) {
        let secs = duration.as_secs_f64();
        self.slept.set(self.slept.get() + secs);
        self.advance(secs);
    }
}
