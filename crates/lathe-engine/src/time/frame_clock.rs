use std::time::Duration;

use thiserror::Error;

use crate::logging::TARGET_CLOCK;

use super::{SystemTimeSource, TimeSource};

/// Per-frame timing payload.
///
/// Created fresh by every [`FrameClock::tick`] and owned by that frame's call
/// stack.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameEvent {
    /// Time elapsed since the previous tick, in seconds. Never negative.
    pub elapsed: f64,

    /// Monotonic frame counter.
    pub frame_index: u64,

    /// Interpolation factor between fixed updates, when rendering runs at a
    /// different rate than updates. The fixed-rate loop leaves this `None`.
    pub alpha: Option<f32>,
}

impl FrameEvent {
    pub fn new(elapsed: f64, frame_index: u64) -> Self {
        Self {
            elapsed,
            frame_index,
            alpha: None,
        }
    }

    #[inline]
    pub fn elapsed_secs_f32(&self) -> f32 {
        self.elapsed as f32
    }
}

/// Time source anomaly. Recoverable: the delta is clamped to zero.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ClockError {
    #[error("time source went backwards by {0:.6}s")]
    NegativeDelta(f64),

    #[error("time source returned a non-finite timestamp")]
    NonFinite,
}

/// Frame clock producing `FrameEvent` snapshots.
///
/// When a target rate is set, `tick` sleeps only for the remainder of the
/// frame interval; it never spins.
///
/// Delta time is clamped to avoid pathological values when the application is paused
/// by the debugger, minimized, or stalls.
#[derive(Debug, Clone)]
pub struct FrameClock<S: TimeSource = SystemTimeSource> {
    source: S,
    last: f64,
    frame_index: u64,
    interval: Option<Duration>,
    dt_max: Duration,
    last_error: Option<ClockError>,
}

impl FrameClock<SystemTimeSource> {
    /// Creates a system clock paced at `target_rate` Hz (`0` = unpaced).
    pub fn new(target_rate: f64) -> Self {
        Self::with_source(target_rate, SystemTimeSource::new())
    }
}

impl<S: TimeSource> FrameClock<S> {
    pub fn with_source(target_rate: f64, mut source: S) -> Self {
        let last = source.now();
        Self {
            source,
            last,
            frame_index: 0,
            interval: interval_for(target_rate),
            dt_max: Duration::from_millis(250),
            last_error: None,
        }
    }

    /// Overrides the upper delta-time clamp.
    pub fn with_max_delta(mut self, dt_max: Duration) -> Self {
        self.dt_max = dt_max;
        self
    }

    /// Target interval between ticks, if paced.
    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    /// Anomaly reported by the most recent `tick`, if any.
    pub fn last_error(&self) -> Option<ClockError> {
        self.last_error
    }

    /// Resets the clock baseline.
    ///
    /// Useful after surface reconfigure events or when resuming from suspension.
    pub fn reset(&mut self) {
        self.last = self.source.now();
    }

    /// Paces to the target rate, advances the clock and returns a new `FrameEvent`.
    pub fn tick(&mut self) -> FrameEvent {
        self.pace();

        let now = self.source.now();
        let elapsed = match measure(self.last, now) {
            Ok(dt) => {
                self.last_error = None;
                dt.min(self.dt_max.as_secs_f64())
            }
            Err(err) => {
                log::warn!(target: TARGET_CLOCK, "{err}; clamping frame delta to zero");
                self.last_error = Some(err);
                0.0
            }
        };

        // Rebase even on a backwards step so one regression yields one zero delta.
        if now.is_finite() {
            self.last = now;
        }

        let ev = FrameEvent::new(elapsed, self.frame_index);
        self.frame_index = self.frame_index.wrapping_add(1);
        ev
    }

    /// Sleeps at most one interval. A regressed or non-finite clock skips
    /// pacing so `tick` reports the anomaly instead of waiting it out.
    fn pace(&mut self) {
        let Some(interval) = self.interval else { return };

        let now = self.source.now();
        if !now.is_finite() || !self.last.is_finite() || now < self.last {
            return;
        }

        let remaining = (self.last + interval.as_secs_f64() - now).min(interval.as_secs_f64());
        if remaining > 0.0 {
            let wait = Duration::try_from_secs_f64(remaining).map_or(interval, |d| d.min(interval));
            self.source.sleep(wait);
        }
    }
}

impl Default for FrameClock<SystemTimeSource> {
    fn default() -> Self {
        Self::new(0.0)
    }
}

fn interval_for(target_rate: f64) -> Option<Duration> {
    if !(target_rate.is_finite() && target_rate > 0.0) {
        return None;
    }
    Duration::try_from_secs_f64(1.0 / target_rate).ok()
}

/// Seconds between two timestamps.
pub(crate) fn measure(last: f64, now: f64) -> Result<f64, ClockError> {
    if !now.is_finite() || !last.is_finite() {
        return Err(ClockError::NonFinite);
    }

    let dt = now - last;
    if dt < 0.0 {
        return Err(ClockError::NegativeDelta(-dt));
    }
    Ok(dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::ManualTimeSource;

    fn clock(rate: f64) -> (FrameClock<ManualTimeSource>, ManualTimeSource) {
        let src = ManualTimeSource::new(10.0);
        (FrameClock::with_source(rate, src.clone()), src)
    }

    // ── measure ───────────────────────────────────────────────────────────

    #[test]
    fn measure_forward() {
        assert_eq!(measure(1.0, 1.5), Ok(0.5));
    }

    #[test]
    fn measure_backwards_is_error() {
        assert_eq!(measure(2.0, 1.5), Err(ClockError::NegativeDelta(0.5)));
    }

    #[test]
    fn measure_nan_is_error() {
        assert_eq!(measure(1.0, f64::NAN), Err(ClockError::NonFinite));
    }

    // ── tick ──────────────────────────────────────────────────────────────

    #[test]
    fn unpaced_tick_reports_elapsed() {
        let (mut c, src) = clock(0.0);
        src.advance(0.016);
        let ev = c.tick();
        assert!((ev.elapsed - 0.016).abs() < 1e-6);
        assert_eq!(ev.frame_index, 0);
        assert_eq!(ev.alpha, None);
        assert_eq!(src.slept(), 0.0);
    }

    #[test]
    fn frame_index_increments() {
        let (mut c, _src) = clock(0.0);
        assert_eq!(c.tick().frame_index, 0);
        assert_eq!(c.tick().frame_index, 1);
        assert_eq!(c.tick().frame_index, 2);
    }

    #[test]
    fn negative_delta_is_clamped_to_zero() {
        let (mut c, src) = clock(0.0);
        src.advance(-3.0);
        assert_eq!(c.tick().elapsed, 0.0);

        // Baseline was rebased; the next forward step is measured normally.
        src.advance(0.1);
        assert!((c.tick().elapsed - 0.1).abs() < 1e-6);
    }

    #[test]
    fn non_finite_time_is_clamped_to_zero() {
        let (mut c, src) = clock(0.0);
        src.set(f64::INFINITY);
        assert_eq!(c.tick().elapsed, 0.0);
    }

    #[test]
    fn large_stall_is_clamped_to_max() {
        let (c, src) = clock(0.0);
        let mut c = c.with_max_delta(Duration::from_millis(100));
        src.advance(5.0);
        assert!((c.tick().elapsed - 0.1).abs() < 1e-6);
    }

    // ── pacing ────────────────────────────────────────────────────────────

    #[test]
    fn paced_tick_sleeps_only_the_remainder() {
        let (mut c, src) = clock(50.0); // 20 ms interval
        src.advance(0.005);
        let ev = c.tick();

        assert!((src.slept() - 0.015).abs() < 1e-6);
        assert!((ev.elapsed - 0.020).abs() < 1e-6);
    }

    #[test]
    fn paced_tick_does_not_sleep_when_late() {
        let (mut c, src) = clock(50.0);
        src.advance(0.030);
        let ev = c.tick();

        assert_eq!(src.slept(), 0.0);
        assert!((ev.elapsed - 0.030).abs() < 1e-6);
    }

    #[test]
    fn paced_regression_reports_instead_of_sleeping() {
        let (mut c, src) = clock(60.0);
        src.advance(-3.0);
        let ev = c.tick();

        assert!(src.slept() <= 1.0 / 60.0 + 1e-9);
        assert_eq!(ev.elapsed, 0.0);
        assert!(matches!(c.last_error(), Some(ClockError::NegativeDelta(d)) if (d - 3.0).abs() < 1e-6));

        // Rebased: the next frame paces normally again.
        c.tick();
        assert_eq!(c.last_error(), None);
        assert!((src.slept() - 1.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn paced_non_finite_baseline_does_not_panic() {
        let src = ManualTimeSource::new(f64::INFINITY);
        let mut c = FrameClock::with_source(60.0, src.clone());
        src.set(1.0);

        let ev = c.tick();
        assert_eq!(ev.elapsed, 0.0);
        assert_eq!(c.last_error(), Some(ClockError::NonFinite));
        assert_eq!(src.slept(), 0.0);

        // Finite baseline from here on.
        let ev = c.tick();
        assert!((ev.elapsed - 1.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn tiny_rate_does_not_overflow_the_interval() {
        assert_eq!(clock(1e-300).0.interval(), None);
    }

    #[test]
    fn zero_rate_has_no_interval() {
        assert_eq!(clock(0.0).0.interval(), None);
        assert_eq!(clock(4.0).0.interval(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn reset_rebases() {
        let (mut c, src) = clock(0.0);
        src.advance(1.0);
        c.reset();
        src.advance(0.01);
        assert!((c.tick().elapsed - 0.01).abs() < 1e-6);
    }
}
