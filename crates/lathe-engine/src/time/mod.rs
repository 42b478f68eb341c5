//! Time subsystem.
//!
//! Provides stable, testable frame timing utilities without coupling to the runtime.
//! Intended usage:
//! - one `FrameClock` per render loop
//! - call `tick()` once per loop iteration to obtain a `FrameEvent`

mod frame_clock;
mod source;

pub use frame_clock::{ClockError, FrameClock, FrameEvent};
pub use source::{ManualTimeSource, SystemTimeSource, TimeSource};
