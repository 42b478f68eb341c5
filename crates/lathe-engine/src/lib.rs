//! Lathe engine crate.
//!
//! This crate owns the frame lifecycle: configuration, frame pacing, the
//! opaque/translucent pass coordinator, the wgpu backend and the winit host
//! that the application shell drives.

pub mod config;
pub mod console;
pub mod core;
pub mod device;
pub mod logging;
pub mod paint;
pub mod render;
pub mod shell;
pub mod surface;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod time;
pub mod window;
