//! Startup configuration.
//!
//! The configuration is a read-once snapshot: it is loaded before the surface
//! exists, consumed once to build it, and then held read-only for the process
//! lifetime. Live surface dimensions are tracked separately by
//! [`crate::surface::SurfaceState`].

mod settings;
mod window_mode;

pub use settings::{ConfigError, Configuration, DEFAULT_SETTINGS_FILE, SUPPORTED_SAMPLE_COUNTS};
pub use window_mode::WindowMode;
