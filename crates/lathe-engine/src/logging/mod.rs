//! Logging utilities.
//!
//! This module centralizes logger initialization. Library code only talks to
//! the `log` facade; recoverable frame errors are reported under the
//! targets below so they can be filtered independently.

mod init;

pub use init::{init_logging, LoggingConfig};

/// Log target for drawable failures caught during a pass.
pub const TARGET_DRAW: &str = "lathe::draw";

/// Log target for time source anomalies.
pub const TARGET_CLOCK: &str = "lathe::clock";

/// Log target for advisory failures (icon, console toggle).
pub const TARGET_ADVISORY: &str = "lathe::advisory";
