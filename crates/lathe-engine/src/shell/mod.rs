//! Application shell.
//!
//! Owns the process-level lifecycle `Created → Configured → Running → Exited`
//! and every resource acquired along the way. Resources are released on every
//! exit path, including startup failures and drops.

mod app_shell;
mod state;

pub use app_shell::ApplicationShell;
pub use state::{ShellError, ShellState};
