//! Host window platform.
//!
//! The shell drives the loop; the host only creates the surface and reports
//! what happened since the last pump.

mod host;
mod icon;
mod runtime;

pub use host::{Host, HostEvent};
pub use icon::load_icon;
pub use runtime::WinitHost;
