//! Live surface dimensions.
//!
//! `SurfaceState` is owned by the coordinator and mutated only by its resize
//! handler. Passes and the update phase read it to recompute projections.

mod state;

pub use state::{PresentMode, SurfaceHandle, SurfaceState, Viewport};
