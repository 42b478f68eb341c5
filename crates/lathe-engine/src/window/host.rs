use crate::core::SurfaceFactory;

/// Platform events relevant to the frame loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Resized { width: u32, height: u32 },
    CloseRequested,
    /// The platform context is gone; fatal at runtime.
    ContextLost(String),
}

/// Host window/platform layer.
///
/// Creates the surface (through [`SurfaceFactory`]) and pumps platform
/// events between frames.
pub trait Host: SurfaceFactory {
    /// Processes pending platform events without blocking.
    fn pump_events(&mut self) -> Vec<HostEvent>;

    /// Releases the window. Called once, after the surface is released.
    fn release(&mut self) {}
}
