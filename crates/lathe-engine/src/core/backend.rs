use crate::config::Configuration;
use crate::surface::{SurfaceHandle, SurfaceState};

use super::error::{FrameError, SurfaceCreationError};

/// Blend state toggled by the coordinator around the translucent pass.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum BlendMode {
    #[default]
    Disabled,
    Enabled,
}

impl BlendMode {
    #[inline]
    pub fn from_enabled(enabled: bool) -> Self {
        if enabled { BlendMode::Enabled } else { BlendMode::Disabled }
    }

    #[inline]
    pub fn is_enabled(self) -> bool {
        self == BlendMode::Enabled
    }
}

/// Graphics primitives the coordinator depends on.
///
/// Any graphics API can sit behind this trait as long as it honors the order
/// the coordinator calls it in: `begin_frame`, blending toggles, `present`.
pub trait Backend {
    /// Description of the configured surface.
    fn handle(&self) -> SurfaceHandle;

    /// Acquires the next frame target and clears it.
    fn begin_frame(&mut self) -> Result<(), FrameError>;

    /// Sets the blend state used by subsequent draws.
    fn set_blending(&mut self, mode: BlendMode);

    /// Current blend state.
    fn blending(&self) -> BlendMode;

    /// Submits recorded work and presents the frame.
    fn present(&mut self) -> Result<(), FrameError>;

    /// Reconfigures size-dependent resources. Not called for zero-area sizes.
    fn resize(&mut self, surface: &SurfaceState);

    /// Releases the surface. Called once, on shutdown.
    fn release(&mut self) {}
}

/// Creates a backend from the startup configuration.
pub trait SurfaceFactory {
    type Backend: Backend;

    fn create_surface(
        &mut self,
        config: &Configuration,
    ) -> Result<Self::Backend, SurfaceCreationError>;
}
