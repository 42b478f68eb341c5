use thiserror::Error;

/// Surface could not be created for the requested configuration.
///
/// Always fatal: the application must not proceed on a downgraded surface.
#[derive(Debug, Error)]
pub enum SurfaceCreationError {
    #[error("surface size must be non-zero, got {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("sample count {requested} is not supported by the host (supported: {supported:?})")]
    UnsupportedSampleCount { requested: u32, supported: Vec<u32> },

    #[error("host surface reports no usable pixel format")]
    NoSurfaceFormat,

    #[error("surface creation failed: {0:#}")]
    Backend(#[from] anyhow::Error),
}

/// Failure to acquire or present a frame.
#[derive(Debug, Clone, Error)]
pub enum FrameError {
    /// The frame cannot be rendered now but the context is intact.
    #[error("transient surface error: {0}")]
    Transient(String),

    /// The graphics context is gone.
    #[error("graphics context lost: {0}")]
    Lost(String),
}

/// Errors returned from [`super::RenderCoordinator::run_frame`].
///
/// Both are fatal to the loop; everything recoverable is reported through
/// [`super::FrameReport`] instead.
#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("run_frame called before configure")]
    NotConfigured,

    #[error("graphics context lost: {0}")]
    ContextLost(String),
}
