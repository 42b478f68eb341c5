use crate::config::Configuration;
use crate::surface::{SurfaceHandle, SurfaceState};
use crate::time::FrameEvent;

use super::app::{AppControl, UpdateLogic};
use super::backend::{Backend, BlendMode, SurfaceFactory};
use super::ctx::{PendingRegistration, UpdateCtx};
use super::error::{CoordinatorError, FrameError, SurfaceCreationError};
use super::pass::{DrawFailure, Drawable, PassKind, ScenePass};

/// Outcome of one [`RenderCoordinator::run_frame`].
#[derive(Debug, Default)]
pub struct FrameReport {
    pub frame_index: u64,

    /// `Exit` if any update collaborator asked to stop after this frame.
    pub control: AppControl,

    /// Drawables that failed this frame, in invocation order.
    pub failures: Vec<DrawFailure>,

    pub opaque_invoked: usize,
    pub translucent_invoked: usize,

    /// Whether the frame reached the display.
    pub presented: bool,

    /// Set when the surface could not be acquired; no pass ran.
    pub skipped: bool,
}

impl FrameReport {
    fn new(frame_index: u64) -> Self {
        Self {
            frame_index,
            ..Self::default()
        }
    }
}

/// Per-frame orchestrator: update, opaque pass, translucent pass, present.
///
/// The opaque pass always runs with blending disabled and completes before
/// blending is enabled for the translucent pass; blending is disabled again
/// before presentation. Both passes run every frame, even when empty.
///
/// `on_resize` takes `&mut self`, so it cannot be reached from inside a pass:
/// drawables only see `&SurfaceState` through their [`super::DrawCtx`].
pub struct RenderCoordinator<B: Backend> {
    backend: Option<B>,
    surface: SurfaceState,

    updates: Vec<Box<dyn UpdateLogic<B>>>,
    opaque: ScenePass<B>,
    translucent: ScenePass<B>,

    pending: Vec<PendingRegistration<B>>,
    frames_presented: u64,
}

impl<B: Backend> RenderCoordinator<B> {
    pub fn new() -> Self {
        Self {
            backend: None,
            surface: SurfaceState::default(),
            updates: Vec::new(),
            opaque: ScenePass::new(PassKind::Opaque),
            translucent: ScenePass::new(PassKind::Translucent),
            pending: Vec::new(),
            frames_presented: 0,
        }
    }

    /// Creates the rendering surface for `config`.
    ///
    /// Fails if the host cannot provide the requested size or sample count;
    /// there is no fallback to a lesser surface.
    pub fn configure<F>(
        &mut self,
        config: &Configuration,
        factory: &mut F,
    ) -> Result<SurfaceHandle, SurfaceCreationError>
    where
        F: SurfaceFactory<Backend = B>,
    {
        if config.width == 0 || config.height == 0 {
            return Err(SurfaceCreationError::InvalidSize {
                width: config.width,
                height: config.height,
            });
        }

        let mut backend = factory.create_surface(config)?;
        let handle = backend.handle();

        if handle.sample_count != config.sample_count {
            backend.release();
            return Err(SurfaceCreationError::UnsupportedSampleCount {
                requested: config.sample_count,
                supported: vec![handle.sample_count],
            });
        }

        if let Some(mut old) = self.backend.replace(backend) {
            log::warn!("configure called twice; releasing the previous surface");
            old.release();
        }

        self.surface = SurfaceState::new(handle.width, handle.height);
        log::info!(
            "surface configured: {}x{} samples={} present={:?}",
            handle.width,
            handle.height,
            handle.sample_count,
            handle.present_mode
        );
        Ok(handle)
    }

    #[inline]
    pub fn is_configured(&self) -> bool {
        self.backend.is_some()
    }

    #[inline]
    pub fn surface(&self) -> &SurfaceState {
        &self.surface
    }

    #[inline]
    pub fn backend(&self) -> Option<&B> {
        self.backend.as_ref()
    }

    #[inline]
    pub fn backend_mut(&mut self) -> Option<&mut B> {
        self.backend.as_mut()
    }

    #[inline]
    pub fn pass(&self, kind: PassKind) -> &ScenePass<B> {
        match kind {
            PassKind::Opaque => &self.opaque,
            PassKind::Translucent => &self.translucent,
        }
    }

    /// Frames that reached the display so far.
    #[inline]
    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Appends an update collaborator. Updates run in registration order.
    pub fn add_update<U>(&mut self, update: U)
    where
        U: UpdateLogic<B> + 'static,
    {
        self.updates.push(Box::new(update));
    }

    /// Appends `drawable` to the `kind` pass. No de-duplication.
    pub fn register_pass<D>(&mut self, kind: PassKind, drawable: D)
    where
        D: Drawable<B> + 'static,
    {
        self.pass_mut(kind).add(Box::new(drawable));
    }

    /// Like [`register_pass`](Self::register_pass) with an explicit label.
    pub fn register_named<D>(&mut self, kind: PassKind, label: impl Into<String>, drawable: D)
    where
        D: Drawable<B> + 'static,
    {
        self.pass_mut(kind).add_named(label, Box::new(drawable));
    }

    /// Updates the live surface size and reconfigures the backend.
    ///
    /// Zero-area sizes (minimized windows) are recorded but the backend keeps
    /// its last valid configuration. Does not redraw.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        self.surface.resize(width, height);
        log::debug!("surface resized to {width}x{height}");

        if self.surface.is_zero_area() {
            return;
        }
        if let Some(backend) = self.backend.as_mut() {
            backend.resize(&self.surface);
        }
    }

    /// Runs one frame in strict order: update, opaque pass (blending off),
    /// translucent pass (blending on), blending off, present.
    ///
    /// Drawable failures are recoverable and reported in the returned
    /// [`FrameReport`]. Only a missing configuration or a lost context is an
    /// error.
    pub fn run_frame(&mut self, frame: &FrameEvent) -> Result<FrameReport, CoordinatorError> {
        let backend = self.backend.as_mut().ok_or(CoordinatorError::NotConfigured)?;
        let mut report = FrameReport::new(frame.frame_index);

        // 1. Update. No frame target is bound yet.
        {
            let mut ctx = UpdateCtx::new(frame, &self.surface, &mut self.pending);
            for update in &mut self.updates {
                if update.update(&mut ctx) == AppControl::Exit {
                    report.control = AppControl::Exit;
                }
            }
        }

        match backend.begin_frame() {
            Ok(()) => {}
            Err(FrameError::Transient(reason)) => {
                log::warn!("frame {}: skipped, {reason}", frame.frame_index);
                report.skipped = true;
                self.flush_pending();
                return Ok(report);
            }
            Err(FrameError::Lost(reason)) => return Err(CoordinatorError::ContextLost(reason)),
        }

        // 2. Opaque.
        backend.set_blending(BlendMode::Disabled);
        report.opaque_invoked =
            self.opaque
                .invoke_all(frame, &self.surface, backend, &mut report.failures);

        // 3-5. Translucent, bracketed by the blend toggle.
        backend.set_blending(BlendMode::Enabled);
        report.translucent_invoked =
            self.translucent
                .invoke_all(frame, &self.surface, backend, &mut report.failures);
        backend.set_blending(BlendMode::Disabled);

        // 6. Present.
        match backend.present() {
            Ok(()) => {
                report.presented = true;
                self.frames_presented += 1;
            }
            Err(FrameError::Transient(reason)) => {
                log::warn!("frame {}: present failed, {reason}", frame.frame_index);
            }
            Err(FrameError::Lost(reason)) => return Err(CoordinatorError::ContextLost(reason)),
        }

        self.flush_pending();
        Ok(report)
    }

    /// Releases the surface. Registrations are kept.
    pub fn release(&mut self) {
        if let Some(mut backend) = self.backend.take() {
            backend.release();
            log::debug!("surface released");
        }
    }

    fn pass_mut(&mut self, kind: PassKind) -> &mut ScenePass<B> {
        match kind {
            PassKind::Opaque => &mut self.opaque,
            PassKind::Translucent => &mut self.translucent,
        }
    }

    fn flush_pending(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        for (kind, label, drawable) in pending {
            log::debug!("registering `{label}` into the {kind} pass");
            self.pass_mut(kind).add_named(label, drawable);
        }
    }
}

impl<B: Backend> Default for RenderCoordinator<B> {
    fn default() -> Self {
        Self::new()
    }
}
