use crate::surface::SurfaceState;
use crate::time::FrameEvent;

use super::backend::{Backend, BlendMode};
use super::pass::{Drawable, PassKind};

/// Context handed to each drawable during a pass.
///
/// Lifetimes:
/// - `'a` is the duration of one `draw` invocation
pub struct DrawCtx<'a, B> {
    pub frame: &'a FrameEvent,
    pub surface: &'a SurfaceState,
    pub pass: PassKind,
    pub backend: &'a mut B,
}

impl<'a, B: Backend> DrawCtx<'a, B> {
    /// Blend state the coordinator set for this pass.
    #[inline]
    pub fn blending(&self) -> BlendMode {
        self.backend.blending()
    }
}

pub(crate) type PendingRegistration<B> = (PassKind, String, Box<dyn Drawable<B>>);

/// Context handed to update collaborators.
///
/// Drawables registered here are queued and join their pass after the
/// current frame presents, so pass lists never change mid-frame.
pub struct UpdateCtx<'a, B> {
    pub frame: &'a FrameEvent,
    pub surface: &'a SurfaceState,
    pending: &'a mut Vec<PendingRegistration<B>>,
}

impl<'a, B> UpdateCtx<'a, B> {
    pub(crate) fn new(
        frame: &'a FrameEvent,
        surface: &'a SurfaceState,
        pending: &'a mut Vec<PendingRegistration<B>>,
    ) -> Self {
        Self { frame, surface, pending }
    }

    /// Queues `drawable` for `kind`, effective from the next frame.
    pub fn register<D>(&mut self, kind: PassKind, drawable: D)
    where
        D: Drawable<B> + 'static,
    {
        let label = drawable.label().to_string();
        self.pending.push((kind, label, Box::new(drawable)));
    }

    /// Number of registrations queued so far this frame.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}
