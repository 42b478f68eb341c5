use std::fmt;

use crate::logging::TARGET_DRAW;
use crate::surface::SurfaceState;
use crate::time::FrameEvent;

use super::backend::Backend;
use super::ctx::DrawCtx;

/// The two render passes of a frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PassKind {
    /// Full depth testing, blending disabled.
    Opaque,
    /// Blending enabled, tested against the resolved opaque depth.
    Translucent,
}

impl fmt::Display for PassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassKind::Opaque => f.write_str("opaque"),
            PassKind::Translucent => f.write_str("translucent"),
        }
    }
}

/// A source of draw calls registered into a pass.
///
/// Failures are caught by the pass, logged and reported; they never abort the
/// frame.
pub trait Drawable<B> {
    fn draw(&mut self, ctx: &mut DrawCtx<'_, B>) -> anyhow::Result<()>;

    /// Name used in failure reports.
    fn label(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<B, F> Drawable<B> for F
where
    F: FnMut(&mut DrawCtx<'_, B>) -> anyhow::Result<()>,
{
    #[inline]
    fn draw(&mut self, ctx: &mut DrawCtx<'_, B>) -> anyhow::Result<()> {
        self(ctx)
    }
}

/// A drawable that failed during a pass.
#[derive(Debug)]
pub struct DrawFailure {
    pub pass: PassKind,
    pub label: String,
    pub frame_index: u64,
    pub error: anyhow::Error,
}

struct Registration<B> {
    label: String,
    drawable: Box<dyn Drawable<B>>,
}

/// Ordered registration list for one pass.
///
/// Drawables run in insertion order; later registrations may overdraw earlier
/// ones. No sorting or culling happens here.
pub struct ScenePass<B> {
    kind: PassKind,
    registrations: Vec<Registration<B>>,
}

impl<B: Backend> ScenePass<B> {
    pub fn new(kind: PassKind) -> Self {
        Self {
            kind,
            registrations: Vec::new(),
        }
    }

    #[inline]
    pub fn kind(&self) -> PassKind {
        self.kind
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Labels in invocation order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.registrations.iter().map(|r| r.label.as_str())
    }

    /// Appends a drawable. Duplicates are allowed and drawn twice.
    pub fn add(&mut self, drawable: Box<dyn Drawable<B>>) {
        let label = drawable.label().to_string();
        self.add_named(label, drawable);
    }

    /// Appends a drawable under an explicit label.
    pub fn add_named(&mut self, label: impl Into<String>, drawable: Box<dyn Drawable<B>>) {
        self.registrations.push(Registration {
            label: label.into(),
            drawable,
        });
    }

    /// Invokes every registration once, in order.
    ///
    /// A failing drawable is logged and recorded in `failures`; the remaining
    /// drawables still run. Returns the number of drawables invoked.
    pub fn invoke_all(
        &mut self,
        frame: &FrameEvent,
        surface: &SurfaceState,
        backend: &mut B,
        failures: &mut Vec<DrawFailure>,
    ) -> usize {
        for reg in &mut self.registrations {
            let mut ctx = DrawCtx {
                frame,
                surface,
                pass: self.kind,
                backend: &mut *backend,
            };

            if let Err(error) = reg.drawable.draw(&mut ctx) {
                log::error!(
                    target: TARGET_DRAW,
                    "frame {}: {} drawable `{}` failed: {error:#}",
                    frame.frame_index,
                    self.kind,
                    reg.label
                );
                failures.push(DrawFailure {
                    pass: self.kind,
                    label: reg.label.clone(),
                    frame_index: frame.frame_index,
                    error,
                });
            }
        }

        self.registrations.len()
    }
}
