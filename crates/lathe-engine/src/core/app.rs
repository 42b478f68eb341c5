use super::ctx::UpdateCtx;

/// Control directive returned by update callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum AppControl {
    #[default]
    Continue,
    Exit,
}

/// Update-logic collaborator.
///
/// Invoked once per frame before any pass. It may mutate scene state and
/// queue new drawables through `ctx`, but must not issue draw calls: no frame
/// target is bound while it runs.
pub trait UpdateLogic<B> {
    fn update(&mut self, ctx: &mut UpdateCtx<'_, B>) -> AppControl;
}

impl<B, F> UpdateLogic<B> for F
where
    F: FnMut(&mut UpdateCtx<'_, B>) -> AppControl,
{
    #[inline]
    fn update(&mut self, ctx: &mut UpdateCtx<'_, B>) -> AppControl {
        self(ctx)
    }
}
