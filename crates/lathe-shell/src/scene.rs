//! Demo scene: an opaque floor with pillars, translucent panes drifting in
//! front of it, and a frame-time overlay.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Result, bail};
use lathe_engine::core::{AppControl, DrawCtx, Drawable, PassKind, RenderCoordinator, UpdateCtx};
use lathe_engine::device::{PassTarget, WgpuBackend};
use lathe_engine::paint::Color;
use lathe_engine::render::{Quad, QuadRenderer};
use lathe_engine::surface::SurfaceState;

const PANE_COUNT: usize = 5;

/// Frame time that fills the overlay bar.
const OVERLAY_BUDGET_SECS: f32 = 1.0 / 30.0;

/// Pane state shared between the update collaborator and the translucent layer.
#[derive(Debug, Clone, Default)]
pub struct SceneState {
    pub time: f32,
    /// Normalized pane centers, `[0, 1]` on both axes.
    pub panes: Vec<[f32; 2]>,
}

impl SceneState {
    pub fn new() -> Self {
        let mut state = Self::default();
        state.animate(0.0);
        state
    }

    /// Advances the animation by `dt` seconds.
    pub fn animate(&mut self, dt: f32) {
        self.time += dt.max(0.0);
        let t = self.time;

        self.panes = (0..PANE_COUNT)
            .map(|i| {
                let phase = i as f32 * std::f32::consts::TAU / PANE_COUNT as f32;
                [
                    0.5 + 0.32 * (t * 0.4 + phase).cos(),
                    0.45 + 0.2 * (t * 0.7 + phase).sin(),
                ]
            })
            .collect();
    }
}

/// Wires the demo scene into `coord`.
pub fn install(coord: &mut RenderCoordinator<WgpuBackend>) {
    let state = Rc::new(RefCell::new(SceneState::new()));

    let animated = state.clone();
    coord.add_update(move |ctx: &mut UpdateCtx<'_, WgpuBackend>| {
        animated.borrow_mut().animate(ctx.frame.elapsed_secs_f32());
        AppControl::Continue
    });

    coord.register_pass(PassKind::Opaque, SceneGeometry::default());
    coord.register_pass(PassKind::Translucent, EntityLayer::new(state));
    // Registered last so it draws over the geometry.
    coord.register_pass(PassKind::Opaque, DebugOverlay::default());
}

fn target<'a>(backend: &'a mut WgpuBackend) -> Result<PassTarget<'a>> {
    match backend.target() {
        Some(target) => Ok(target),
        None => bail!("no frame in flight"),
    }
}

// ── geometry ─────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct SceneGeometry {
    renderer: QuadRenderer,
}

impl SceneGeometry {
    pub fn quads(surface: &SurfaceState) -> Vec<Quad> {
        let w = surface.width as f32;
        let h = surface.height as f32;
        let floor = Color::from_srgb_u8(0x2b, 0x30, 0x3a, 0xff);
        let pillar = Color::from_srgb_u8(0x4c, 0x56, 0x6a, 0xff);

        let mut quads = vec![Quad::new(0.0, h * 0.7, w, h * 0.3, 0.9, floor)];
        for i in 0..4 {
            let x = w * (0.12 + 0.22 * i as f32);
            quads.push(Quad::new(x, h * 0.25, w * 0.06, h * 0.45, 0.8, pillar));
        }
        quads
    }
}

impl Drawable<WgpuBackend> for SceneGeometry {
    fn draw(&mut self, ctx: &mut DrawCtx<'_, WgpuBackend>) -> Result<()> {
        let quads = Self::quads(ctx.surface);
        let mut target = target(ctx.backend)?;
        self.renderer.render(&mut target, &quads)
    }

    fn label(&self) -> &str {
        "scene-geometry"
    }
}

// ── translucent panes ────────────────────────────────────────────────────

pub struct EntityLayer {
    state: Rc<RefCell<SceneState>>,
    renderer: QuadRenderer,
}

impl EntityLayer {
    pub fn new(state: Rc<RefCell<SceneState>>) -> Self {
        Self {
            state,
            renderer: QuadRenderer::new(),
        }
    }

    pub fn quads(state: &SceneState, surface: &SurfaceState) -> Vec<Quad> {
        let w = surface.width as f32;
        let h = surface.height as f32;
        let side = w.min(h) * 0.18;

        state
            .panes
            .iter()
            .enumerate()
            .map(|(i, [cx, cy])| {
                let hue = i as f32 / state.panes.len().max(1) as f32;
                let color = Color::from_straight(0.3 + 0.7 * hue, 0.55, 1.0 - 0.6 * hue, 0.45);
                Quad::new(cx * w - side * 0.5, cy * h - side * 0.5, side, side, 0.5, color)
            })
            .collect()
    }
}

impl Drawable<WgpuBackend> for EntityLayer {
    fn draw(&mut self, ctx: &mut DrawCtx<'_, WgpuBackend>) -> Result<()> {
        let quads = Self::quads(&self.state.borrow(), ctx.surface);
        let mut target = target(ctx.backend)?;
        self.renderer.render(&mut target, &quads)
    }

    fn label(&self) -> &str {
        "entity-layer"
    }
}

// ── debug overlay ────────────────────────────────────────────────────────

/// Frame-time bar in the top-left corner.
#[derive(Default)]
pub struct DebugOverlay {
    renderer: QuadRenderer,
}

impl DebugOverlay {
    pub fn quads(elapsed: f32, surface: &SurfaceState) -> Vec<Quad> {
        let track_w = (surface.width as f32 * 0.25).max(1.0);
        let fill = (elapsed / OVERLAY_BUDGET_SECS).clamp(0.0, 1.0);
        let color = if fill > 0.5 {
            Color::from_srgb_u8(0xe0, 0x6c, 0x4f, 0xff)
        } else {
            Color::from_srgb_u8(0x6f, 0xc2, 0x76, 0xff)
        };

        vec![
            Quad::new(8.0, 8.0, track_w, 10.0, 0.02, Color::from_srgb_u8(0x12, 0x14, 0x18, 0xff)),
            Quad::new(8.0, 8.0, track_w * fill, 10.0, 0.01, color),
        ]
    }
}

impl Drawable<WgpuBackend> for DebugOverlay {
    fn draw(&mut self, ctx: &mut DrawCtx<'_, WgpuBackend>) -> Result<()> {
        let quads = Self::quads(ctx.frame.elapsed_secs_f32(), ctx.surface);
        let mut target = target(ctx.backend)?;
        self.renderer.render(&mut target, &quads)
    }

    fn label(&self) -> &str {
        "debug-overlay"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── animation ────────────────────────────────────────────────────────

    #[test]
    fn panes_stay_on_screen() {
        let mut state = SceneState::new();
        for _ in 0..500 {
            state.animate(0.05);
            for [x, y] in &state.panes {
                assert!((0.0..=1.0).contains(x));
                assert!((0.0..=1.0).contains(y));
            }
        }
        assert_eq!(state.panes.len(), PANE_COUNT);
    }

    #[test]
    fn negative_delta_does_not_rewind() {
        let mut state = SceneState::new();
        state.animate(1.0);
        state.animate(-0.5);
        assert_eq!(state.time, 1.0);
    }

    // ── layout ───────────────────────────────────────────────────────────

    #[test]
    fn panes_are_translucent_and_in_front_of_geometry() {
        let surface = SurfaceState::new(800, 600);
        let panes = EntityLayer::quads(&SceneState::new(), &surface);
        let geometry = SceneGeometry::quads(&surface);

        assert!(panes.iter().all(|q| !q.color.is_opaque()));
        let nearest_geometry = geometry.iter().map(|q| q.depth).fold(f32::MAX, f32::min);
        assert!(panes.iter().all(|q| q.depth < nearest_geometry));
    }

    #[test]
    fn overlay_bar_saturates() {
        let surface = SurfaceState::new(800, 600);
        let slow = DebugOverlay::quads(1.0, &surface);
        assert_eq!(slow[1].size[0], slow[0].size[0]);

        let idle = DebugOverlay::quads(0.0, &surface);
        assert_eq!(idle[1].size[0], 0.0);
    }
}
