/// Viewport rectangle in physical pixels, anchored at the origin.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { x: 0, y: 0, width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Current drawable size plus derived viewport and aspect ratio.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SurfaceState {
    pub width: u32,
    pub height: u32,
    pub viewport: Viewport,
    /// `width / height`, or `1.0` while the surface has zero area.
    pub aspect: f32,
}

impl SurfaceState {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            viewport: Viewport::new(width, height),
            aspect: aspect_of(width, height),
        }
    }

    /// Applies a new size and recomputes derived values.
    pub fn resize(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height);
    }

    /// Minimized windows report a zero-area surface.
    #[inline]
    pub fn is_zero_area(&self) -> bool {
        !self.viewport.is_valid()
    }
}

impl Default for SurfaceState {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

fn aspect_of(width: u32, height: u32) -> f32 {
    if width == 0 || height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    }
}

/// Presentation behavior chosen for the surface.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PresentMode {
    /// Presentation waits for vertical blank.
    Vsync,
    /// Presentation does not wait for vertical blank.
    Immediate,
}

impl PresentMode {
    #[inline]
    pub fn from_vsync(vsync: bool) -> Self {
        if vsync { PresentMode::Vsync } else { PresentMode::Immediate }
    }
}

/// Description of a configured surface, returned by
/// [`crate::core::RenderCoordinator::configure`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SurfaceHandle {
    pub width: u32,
    pub height: u32,
    pub sample_count: u32,
    pub present_mode: PresentMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_derives_viewport_and_aspect() {
        let s = SurfaceState::new(800, 600);
        assert_eq!(s.viewport, Viewport::new(800, 600));
        assert!((s.aspect - 4.0 / 3.0).abs() < 1e-6);
        assert!(!s.is_zero_area());
    }

    #[test]
    fn resize_recomputes() {
        let mut s = SurfaceState::new(800, 600);
        s.resize(1920, 1080);
        assert_eq!((s.width, s.height), (1920, 1080));
        assert_eq!(s.viewport.width, 1920);
        assert!((s.aspect - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn zero_area_keeps_unit_aspect() {
        let mut s = SurfaceState::new(800, 600);
        s.resize(0, 600);
        assert!(s.is_zero_area());
        assert_eq!(s.aspect, 1.0);
    }

    #[test]
    fn present_mode_from_vsync() {
        assert_eq!(PresentMode::from_vsync(true), PresentMode::Vsync);
        assert_eq!(PresentMode::from_vsync(false), PresentMode::Immediate);
    }
}
