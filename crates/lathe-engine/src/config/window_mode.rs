use super::Configuration;

/// Window presentation derived from the `fullscreen`/`borderless` flags.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum WindowMode {
    /// Decorated window at the configured size.
    Windowed,
    /// Undecorated window at the configured size.
    Borderless,
    /// Decorated window maximized to the current monitor.
    Maximized,
    /// Borderless window covering the current monitor.
    Fullscreen,
}

impl WindowMode {
    pub fn resolve(config: &Configuration) -> Self {
        match (config.fullscreen, config.borderless) {
            (true, true) => WindowMode::Fullscreen,
            (true, false) => WindowMode::Maximized,
            (false, true) => WindowMode::Borderless,
            (false, false) => WindowMode::Windowed,
        }
    }

    #[inline]
    pub fn decorated(self) -> bool {
        matches!(self, WindowMode::Windowed | WindowMode::Maximized)
    }
}
