//! Process console visibility.
//!
//! On Windows a GUI process launched from a console keeps that console window
//! around; the shell hides it when `show_console` is off. Elsewhere there is
//! no console window to manage and the toggle succeeds without effect.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("process has no console window")]
    NoConsole,

    #[error("console visibility change was rejected: {0}")]
    Rejected(String),
}

/// OS-level console visibility control.
pub trait ConsoleControl {
    fn set_visible(&mut self, visible: bool) -> Result<(), ConsoleError>;
}

/// The real process console.
#[derive(Debug, Default)]
pub struct SystemConsole;

impl ConsoleControl for SystemConsole {
    fn set_visible(&mut self, visible: bool) -> Result<(), ConsoleError> {
        set_console_visible(visible)
    }
}

#[cfg(windows)]
pub fn set_console_visible(visible: bool) -> Result<(), ConsoleError> {
    use winapi::um::wincon::GetConsoleWindow;
    use winapi::um::winuser::{ShowWindow, SW_HIDE, SW_SHOW};

    // SAFETY: both calls take no pointers; a null handle is checked before use.
    let hwnd = unsafe { GetConsoleWindow() };
    if hwnd.is_null() {
        return Err(ConsoleError::NoConsole);
    }

    let cmd = if visible { SW_SHOW } else { SW_HIDE };
    // ShowWindow returns the previous visibility, not a success flag.
    unsafe { ShowWindow(hwnd, cmd) };
    Ok(())
}

#[cfg(not(windows))]
pub fn set_console_visible(visible: bool) -> Result<(), ConsoleError> {
    log::trace!("console visibility ({visible}) is not managed on this platform");
    Ok(())
}

/// Hides the console for its lifetime and restores it when dropped.
pub struct ConsoleGuard {
    control: Box<dyn ConsoleControl>,
    hidden: bool,
}

impl ConsoleGuard {
    /// Applies `show_console`. Failures are advisory and only logged.
    pub fn acquire(mut control: Box<dyn ConsoleControl>, show_console: bool) -> Self {
        let mut hidden = false;
        if !show_console {
            match control.set_visible(false) {
                Ok(()) => hidden = true,
                Err(e) => log::warn!(
                    target: crate::logging::TARGET_ADVISORY,
                    "failed to hide console: {e}"
                ),
            }
        }
        Self { control, hidden }
    }

    #[inline]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Restores visibility if this guard hid the console. Idempotent.
    pub fn release(&mut self) {
        if !self.hidden {
            return;
        }
        self.hidden = false;
        if let Err(e) = self.control.set_visible(true) {
            log::warn!(target: crate::logging::TARGET_ADVISORY, "failed to restore console: {e}");
        }
    }
}

impl Drop for ConsoleGuard {
    fn drop(&mut self) {
        self.release();
    }
}
