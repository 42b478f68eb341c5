use std::fmt;

use thiserror::Error;

/// Lifecycle state of the [`super::ApplicationShell`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShellState {
    Created,
    Configured,
    Running,
    /// Terminal. All resources have been released.
    Exited,
}

impl fmt::Display for ShellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ShellState::Created => "created",
            ShellState::Configured => "configured",
            ShellState::Running => "running",
            ShellState::Exited => "exited",
        };
        f.write_str(s)
    }
}

impl ShellState {
    /// Allowed transitions. A failed startup exits straight from `Created`.
    pub fn can_transition(self, to: ShellState) -> bool {
        matches!(
            (self, to),
            (ShellState::Created, ShellState::Configured)
                | (ShellState::Configured, ShellState::Running)
                | (ShellState::Created | ShellState::Configured | ShellState::Running, ShellState::Exited)
        )
    }
}

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("invalid shell transition {from} -> {to}")]
    InvalidTransition { from: ShellState, to: ShellState },
}

#[cfg(test)]
mod tests {
    use super::*;
    use ShellState::*;

    #[test]
    fn forward_path_is_allowed() {
        assert!(Created.can_transition(Configured));
        assert!(Configured.can_transition(Running));
        assert!(Running.can_transition(Exited));
    }

    #[test]
    fn skipping_forward_is_rejected() {
        assert!(!Created.can_transition(Running));
        assert!(!Configured.can_transition(Created));
        assert!(!Running.can_transition(Configured));
    }

    #[test]
    fn exited_is_terminal() {
        for to in [Created, Configured, Running, Exited] {
            assert!(!Exited.can_transition(to));
        }
    }
}
