//! Supervision state machine.
//!
//! ```text
//! Init ──┬── Starting ──── Failed
//!        ├── Monitoring ── Failed
//!        └── Conflict
//! ```

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupervisionState {
    /// Nothing decided yet.
    Init,
    /// The port was free; the launcher owns it.
    Starting,
    /// A healthy instance was adopted; the monitor loop is watching it.
    Monitoring,
    /// The port is held by something that is not a healthy instance.
    Conflict,
    /// The launched or adopted instance was lost.
    Failed,
}

impl SupervisionState {
    /// Whether `next` is a legal successor of `self`.
    pub fn can_transition_to(self, next: SupervisionState) -> bool {
        use SupervisionState::*;
        matches!(
            (self, next),
            (Init, Starting)
                | (Init, Monitoring)
                | (Init, Conflict)
                | (Starting, Failed)
                | (Monitoring, Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, SupervisionState::Conflict | SupervisionState::Failed)
    }
}

impl fmt::Display for SupervisionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SupervisionState::Init => "init",
            SupervisionState::Starting => "starting",
            SupervisionState::Monitoring => "monitoring",
            SupervisionState::Conflict => "conflict",
            SupervisionState::Failed => "failed",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::SupervisionState::*;
    use super::*;

    const ALL: [SupervisionState; 5] = [Init, Starting, Monitoring, Conflict, Failed];

    #[test]
    fn init_branches_once() {
        assert!(Init.can_transition_to(Starting));
        assert!(Init.can_transition_to(Monitoring));
        assert!(Init.can_transition_to(Conflict));
        assert!(!Init.can_transition_to(Failed));
    }

    #[test]
    fn nothing_returns_to_init() {
        for state in ALL {
            assert!(!state.can_transition_to(Init), "{state} -> init");
        }
    }

    #[test]
    fn launcher_and_monitor_never_swap() {
        assert!(!Starting.can_transition_to(Monitoring));
        assert!(!Monitoring.can_transition_to(Starting));
    }

    #[test]
    fn terminal_states_have_no_successors() {
        for state in ALL.into_iter().filter(|s| s.is_terminal()) {
            for next in ALL {
                assert!(!state.can_transition_to(next), "{state} -> {next}");
            }
        }
    }
}
