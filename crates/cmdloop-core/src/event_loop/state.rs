//! Event loop lifecycle state.

use serde::{Deserialize, Serialize};

/// Lifecycle of an [`EventLoop`](super::EventLoop).
///
/// State transitions:
/// - Created -> Running (`start`)
/// - Running -> Stopped (`stop`, directly or through a Stop command)
/// - Created -> Stopped (`stop` before `start`; the loop can no longer start)
///
/// `Stopped` is terminal; there is no restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum LoopState {
    Created = 0,
    Running = 1,
    Stopped = 2,
}

impl LoopState {
    pub fn is_terminal(self) -> bool {
        matches!(self, LoopState::Stopped)
    }

    pub(crate) fn as_u8(self) -> u8 {
        self as u8
    }

    /// Values outside the enum never get stored; they decode as `Stopped`.
    pub(crate) fn from_u8(raw: u8) -> Self {
        match raw {
            0 => LoopState::Created,
            1 => LoopState::Running,
            _ => LoopState::Stopped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_stopped_is_terminal() {
        assert!(!LoopState::Created.is_terminal());
        assert!(!LoopState::Running.is_terminal());
        assert!(LoopState::Stopped.is_terminal());
    }

    #[test]
    fn u8_encoding_is_stable() {
        for state in [LoopState::Created, LoopState::Running, LoopState::Stopped] {
            assert_eq!(LoopState::from_u8(state.as_u8()), state);
        }
    }
}
