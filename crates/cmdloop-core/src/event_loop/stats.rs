use serde::{Deserialize, Serialize};

use super::LoopState;

/// Point-in-time counters for an event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoopStats {
    pub state: LoopState,
    /// Calls to `post`, including those made by executing commands.
    pub posted: u64,
    pub executed: u64,
    /// Commands still in the queue.
    pub pending: usize,
}
