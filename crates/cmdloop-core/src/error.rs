use std::io;
use std::num::ParseIntError;

use thiserror::Error;

use crate::event_loop::LoopState;

/// Errors reported by the event loop lifecycle.
#[derive(Debug, Error)]
pub enum LoopError {
    #[error("event loop cannot start from state={0:?}")]
    AlreadyStarted(LoopState),

    #[error("event loop was never started")]
    NotStarted,

    #[error("failed to spawn worker thread: {0}")]
    SpawnWorker(#[source] io::Error),

    #[error("event loop termination was already awaited")]
    AlreadyFinished,

    #[error("worker thread exited without signalling termination")]
    WorkerLost,
}

/// Errors produced while turning an input line into a command.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    #[error("`{command}` is missing argument <{argument}>")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("`{value}` is not an integer")]
    InvalidInteger {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("unexpected argument `{0}`")]
    UnexpectedArgument(String),
}
