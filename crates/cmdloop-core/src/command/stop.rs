use super::{Command, Handler};

/// Requests loop termination when executed.
#[derive(Debug, Default, Clone, Copy)]
pub struct StopCommand;

impl Command for StopCommand {
    fn name(&self) -> &'static str {
        "stop"
    }

    fn execute(self: Box<Self>, handler: &dyn Handler) {
        handler.stop();
    }

    fn is_stop(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::testing::RecordingHandler;

    #[test]
    fn stop_calls_handler_stop_only() {
        let handler = RecordingHandler::default();

        Box::new(StopCommand).execute(&handler);

        assert!(handler.is_stopped());
        assert!(handler.take_posted().is_empty());
    }
}
