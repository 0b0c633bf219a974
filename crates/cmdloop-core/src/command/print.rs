use std::sync::Arc;

use super::{Command, Handler};
use crate::impls::StdoutSink;
use crate::ports::OutputSink;

/// Emits its text as one line on an output sink.
#[derive(Debug, Clone)]
pub struct PrintCommand {
    text: String,
    sink: Arc<dyn OutputSink>,
}

impl PrintCommand {
    pub fn new(text: impl Into<String>, sink: Arc<dyn OutputSink>) -> Self {
        Self {
            text: text.into(),
            sink,
        }
    }

    /// Print to the process's standard output.
    pub fn stdout(text: impl Into<String>) -> Self {
        Self::new(text, Arc::new(StdoutSink))
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Command for PrintCommand {
    fn name(&self) -> &'static str {
        "print"
    }

    fn execute(self: Box<Self>, _handler: &dyn Handler) {
        self.sink.write_line(&self.text);
    }
}
