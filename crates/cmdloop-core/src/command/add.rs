use std::sync::Arc;

use super::{Command, Handler, PrintCommand};
use crate::impls::StdoutSink;
use crate::ports::OutputSink;

/// Sums two integers and schedules a [`PrintCommand`] with the result.
///
/// The result is not returned to the poster. It shows up later, when the loop
/// reaches the print it scheduled.
#[derive(Debug, Clone)]
pub struct AddCommand {
    a: i64,
    b: i64,
    sink: Arc<dyn OutputSink>,
}

impl AddCommand {
    pub fn new(a: i64, b: i64, sink: Arc<dyn OutputSink>) -> Self {
        Self { a, b, sink }
    }

    pub fn stdout(a: i64, b: i64) -> Self {
        Self::new(a, b, Arc::new(StdoutSink))
    }

    /// Widened so that `i64::MAX + i64::MAX` is still exact.
    pub fn sum(&self) -> i128 {
        i128::from(self.a) + i128::from(self.b)
    }
}

impl Command for AddCommand {
    fn name(&self) -> &'static str {
        "add"
    }

    fn execute(self: Box<Self>, handler: &dyn Handler) {
        let text = self.sum().to_string();
        handler.post(Box::new(PrintCommand::new(text, self.sink)));
    }
}
