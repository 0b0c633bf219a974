//! Parser - 入力行を Command に変換
//!
//! # 文法
//! - `print <text...>`: 残りのトークンを空白 1 つで連結して出力
//! - `add <a> <b>`: 2 つの整数の和を出力
//! - 空行: コマンドなし
//!
//! 不正な行は `ParseError` として呼び出し側に返し、キューには入れません。

use std::sync::Arc;

use crate::command::{AddCommand, Command, PrintCommand};
use crate::error::ParseError;
use crate::impls::StdoutSink;
use crate::ports::OutputSink;

/// Builds commands that write to a shared sink.
#[derive(Debug, Clone)]
pub struct Parser {
    sink: Arc<dyn OutputSink>,
}

impl Parser {
    pub fn new(sink: Arc<dyn OutputSink>) -> Self {
        Self { sink }
    }

    pub fn stdout() -> Self {
        Self::new(Arc::new(StdoutSink))
    }

    /// Parse one line. `Ok(None)` means the line holds no command.
    pub fn parse(&self, line: &str) -> Result<Option<Box<dyn Command>>, ParseError> {
        let mut tokens = line.split_whitespace();
        let Some(verb) = tokens.next() else {
            return Ok(None);
        };

        let cmd: Box<dyn Command> = match verb {
            "print" => {
                let text = tokens.collect::<Vec<_>>().join(" ");
                if text.is_empty() {
                    return Err(ParseError::MissingArgument {
                        command: "print",
                        argument: "text",
                    });
                }
                Box::new(PrintCommand::new(text, Arc::clone(&self.sink)))
            }
            "add" => {
                let a = integer(tokens.next(), "a")?;
                let b = integer(tokens.next(), "b")?;
                if let Some(extra) = tokens.next() {
                    return Err(ParseError::UnexpectedArgument(extra.to_string()));
                }
                Box::new(AddCommand::new(a, b, Arc::clone(&self.sink)))
            }
            other => return Err(ParseError::UnknownCommand(other.to_string())),
        };
        Ok(Some(cmd))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::stdout()
    }
}

fn integer(token: Option<&str>, argument: &'static str) -> Result<i64, ParseError> {
    let token = token.ok_or(ParseError::MissingArgument {
        command: "add",
        argument,
    })?;
    token.parse().map_err(|source| ParseError::InvalidInteger {
        value: token.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::command::testing::RecordingHandler;
    use crate::impls::MemorySink;

    /// Parse and run `line`, returning what it printed (following one posted print).
    fn run(line: &str) -> Vec<String> {
        let sink = MemorySink::new();
        let parser = Parser::new(Arc::new(sink.clone()));
        let handler = RecordingHandler::default();

        let cmd = parser.parse(line).unwrap().expect("line should hold a command");
        cmd.execute(&handler);
        for posted in handler.take_posted() {
            posted.execute(&handler);
        }
        sink.lines()
    }

    #[rstest]
    #[case("print hello", "hello")]
    #[case("  print   hello   world ", "hello world")]
    #[case("add 2 3", "5")]
    #[case("add -10 4", "-6")]
    #[case("\tadd 0 0", "0")]
    fn valid_lines_produce_commands(#[case] line: &str, #[case] expected: &str) {
        assert_eq!(run(line), vec![expected]);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\t")]
    fn blank_lines_hold_no_command(#[case] line: &str) {
        assert!(Parser::stdout().parse(line).unwrap().is_none());
    }

    #[test]
    fn parsed_command_names_match_verbs() {
        let parser = Parser::new(Arc::new(MemorySink::new()));
        assert_eq!(parser.parse("print x").unwrap().unwrap().name(), "print");
        assert_eq!(parser.parse("add 1 2").unwrap().unwrap().name(), "add");
    }

    #[test]
    fn unknown_verb_is_an_error() {
        let err = Parser::stdout().parse("mul 2 3").err().unwrap();
        assert!(matches!(err, ParseError::UnknownCommand(ref verb) if verb == "mul"));
    }

    #[rstest]
    #[case("print", "text")]
    #[case("add", "a")]
    #[case("add 1", "b")]
    fn missing_arguments_are_reported(#[case] line: &str, #[case] expected: &str) {
        let err = Parser::stdout().parse(line).err().unwrap();
        assert!(
            matches!(err, ParseError::MissingArgument { argument, .. } if argument == expected)
        );
    }

    #[test]
    fn non_integer_operand_is_reported() {
        let err = Parser::stdout().parse("add two 3").err().unwrap();
        assert!(matches!(err, ParseError::InvalidInteger { ref value, .. } if value == "two"));
        assert_eq!(err.to_string(), "`two` is not an integer");
    }

    #[test]
    fn extra_add_operand_is_reported() {
        let err = Parser::stdout().parse("add 1 2 3").err().unwrap();
        assert!(matches!(err, ParseError::UnexpectedArgument(ref arg) if arg == "3"));
    }
}
