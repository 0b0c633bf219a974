//! MemorySink - 出力をメモリに保持する sink
//!
//! # 学習ポイント
//! - `Arc<Mutex<Vec<_>>>` による共有バッファ
//! - Clone しても同じバッファを指す（ハンドルとして配れる）

use std::sync::{Arc, Mutex, PoisonError};

use crate::ports::OutputSink;

/// MemorySink は書き込まれた行を順番どおり保持
///
/// # 使用例
/// ```ignore
/// let sink = MemorySink::new();
/// let cmd = PrintCommand::new("hello", Arc::new(sink.clone()));
/// // ... loop で実行 ...
/// assert_eq!(sink.lines(), vec!["hello"]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// これまでに書き込まれた行のスナップショット
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_empty(&self) -> bool {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

impl OutputSink for MemorySink {
    fn write_line(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_string());
    }
}
