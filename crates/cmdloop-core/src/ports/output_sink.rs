//! OutputSink port - コマンド出力の書き込み先
//!
//! `PrintCommand` はこの trait を通してのみ出力します。
//! 本番では `StdoutSink`、テストでは `MemorySink` を差し込みます。

use std::fmt;

/// OutputSink は 1 行単位の出力先
///
/// # 設計原則
/// - ワーカースレッドから呼ばれるため `Send + Sync`
/// - 失敗は呼び出し側に返さない（出力は常に可能とみなす）。実装側でログに残す
pub trait OutputSink: Send + Sync + fmt::Debug {
    fn write_line(&self, line: &str);
}

