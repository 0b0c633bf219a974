//! Impls - ports の実装
//!
//! # 実装一覧
//! - **StdoutSink**: 標準出力へ書き込む（CLI 用）
//! - **MemorySink**: メモリに溜める（テスト・埋め込み用）

pub mod memory_sink;
pub mod stdout_sink;

pub use self::memory_sink::MemorySink;
pub use self::stdout_sink::StdoutSink;
