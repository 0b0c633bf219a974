//! cmdloop-core
//!
//! Core building blocks for the command event loop.
//!
//! # モジュール構成
//! - **command**: `Command` / `Handler` trait と組み込みコマンド（Print, Add, Stop）
//! - **queue**: `CommandQueue`（Stop を常に末尾に保つ FIFO キュー）
//! - **event_loop**: `EventLoop`（専用ワーカースレッド + ライフサイクル管理）
//! - **ports**: 抽象化レイヤー（OutputSink）
//! - **impls**: 実装（StdoutSink, MemorySink）
//! - **parse**: 入力行 → `Command` の変換
//! - **error**: エラー型

pub mod command;
pub mod error;
pub mod event_loop;
pub mod impls;
pub mod parse;
pub mod ports;
pub mod queue;

pub use command::{AddCommand, Command, Handler, PrintCommand, StopCommand};
pub use error::{LoopError, ParseError};
pub use event_loop::{EventLoop, EventLoopBuilder, LoopHandle, LoopState, LoopStats};
pub use parse::Parser;
pub use queue::CommandQueue;
