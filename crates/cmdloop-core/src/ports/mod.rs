//! Ports - 抽象化レイヤー
//!
//! コマンドが外部に副作用を出す経路をここで trait として定義します。
//! 実装は `impls` にあります。

pub mod output_sink;

pub use self::output_sink::OutputSink;
