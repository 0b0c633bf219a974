//! Command - イベントループで実行される作業単位
//!
//! # 二層構造
//! - **Command**: 自分自身を実行する（`execute`）。ワーカーは種類で分岐しない
//! - **Handler**: 実行中のコマンドに渡される capability（`post`, `stop`）
//!
//! # 学習ポイント
//! - `self: Box<Self>` による「ちょうど 1 回だけ実行」の保証
//! - Object-safe trait（`Box<dyn Command>` としてキューに積める）
//! - open dispatch: 新しいコマンドはループ側を変更せずに追加できる

mod add;
mod print;
mod stop;

pub use self::add::AddCommand;
pub use self::print::PrintCommand;
pub use self::stop::StopCommand;

/// Command はワーカースレッド上で 1 回だけ実行される
///
/// # 使用例
/// ```ignore
/// struct Hello;
///
/// impl Command for Hello {
///     fn name(&self) -> &'static str {
///         "hello"
///     }
///
///     fn execute(self: Box<Self>, handler: &dyn Handler) {
///         handler.post(Box::new(PrintCommand::stdout("hello")));
///     }
/// }
/// ```
pub trait Command: Send {
    /// Stable name used in logs.
    fn name(&self) -> &'static str;

    /// Runs the command on the worker thread.
    ///
    /// Consumes the command, so it cannot be executed twice.
    fn execute(self: Box<Self>, handler: &dyn Handler);

    /// Marks a termination request.
    ///
    /// The queue keeps a command reporting `true` behind every later push.
    fn is_stop(&self) -> bool {
        false
    }
}

/// Handler は実行中のコマンドがループに働きかけるための capability
///
/// # 実装
/// - `EventLoop` と `LoopHandle` のみが実装する
/// - `post` はワーカーを待たない（実行中のコマンドから呼んでもデッドロックしない）
pub trait Handler: Send + Sync {
    /// Enqueue a command behind everything already posted.
    fn post(&self, cmd: Box<dyn Command>);

    /// Request loop termination.
    fn stop(&self);
}
