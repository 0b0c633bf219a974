//! EventLoopBuilder - イベントループの構築
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - `spawn()` で構築と起動をまとめる（起動失敗は Result で返す）

use super::EventLoop;
use crate::error::LoopError;

/// Name given to the worker thread unless configured otherwise.
pub const DEFAULT_THREAD_NAME: &str = "cmdloop-worker";

/// EventLoopBuilder はワーカースレッドの設定を持つ
///
/// # 使用例
/// ```ignore
/// let event_loop = EventLoopBuilder::new()
///     .thread_name("my-loop")
///     .spawn()?;
/// ```
#[derive(Debug, Clone)]
pub struct EventLoopBuilder {
    thread_name: String,
}

impl EventLoopBuilder {
    pub fn new() -> Self {
        Self {
            thread_name: DEFAULT_THREAD_NAME.to_string(),
        }
    }

    /// ワーカースレッド名を設定
    ///
    /// NUL 文字はスレッド名に使えないため取り除く
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        let name: String = name.into().chars().filter(|&c| c != '\0').collect();
        if !name.is_empty() {
            self.thread_name = name;
        }
        self
    }

    /// 起動前（Created）の EventLoop を生成
    pub fn build(self) -> EventLoop {
        EventLoop::with_thread_name(self.thread_name)
    }

    /// EventLoop を生成して起動
    pub fn spawn(self) -> Result<EventLoop, LoopError> {
        let event_loop = self.build();
        event_loop.start()?;
        Ok(event_loop)
    }
}

impl Default for EventLoopBuilder {
    fn default() -> Self {
        Self::new()
    }
}
