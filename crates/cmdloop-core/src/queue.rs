//! CommandQueue - Stop を常に末尾に保つ FIFO キュー
//!
//! # 学習ポイント
//! - Mutex + Condvar による blocking pull
//! - push 時の並べ替えで不変条件を維持する（pull 側では何もしない）
//! - 2 つ目の Condvar で「キューが空で実行中のコマンドもない」を待てる
//!
//! # 不変条件
//! - 保留中の Stop は高々 1 つ
//! - Stop があるなら常に最後の要素

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use crate::command::Command;

/// Everything guarded by the queue lock.
#[derive(Default)]
struct Pending {
    items: VecDeque<Box<dyn Command>>,
    /// A command handed out by `wait_pull` has not been `complete`d yet.
    in_flight: bool,
}

impl Pending {
    fn is_idle(&self) -> bool {
        self.items.is_empty() && !self.in_flight
    }
}

/// CommandQueue は複数スレッドから push され、ワーカーが 1 件ずつ pull する
///
/// # 実装詳細
/// - `VecDeque<Box<dyn Command>>` を Mutex で保護
/// - `ready`: push / stop 時に待機中のワーカーを起こす
/// - `idle`: 最後のコマンドが完了したとき / stop 時に `wait_idle` を起こす
/// - コマンドの実行はロックの外で行う（実行中の再投入がデッドロックしない）
#[derive(Default)]
pub struct CommandQueue {
    pending: Mutex<Pending>,
    ready: Condvar,
    idle: Condvar,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `cmd`, keeping a pending Stop in the last position.
    ///
    /// - last is Stop, `cmd` is not: `cmd` goes in front of the Stop.
    /// - last is Stop, `cmd` is Stop too: `cmd` is dropped.
    /// - otherwise `cmd` is appended.
    pub fn push(&self, cmd: Box<dyn Command>) {
        let mut pending = self.lock();
        let items = &mut pending.items;
        if peek(items).is_some_and(|last| last.is_stop()) {
            if cmd.is_stop() {
                return;
            }
            let at = items.len() - 1;
            items.insert(at, cmd);
        } else {
            items.push_back(cmd);
        }
        drop(pending);
        self.ready.notify_one();
    }

    /// Remove the first command.
    ///
    /// The worker only calls this after seeing a non-empty queue; `None` means
    /// that contract was broken.
    pub fn pull(&self) -> Option<Box<dyn Command>> {
        self.lock().items.pop_front()
    }

    /// Block until a command is available or `is_stopped` reports true.
    ///
    /// `is_stopped` is checked under the lock before every pull, so once it
    /// is true no further command is taken. A returned command counts as in
    /// flight until [`complete`](Self::complete) is called.
    pub fn wait_pull(&self, is_stopped: impl Fn() -> bool) -> Option<Box<dyn Command>> {
        let mut pending = self.lock();
        loop {
            if is_stopped() {
                return None;
            }
            if let Some(cmd) = pending.items.pop_front() {
                pending.in_flight = true;
                return Some(cmd);
            }
            pending = self
                .ready
                .wait(pending)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Mark the command from the last `wait_pull` as finished.
    pub fn complete(&self) {
        let mut pending = self.lock();
        pending.in_flight = false;
        if pending.is_idle() {
            self.idle.notify_all();
        }
    }

    /// Block until the queue is empty with nothing in flight, or `is_stopped`
    /// reports true.
    ///
    /// Calling this from a command running on the worker never returns while
    /// the loop is running, since that command is itself in flight.
    pub fn wait_idle(&self, is_stopped: impl Fn() -> bool) {
        let mut pending = self.lock();
        while !is_stopped() && !pending.is_idle() {
            pending = self
                .idle
                .wait(pending)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Wake every thread blocked in [`wait_pull`](Self::wait_pull) or
    /// [`wait_idle`](Self::wait_idle).
    ///
    /// Takes the lock first so a waiter cannot miss the notification between
    /// its stop check and its wait.
    pub fn wake_all(&self) {
        let _pending = self.lock();
        self.ready.notify_all();
        self.idle.notify_all();
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Pending> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn peek(items: &VecDeque<Box<dyn Command>>) -> Option<&dyn Command> {
    items.back().map(|cmd| &**cmd)
}
