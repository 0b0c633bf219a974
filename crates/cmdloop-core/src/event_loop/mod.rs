//! EventLoop - 専用ワーカースレッドでコマンドを順番に実行するループ
//!
//! # フロー
//! 1. `start()` でワーカースレッドを 1 本起動
//! 2. ワーカーは `CommandQueue::wait_pull()` で 1 件取り出して実行（キューが空なら待機）
//! 3. 実行中のコマンドは `Handler` 経由で `post` / `stop` できる
//! 4. stopped を観測したらループを抜け、終了シグナルを 1 回だけ送る
//!
//! # 学習ポイント
//! - `Arc` で共有する内部状態（キュー、状態、カウンタ）
//! - `AtomicU8` によるライフサイクル管理
//! - `tokio::sync::oneshot` による「1 回だけ」の終了通知（同期・非同期どちらでも待てる）

mod builder;
mod state;
mod stats;

pub use self::builder::{DEFAULT_THREAD_NAME, EventLoopBuilder};
pub use self::state::LoopState;
pub use self::stats::LoopStats;

use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use tokio::sync::oneshot;
use tracing::{debug, info, info_span, trace, warn};

use crate::command::{Command, Handler, StopCommand};
use crate::error::LoopError;
use crate::queue::CommandQueue;

/// State shared between the owner, every handle and the worker thread.
struct LoopInner {
    queue: CommandQueue,
    state: AtomicU8,
    posted: AtomicU64,
    executed: AtomicU64,
}

impl LoopInner {
    fn new() -> Self {
        Self {
            queue: CommandQueue::new(),
            state: AtomicU8::new(LoopState::Created.as_u8()),
            posted: AtomicU64::new(0),
            executed: AtomicU64::new(0),
        }
    }

    fn state(&self) -> LoopState {
        LoopState::from_u8(self.state.load(Ordering::SeqCst))
    }

    fn is_stopped(&self) -> bool {
        self.state().is_terminal()
    }

    fn post(&self, cmd: Box<dyn Command>) {
        debug!(command = cmd.name(), "post");
        // counted before the push so `executed` can never overtake it
        self.posted.fetch_add(1, Ordering::SeqCst);
        self.queue.push(cmd);
    }

    fn stop(&self) {
        let previous = self
            .state
            .swap(LoopState::Stopped.as_u8(), Ordering::SeqCst);
        if !LoopState::from_u8(previous).is_terminal() {
            info!("event loop stopped");
        }
        // the worker may be parked on an empty queue
        self.queue.wake_all();
    }

    fn wait_idle(&self) -> Result<(), LoopError> {
        if self.state() == LoopState::Created {
            return Err(LoopError::NotStarted);
        }
        self.queue.wait_idle(|| self.is_stopped());
        Ok(())
    }

    fn stats(&self) -> LoopStats {
        // executed first: every execution was counted as posted before it ran
        let executed = self.executed.load(Ordering::SeqCst);
        let posted = self.posted.load(Ordering::SeqCst);
        LoopStats {
            state: self.state(),
            posted,
            executed,
            pending: self.queue.len(),
        }
    }
}

/// Cloneable handle to a running loop.
///
/// This is the [`Handler`] commands receive, and the way producers on other
/// threads post work without owning the [`EventLoop`].
#[derive(Clone)]
pub struct LoopHandle {
    inner: Arc<LoopInner>,
}

impl LoopHandle {
    pub fn state(&self) -> LoopState {
        self.inner.state()
    }

    /// See [`EventLoop::wait_idle`].
    pub fn wait_idle(&self) -> Result<(), LoopError> {
        self.inner.wait_idle()
    }
}

impl Handler for LoopHandle {
    fn post(&self, cmd: Box<dyn Command>) {
        self.inner.post(cmd);
    }

    fn stop(&self) {
        self.inner.stop();
    }
}

/// EventLoop はコマンドキューと専用ワーカースレッドを所有
///
/// # 状態遷移
/// - Created -> Running -> Stopped（Stopped は終端、再起動なし）
///
/// # 使用例
/// ```ignore
/// let event_loop = EventLoop::new();
/// event_loop.start()?;
/// event_loop.post(Box::new(PrintCommand::stdout("hello")));
/// event_loop.post(Box::new(AddCommand::stdout(2, 3)));
/// event_loop.await_finish()?; // "hello", "5" の出力後に戻る
/// ```
pub struct EventLoop {
    inner: Arc<LoopInner>,
    thread_name: String,
    worker: Mutex<Option<JoinHandle<()>>>,
    done_tx: Mutex<Option<oneshot::Sender<()>>>,
    done_rx: Mutex<Option<oneshot::Receiver<()>>>,
}

impl EventLoop {
    /// Idle loop with an empty queue.
    pub fn new() -> Self {
        EventLoopBuilder::new().build()
    }

    pub fn builder() -> EventLoopBuilder {
        EventLoopBuilder::new()
    }

    fn with_thread_name(thread_name: String) -> Self {
        let (done_tx, done_rx) = oneshot::channel();
        Self {
            inner: Arc::new(LoopInner::new()),
            thread_name,
            worker: Mutex::new(None),
            done_tx: Mutex::new(Some(done_tx)),
            done_rx: Mutex::new(Some(done_rx)),
        }
    }

    /// Launch the worker thread. Does not block.
    ///
    /// Only valid from `Created`; any later call fails with
    /// [`LoopError::AlreadyStarted`].
    pub fn start(&self) -> Result<(), LoopError> {
        self.inner
            .state
            .compare_exchange(
                LoopState::Created.as_u8(),
                LoopState::Running.as_u8(),
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .map_err(|actual| LoopError::AlreadyStarted(LoopState::from_u8(actual)))?;

        let done = lock(&self.done_tx).take();
        let inner = Arc::clone(&self.inner);
        let spawned = thread::Builder::new()
            .name(self.thread_name.clone())
            .spawn(move || run_worker(inner, done));

        match spawned {
            Ok(join) => {
                *lock(&self.worker) = Some(join);
                info!(thread = %self.thread_name, "event loop started");
                Ok(())
            }
            Err(e) => {
                self.inner
                    .state
                    .store(LoopState::Stopped.as_u8(), Ordering::SeqCst);
                Err(LoopError::SpawnWorker(e))
            }
        }
    }

    /// Request termination.
    ///
    /// Queued commands are neither run nor cancelled; the worker simply stops
    /// pulling once it sees the new state.
    pub fn stop(&self) {
        self.inner.stop();
    }

    /// Enqueue one command. Never waits for the worker.
    pub fn post(&self, cmd: Box<dyn Command>) {
        self.inner.post(cmd);
    }

    /// Block until every posted command, and everything those commands
    /// posted, has executed, or until the loop stops.
    ///
    /// Unlike [`await_finish`](Self::await_finish) the loop keeps running.
    /// Must not be called from a command; the caller would wait on itself.
    pub fn wait_idle(&self) -> Result<(), LoopError> {
        self.inner.wait_idle()
    }

    /// Post a Stop, then block until the worker has exited.
    ///
    /// Everything posted before this call, and everything those commands post
    /// in turn, has executed when it returns. Must not be called from inside
    /// an async runtime; use [`finish`](Self::finish) there.
    pub fn await_finish(&self) -> Result<(), LoopError> {
        let done = self.request_finish()?;
        done.blocking_recv().map_err(|_| LoopError::WorkerLost)?;
        self.join_worker();
        Ok(())
    }

    /// Async form of [`await_finish`](Self::await_finish).
    ///
    /// The worker is joined on tokio's blocking pool, so this must run inside
    /// a tokio runtime.
    pub async fn finish(&self) -> Result<(), LoopError> {
        let done = self.request_finish()?;
        done.await.map_err(|_| LoopError::WorkerLost)?;

        let join = lock(&self.worker).take();
        if let Some(join) = join {
            let joined = tokio::task::spawn_blocking(move || join.join()).await;
            if !matches!(joined, Ok(Ok(()))) {
                warn!(thread = %self.thread_name, "worker thread panicked after signalling");
            }
        }
        Ok(())
    }

    pub fn handle(&self) -> LoopHandle {
        LoopHandle {
            inner: Arc::clone(&self.inner),
        }
    }

    pub fn state(&self) -> LoopState {
        self.inner.state()
    }

    pub fn stats(&self) -> LoopStats {
        self.inner.stats()
    }

    pub fn thread_name(&self) -> &str {
        &self.thread_name
    }

    fn request_finish(&self) -> Result<oneshot::Receiver<()>, LoopError> {
        // the sender moves to the worker on start; still here means no worker
        // was ever spawned, even if `stop` already made the state terminal
        if lock(&self.done_tx).is_some() {
            return Err(LoopError::NotStarted);
        }
        let done = lock(&self.done_rx)
            .take()
            .ok_or(LoopError::AlreadyFinished)?;
        self.post(Box::new(StopCommand));
        Ok(done)
    }

    fn join_worker(&self) {
        let Some(join) = lock(&self.worker).take() else {
            return;
        };
        if join.join().is_err() {
            warn!(thread = %self.thread_name, "worker thread panicked after signalling");
        }
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl Handler for EventLoop {
    fn post(&self, cmd: Box<dyn Command>) {
        self.inner.post(cmd);
    }

    fn stop(&self) {
        self.inner.stop();
    }
}

impl Drop for EventLoop {
    fn drop(&mut self) {
        if self.state() == LoopState::Running {
            self.inner.stop();
        }
    }
}

/// Marks the loop stopped when the worker returns or unwinds.
struct StopOnExit<'a>(&'a LoopInner);

impl Drop for StopOnExit<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            warn!("command panicked; worker exiting");
        }
        self.0.stop();
    }
}

fn run_worker(inner: Arc<LoopInner>, done: Option<oneshot::Sender<()>>) {
    let current = thread::current();
    let span = info_span!("event_loop", thread = current.name().unwrap_or(DEFAULT_THREAD_NAME));
    let _enter = span.enter();

    let handle = LoopHandle { inner };
    let inner = &handle.inner;
    // dropped before `done`, so waiters see Stopped even after a panic
    let _stop_on_exit = StopOnExit(inner);
    debug!("worker started");

    while let Some(cmd) = inner.queue.wait_pull(|| inner.is_stopped()) {
        trace!(command = cmd.name(), "execute");
        cmd.execute(&handle);
        inner.executed.fetch_add(1, Ordering::SeqCst);
        inner.queue.complete();
    }

    let stats = inner.stats();
    debug!(
        executed = stats.executed,
        abandoned = stats.pending,
        "worker exiting"
    );
    if let Some(done) = done {
        // the owner may have been dropped without waiting
        let _ = done.send(());
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
