//! Background logcat tailer.
//!
//! Each `start` spawns a dedicated worker thread that clears the log buffer,
//! launches the log reader and forwards every line to the receiver. The
//! worker drains whatever output is ready, then sleeps for the idle interval
//! before draining again. `stop` only cancels the worker's token; it never
//! waits for the thread or the subprocess.

use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::command::LogCommand;
use crate::config::TailerConfig;
use crate::error::LogcatError;
use crate::source::{LogSource, ProcessSource};

/// Name given to worker threads.
const WORKER_THREAD_NAME: &str = "logcat-worker";

/// Consumes log lines.
///
/// Called on the worker thread; hosts that need lines on a specific thread
/// must marshal them (see [`LogQueue`](crate::LogQueue)).
pub trait LogReceiver: Send + Sync {
    fn on_log_received(&self, line: &str);
}

impl<F> LogReceiver for F
where
    F: Fn(&str) + Send + Sync,
{
    fn on_log_received(&self, line: &str) {
        self(line)
    }
}

/// Lifecycle of a single worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerStatus {
    /// Clearing, spawning or reading.
    Running,
    /// Cancelled through `stop` (or a replacing `start`).
    Stopped,
    /// The log reader closed its output.
    Finished,
    /// Spawning or reading failed; the worker gave up.
    Failed(String),
}

impl WorkerStatus {
    /// Returns `true` once the worker will deliver no more lines.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, WorkerStatus::Running)
    }
}

/// Controller-side handle of the active worker.
struct Worker {
    command: LogCommand,
    cancel: CancellationToken,
}

/// Tails the system log on a background worker.
///
/// At most one worker is active per tailer; starting again replaces it.
pub struct LogTailer {
    config: TailerConfig,
    source: Arc<dyn LogSource>,
    worker: Option<Worker>,
    /// Status of the active worker, or of the last one started.
    status: Option<watch::Receiver<WorkerStatus>>,
}

impl LogTailer {
    /// Creates a tailer running the system `logcat` with default settings.
    pub fn new() -> Self {
        Self::with_config(TailerConfig::default())
    }

    /// Creates a tailer running the configured log reader as a subprocess.
    pub fn with_config(config: TailerConfig) -> Self {
        Self::with_source(config, ProcessSource)
    }

    /// Creates a tailer that reads lines from `source`.
    pub fn with_source(config: TailerConfig, source: impl LogSource) -> Self {
        Self {
            config,
            source: Arc::new(source),
            worker: None,
            status: None,
        }
    }

    /// Starts tailing, replacing any active worker.
    ///
    /// Without a receiver this only stops the previous worker. Arguments are
    /// trimmed and appended to the base command after a single space.
    pub fn start(&mut self, receiver: Option<Arc<dyn LogReceiver>>, arguments: Option<&str>) {
        self.stop();

        let Some(receiver) = receiver else {
            tracing::debug!("no log receiver given, not starting logcat worker");
            return;
        };

        let command = LogCommand::new(self.config.base_command.as_str(), arguments);
        let cancel = CancellationToken::new();
        let (status_tx, status_rx) = watch::channel(WorkerStatus::Running);

        let ctx = WorkerContext {
            command: command.clone(),
            source: Arc::clone(&self.source),
            receiver,
            cancel: cancel.clone(),
            status: status_tx,
            idle_interval: self.config.idle_interval(),
            clear_on_start: self.config.clear_on_start,
        };

        let spawned = std::thread::Builder::new()
            .name(WORKER_THREAD_NAME.into())
            .spawn(move || ctx.run());

        match spawned {
            Ok(_) => {
                tracing::info!(command = %command, "started logcat worker");
                self.worker = Some(Worker { command, cancel });
                self.status = Some(status_rx);
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to spawn logcat worker thread");
                let (_, failed) = watch::channel(WorkerStatus::Failed(e.to_string()));
                self.status = Some(failed);
            }
        }
    }

    /// Signals the active worker to stop. Does not wait for it.
    pub fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            worker.cancel.cancel();
            tracing::info!(command = %worker.command, "stopped logcat worker");
        }
    }

    /// Returns `true` while a worker is held and still running.
    pub fn is_running(&self) -> bool {
        self.worker.is_some()
            && self
                .status
                .as_ref()
                .is_some_and(|rx| *rx.borrow() == WorkerStatus::Running)
    }

    /// Command of the active worker.
    pub fn command(&self) -> Option<&LogCommand> {
        self.worker.as_ref().map(|w| &w.command)
    }

    /// Current status of the active (or most recent) worker.
    pub fn status(&self) -> Option<WorkerStatus> {
        self.status.as_ref().map(|rx| rx.borrow().clone())
    }

    /// Subscribes to status changes of the active (or most recent) worker.
    pub fn subscribe(&self) -> Option<watch::Receiver<WorkerStatus>> {
        self.status.clone()
    }
}

impl Default for LogTailer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for LogTailer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Everything a worker thread owns.
struct WorkerContext {
    command: LogCommand,
    source: Arc<dyn LogSource>,
    receiver: Arc<dyn LogReceiver>,
    cancel: CancellationToken,
    status: watch::Sender<WorkerStatus>,
    idle_interval: Duration,
    clear_on_start: bool,
}

/// Outcome of one drain cycle.
enum Drain {
    /// No more output ready right now.
    Idle,
    Cancelled,
    Eof,
    Failed(LogcatError),
}

impl WorkerContext {
    /// Thread entry point.
    fn run(self) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build();

        let status = match runtime {
            Ok(rt) => rt.block_on(self.tail()),
            Err(e) => {
                let err = LogcatError::Runtime(e);
                tracing::warn!(error = %err, "logcat worker could not start");
                WorkerStatus::Failed(err.to_string())
            }
        };

        tracing::debug!(command = %self.command, ?status, "logcat worker exited");
        self.status.send_replace(status);
    }

    async fn tail(&self) -> WorkerStatus {
        if self.clear_on_start
            && let Err(e) = self.source.clear(&self.command)
        {
            tracing::warn!(error = %e, "failed to clear log buffer");
        }

        if self.cancel.is_cancelled() {
            return WorkerStatus::Stopped;
        }

        let stream = match self.source.open(&self.command) {
            Ok(stream) => stream,
            Err(e) => {
                tracing::warn!(command = %self.command, error = %e, "failed to open log stream");
                return WorkerStatus::Failed(e.to_string());
            }
        };

        // Keep the child alive for as long as we read from it.
        let (mut reader, _child) = stream.into_parts();
        let mut pending = Vec::new();

        while !self.cancel.is_cancelled() {
            match drain(
                &mut reader,
                &mut pending,
                &self.cancel,
                self.receiver.as_ref(),
            ) {
                Drain::Idle => {}
                Drain::Cancelled => break,
                Drain::Eof => return WorkerStatus::Finished,
                Drain::Failed(e) => {
                    tracing::warn!(command = %self.command, error = %e, "log stream failed");
                    return WorkerStatus::Failed(e.to_string());
                }
            }

            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = tokio::time::sleep(self.idle_interval) => {}
            }
        }

        WorkerStatus::Stopped
    }
}

/// Delivers every line that is ready without waiting.
///
/// `pending` carries a partially read line across cycles; `read_until` is
/// cancel-safe, so bytes read before a dropped poll stay in it. Reads run
/// outside the co-op budget so a long burst is drained in one cycle.
fn drain<R>(
    reader: &mut R,
    pending: &mut Vec<u8>,
    cancel: &CancellationToken,
    receiver: &dyn LogReceiver,
) -> Drain
where
    R: AsyncBufRead + Unpin + ?Sized,
{
    loop {
        if cancel.is_cancelled() {
            return Drain::Cancelled;
        }

        let read = tokio::task::unconstrained(reader.read_until(b'\n', pending)).now_or_never();
        match read {
            None => return Drain::Idle,
            Some(Ok(0)) => {
                if !pending.is_empty() {
                    deliver(pending, receiver);
                }
                return Drain::Eof;
            }
            // Either a full line or the unterminated tail before EOF.
            Some(Ok(_)) => deliver(pending, receiver),
            Some(Err(e)) => return Drain::Failed(e.into()),
        }
    }
}

/// Hands one raw line to the receiver and resets the buffer.
///
/// Invalid UTF-8 is replaced rather than treated as a read failure.
fn deliver(pending: &mut Vec<u8>, receiver: &dyn LogReceiver) {
    let mut line: &[u8] = pending;
    if let Some(rest) = line.strip_suffix(b"\n") {
        line = rest;
    }
    if let Some(rest) = line.strip_suffix(b"\r") {
        line = rest;
    }
    receiver.on_log_received(&String::from_utf8_lossy(line));
    pending.clear();
}
