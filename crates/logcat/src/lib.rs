//! System log tailing: run `logcat` on a background worker and forward each
//! new line to a receiver.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use logbridge_logcat::{LogQueue, LogTailer};
//!
//! let queue = Arc::new(LogQueue::new());
//! let mut tailer = LogTailer::new();
//! tailer.start(Some(queue.clone()), Some("-s Unity"));
//!
//! while let Some(line) = queue.next_log() {
//!     println!("LOGCAT: {line}");
//! }
//! tailer.stop();
//! ```

mod command;
mod config;
mod error;
mod queue;
mod source;
mod tailer;

pub use command::{DEFAULT_BASE_COMMAND, LogCommand};
pub use config::TailerConfig;
pub use error::LogcatError;
pub use queue::{DEFAULT_QUEUE_CAPACITY, LogQueue};
pub use source::{LineReader, LineStream, LogSource, ProcessSource};
pub use tailer::{LogReceiver, LogTailer, WorkerStatus};
