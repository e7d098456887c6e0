//! Line sources the worker reads from.
//!
//! [`ProcessSource`] runs the real log reader; anything else implementing
//! [`LogSource`] can stand in for it (in-memory streams in tests, a remote
//! `adb logcat` on a desktop host).

use std::process::Stdio;

use tokio::io::{AsyncBufRead, BufReader};
use tokio::process::{Child, Command};

use crate::command::LogCommand;
use crate::error::LogcatError;

/// Buffered reader over the log output.
pub type LineReader = Box<dyn AsyncBufRead + Send + Unpin>;

/// An open log stream and, for subprocess sources, the child producing it.
///
/// The child is killed when the stream is dropped.
pub struct LineStream {
    reader: LineReader,
    child: Option<Child>,
}

impl LineStream {
    /// Wraps an arbitrary buffered reader.
    pub fn new(reader: impl AsyncBufRead + Send + Unpin + 'static) -> Self {
        Self {
            reader: Box::new(reader),
            child: None,
        }
    }

    /// Takes ownership of a spawned child and reads its stdout.
    pub fn from_child(mut child: Child, command: &LogCommand) -> Result<Self, LogcatError> {
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| LogcatError::MissingStdout(command.command_line()))?;
        Ok(Self {
            reader: Box::new(BufReader::new(stdout)),
            child: Some(child),
        })
    }

    pub(crate) fn into_parts(self) -> (LineReader, Option<Child>) {
        (self.reader, self.child)
    }
}

/// Where a worker gets its log lines from.
///
/// Both methods are called on the worker thread, inside its runtime.
pub trait LogSource: Send + Sync + 'static {
    /// Discards everything currently in the log buffer.
    fn clear(&self, command: &LogCommand) -> Result<(), LogcatError>;

    /// Starts producing lines for `command`.
    fn open(&self, command: &LogCommand) -> Result<LineStream, LogcatError>;
}

/// Runs the log reader as a subprocess.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessSource;

impl LogSource for ProcessSource {
    fn clear(&self, command: &LogCommand) -> Result<(), LogcatError> {
        let clear = command.clear_command();
        let program = clear.program().ok_or(LogcatError::EmptyCommand)?;

        // Blocking is fine here: the worker thread owns nothing else yet.
        let status = std::process::Command::new(program)
            .args(clear.program_args())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|source| LogcatError::Spawn {
                command: clear.command_line(),
                source,
            })?;

        if !status.success() {
            tracing::debug!(command = %clear, %status, "log clear exited unsuccessfully");
        }
        Ok(())
    }

    fn open(&self, command: &LogCommand) -> Result<LineStream, LogcatError> {
        let program = command.program().ok_or(LogcatError::EmptyCommand)?;

        let child = Command::new(program)
            .args(command.program_args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| LogcatError::Spawn {
                command: command.command_line(),
                source,
            })?;

        tracing::debug!(command = %command, pid = ?child.id(), "spawned log reader");
        LineStream::from_child(child, command)
    }
}
