//! Error types for the logcat worker.

/// Errors that end a logcat worker.
///
/// None of these are returned to the caller of `LogTailer::start`; they are
/// recorded in the worker's terminal [`WorkerStatus`](crate::WorkerStatus).
#[derive(Debug, thiserror::Error)]
pub enum LogcatError {
    #[error("log command is empty")]
    EmptyCommand,

    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{0}` has no stdout pipe")]
    MissingStdout(String),

    #[error("failed to read log output: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to build worker runtime: {0}")]
    Runtime(#[source] std::io::Error),
}
