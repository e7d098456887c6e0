//! Tailer configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::command::DEFAULT_BASE_COMMAND;

/// Settings shared by every worker a [`LogTailer`](crate::LogTailer) starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TailerConfig {
    /// Program (and fixed leading arguments) of the log reader.
    #[serde(default = "default_base_command")]
    pub base_command: String,

    /// Sleep between drain cycles when no output is pending, in milliseconds.
    #[serde(default = "default_idle_interval_ms")]
    pub idle_interval_ms: u64,

    /// Clear the log buffer before tailing so only new lines are delivered.
    #[serde(default = "default_true")]
    pub clear_on_start: bool,
}

fn default_base_command() -> String {
    DEFAULT_BASE_COMMAND.into()
}

fn default_idle_interval_ms() -> u64 {
    1000
}

fn default_true() -> bool {
    true
}

impl Default for TailerConfig {
    fn default() -> Self {
        Self {
            base_command: default_base_command(),
            idle_interval_ms: default_idle_interval_ms(),
            clear_on_start: default_true(),
        }
    }
}

impl TailerConfig {
    /// Idle sleep as a [`Duration`].
    pub fn idle_interval(&self) -> Duration {
        Duration::from_millis(self.idle_interval_ms)
    }
}
