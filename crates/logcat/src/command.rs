//! Command line construction for the log reader subprocess.

use std::fmt;

/// Base token of the Android log reader.
pub const DEFAULT_BASE_COMMAND: &str = "logcat";

/// Flag that makes logcat flush its ring buffers and exit.
const CLEAR_FLAG: &str = "-c";

/// The command a logcat worker executes.
///
/// Rendered as `base` or `base + " " + arguments`. Tokens are split on
/// whitespace with no quoting, the same way a shell-less exec tokenizes a
/// command string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogCommand {
    base: String,
    arguments: String,
}

impl LogCommand {
    /// Builds a command from a base token and optional caller arguments.
    ///
    /// Arguments are trimmed; blank arguments are dropped entirely.
    pub fn new(base: impl Into<String>, arguments: Option<&str>) -> Self {
        Self {
            base: base.into().trim().to_string(),
            arguments: arguments.map(str::trim).unwrap_or_default().to_string(),
        }
    }

    /// The fixed base command (`logcat` by default).
    pub fn base(&self) -> &str {
        &self.base
    }

    /// The trimmed caller arguments, possibly empty.
    pub fn arguments(&self) -> &str {
        &self.arguments
    }

    /// Renders the full command line.
    pub fn command_line(&self) -> String {
        if self.arguments.is_empty() {
            self.base.clone()
        } else {
            format!("{} {}", self.base, self.arguments)
        }
    }

    /// The program to execute: the first token of the base command.
    ///
    /// Never taken from the caller's arguments, so a blank base yields `None`.
    pub fn program(&self) -> Option<&str> {
        self.base.split_whitespace().next()
    }

    /// Everything after the program: remaining base tokens, then arguments.
    pub fn program_args(&self) -> impl Iterator<Item = &str> {
        self.base
            .split_whitespace()
            .skip(1)
            .chain(self.arguments.split_whitespace())
    }

    /// All whitespace-separated tokens: program first, then its arguments.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.base
            .split_whitespace()
            .chain(self.arguments.split_whitespace())
    }

    /// The command that clears the log buffer (`<base> -c`).
    pub fn clear_command(&self) -> LogCommand {
        LogCommand::new(self.base.clone(), Some(CLEAR_FLAG))
    }
}

impl Default for LogCommand {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_COMMAND, None)
    }
}

impl fmt::Display for LogCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_is_base_only() {
        let cmd = LogCommand::new(DEFAULT_BASE_COMMAND, None);
        assert_eq!(cmd.command_line(), "logcat");
        assert_eq!(cmd.arguments(), "");
    }

    #[test]
    fn arguments_are_trimmed() {
        let cmd = LogCommand::new(DEFAULT_BASE_COMMAND, Some("  -s MyTag  "));
        assert_eq!(cmd.command_line(), "logcat -s MyTag");
    }

    #[test]
    fn blank_arguments_are_dropped() {
        let cmd = LogCommand::new(DEFAULT_BASE_COMMAND, Some(" \t\n "));
        assert_eq!(cmd.command_line(), "logcat");
    }

    #[test]
    fn tokens_split_on_whitespace() {
        let cmd = LogCommand::new("adb logcat", Some("-v  time\t*:W"));
        let tokens: Vec<&str> = cmd.tokens().collect();
        assert_eq!(tokens, ["adb", "logcat", "-v", "time", "*:W"]);
    }

    #[test]
    fn program_comes_from_base_only() {
        let cmd = LogCommand::new("adb logcat", Some("-s Unity"));
        assert_eq!(cmd.program(), Some("adb"));
        let args: Vec<&str> = cmd.program_args().collect();
        assert_eq!(args, ["logcat", "-s", "Unity"]);

        let blank = LogCommand::new("  ", Some("-s Unity"));
        assert_eq!(blank.program(), None);
        assert_eq!(blank.clear_command().program(), None);
    }

    #[test]
    fn clear_command_keeps_base() {
        let cmd = LogCommand::new(DEFAULT_BASE_COMMAND, Some("-s Unity"));
        assert_eq!(cmd.clear_command().command_line(), "logcat -c");
    }

    #[test]
    fn display_matches_command_line() {
        let cmd = LogCommand::new(DEFAULT_BASE_COMMAND, Some("-b main"));
        assert_eq!(cmd.to_string(), "logcat -b main");
    }
}
