//! Command line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "logbridge", version, about = "Tail the system log and copy text to the clipboard")]
pub struct Cli {
    /// Configuration file (defaults to the per-user config path).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Tail the system log until interrupted.
    Tail {
        /// Extra logcat arguments, e.g. `-s Unity`. Overrides the configured ones.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Copy text to the clipboard. Reads stdin when TEXT is omitted.
    Copy { text: Option<String> },
    /// Holds clipboard contents read from stdin until replaced.
    #[command(hide = true)]
    ClipboardDaemon,
}

/// Joins trailing arguments back into a single logcat argument string.
pub fn join_arguments(args: &[String]) -> Option<String> {
    if args.is_empty() {
        None
    } else {
        Some(args.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tail_with_hyphenated_arguments() {
        let cli = Cli::try_parse_from(["logbridge", "tail", "-s", "Unity", "*:W"]).unwrap();
        let Command::Tail { args } = cli.command else {
            panic!("expected tail");
        };
        assert_eq!(join_arguments(&args).as_deref(), Some("-s Unity *:W"));
    }

    #[test]
    fn tail_without_arguments() {
        let cli = Cli::try_parse_from(["logbridge", "tail"]).unwrap();
        let Command::Tail { args } = cli.command else {
            panic!("expected tail");
        };
        assert_eq!(join_arguments(&args), None);
    }

    #[test]
    fn global_config_flag() {
        let cli =
            Cli::try_parse_from(["logbridge", "--config", "/tmp/lb.toml", "copy", "hi"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/lb.toml")));
        assert!(matches!(cli.command, Command::Copy { text: Some(ref t) } if t == "hi"));
    }

    #[test]
    fn clipboard_daemon_is_hidden() {
        let cli = Cli::try_parse_from(["logbridge", "clipboard-daemon"]).unwrap();
        assert!(matches!(cli.command, Command::ClipboardDaemon));

        let help = <Cli as clap::CommandFactory>::command()
            .render_help()
            .to_string();
        assert!(!help.contains("clipboard-daemon"));
    }

    #[test]
    fn copy_text_is_optional() {
        let cli = Cli::try_parse_from(["logbridge", "copy"]).unwrap();
        assert!(matches!(cli.command, Command::Copy { text: None }));
    }
}
