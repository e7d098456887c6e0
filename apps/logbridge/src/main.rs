//! logbridge entry point.

mod app;
mod cli;
mod config;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Runs detached with no stderr; skip logging and config.
    if matches!(cli.command, Command::ClipboardDaemon) {
        return app::serve_clipboard_daemon();
    }

    // Logs go to stderr; stdout carries tailed lines.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "starting logbridge");

    let config = config::Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Tail { args } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(app::tail(&config, cli::join_arguments(&args)))?;
        }
        Command::Copy { text } => app::copy(text)?,
        Command::ClipboardDaemon => app::serve_clipboard_daemon()?,
    }

    Ok(())
}
