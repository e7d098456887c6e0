//! Wires the logcat tailer and clipboard writer to the terminal.

use std::io::{Read, Write};
use std::sync::Arc;

use logbridge_logcat::{LogQueue, LogTailer, WorkerStatus};
use tokio::time::MissedTickBehavior;

use crate::config::Config;

/// Tails the system log to stdout until Ctrl-C or until the worker ends.
pub async fn tail(config: &Config, arguments: Option<String>) -> anyhow::Result<()> {
    let queue = Arc::new(LogQueue::with_capacity(config.queue_capacity));
    let mut tailer = LogTailer::with_config(config.tailer.clone());

    let arguments = arguments.unwrap_or_else(|| config.arguments.clone());
    tailer.start(Some(queue.clone()), Some(arguments.as_str()));

    let Some(mut status) = tailer.subscribe() else {
        anyhow::bail!("logcat worker was not started");
    };
    if let Some(command) = tailer.command() {
        tracing::info!(command = %command, "tailing system log");
    }

    let mut ticker = tokio::time::interval(config.drain_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                tracing::info!("interrupted");
                break;
            }
            _ = ticker.tick() => {
                flush(&queue, &config.prefix)?;
                if status.borrow_and_update().is_terminal() {
                    break;
                }
            }
        }
    }

    tailer.stop();
    flush(&queue, &config.prefix)?;

    match tailer.status() {
        Some(WorkerStatus::Failed(reason)) => anyhow::bail!("log tailing failed: {reason}"),
        Some(WorkerStatus::Finished) => {
            tracing::info!("log reader exited");
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Writes every queued line to stdout.
fn flush(queue: &LogQueue, prefix: &str) -> std::io::Result<()> {
    flush_to(&mut std::io::stdout().lock(), queue, prefix)
}

fn flush_to<W: Write>(out: &mut W, queue: &LogQueue, prefix: &str) -> std::io::Result<()> {
    let dropped = queue.take_dropped();
    if dropped > 0 {
        tracing::warn!(dropped, "log queue overflowed, oldest lines dropped");
    }

    let lines = queue.drain();
    if lines.is_empty() {
        return Ok(());
    }
    write_lines(out, &lines, prefix)
}

fn write_lines<W: Write>(out: &mut W, lines: &[String], prefix: &str) -> std::io::Result<()> {
    for line in lines {
        writeln!(out, "{prefix}{line}")?;
    }
    out.flush()
}

/// Copies `text` (or stdin) to the system clipboard.
pub fn copy(text: Option<String>) -> anyhow::Result<()> {
    let text = match text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    // The X11/Wayland selection dies with its owner, so a helper keeps it.
    #[cfg(target_os = "linux")]
    {
        let exe = std::env::current_exe()?;
        let mut daemon = std::process::Command::new(exe);
        daemon.arg("clipboard-daemon");
        hand_off(daemon, &text)?;
        tracing::info!(len = text.len(), "copied to clipboard");
        Ok(())
    }

    #[cfg(all(not(target_os = "linux"), not(target_os = "android")))]
    {
        let clipboard = logbridge_clipboard::SystemClipboard::new()?;
        logbridge_clipboard::copy_text(&clipboard, &text);
        tracing::info!(len = text.len(), "copied to clipboard");
        Ok(())
    }

    #[cfg(target_os = "android")]
    {
        let _ = text;
        anyhow::bail!("no system clipboard backend on this platform")
    }
}

/// Sends `text` to a clipboard helper and waits until it owns the clipboard.
///
/// The helper is left running; it exits once its contents are replaced.
#[cfg(any(target_os = "linux", all(test, unix)))]
fn hand_off(mut daemon: std::process::Command, text: &str) -> anyhow::Result<()> {
    use std::io::BufRead;
    use std::process::Stdio;

    let mut child = daemon
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()?;

    let Some(mut stdin) = child.stdin.take() else {
        anyhow::bail!("clipboard helper has no stdin");
    };
    stdin.write_all(text.as_bytes())?;
    drop(stdin);

    let Some(stdout) = child.stdout.take() else {
        anyhow::bail!("clipboard helper has no stdout");
    };
    let mut reply = String::new();
    std::io::BufReader::new(stdout).read_line(&mut reply)?;

    if reply.trim_end() != DAEMON_READY {
        let status = child.wait()?;
        anyhow::bail!("clipboard helper failed ({status})");
    }
    Ok(())
}

#[cfg(any(target_os = "linux", all(test, unix)))]
const DAEMON_READY: &str = "ready";

/// Takes stdin onto the clipboard, reports readiness, then holds it.
pub fn serve_clipboard_daemon() -> anyhow::Result<()> {
    #[cfg(target_os = "linux")]
    {
        use logbridge_clipboard::{ClipData, ClipboardService, LOG_LABEL, SystemClipboard};

        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;

        let clipboard = SystemClipboard::new()?;
        clipboard.set_primary_clip(ClipData::new_plain_text(LOG_LABEL, text.clone()))?;

        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{DAEMON_READY}")?;
        stdout.flush()?;
        drop(stdout);

        clipboard.hold_text(text)?;
        Ok(())
    }

    #[cfg(not(target_os = "linux"))]
    {
        anyhow::bail!("clipboard helper is only used on Linux")
    }
}

#[cfg(test)]
mod tests {
    use logbridge_logcat::LogReceiver;

    use super::*;

    #[test]
    fn write_lines_prefixes_each_line() {
        let mut out = Vec::new();
        let lines = vec!["I/Unity: ready".to_string(), "W/Ads: slow".to_string()];
        write_lines(&mut out, &lines, "LOGCAT: ").unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "LOGCAT: I/Unity: ready\nLOGCAT: W/Ads: slow\n"
        );
    }

    #[test]
    fn flush_empties_queue() {
        let queue = LogQueue::with_capacity(1);
        queue.on_log_received("a");
        queue.on_log_received("b");

        let mut out = Vec::new();
        flush_to(&mut out, &queue, "").unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "b\n");
        assert!(queue.is_empty());
        assert_eq!(queue.take_dropped(), 0);
    }

    #[test]
    fn flush_of_empty_queue_writes_nothing() {
        let queue = LogQueue::with_capacity(4);
        let mut out = Vec::new();
        flush_to(&mut out, &queue, "LOGCAT: ").unwrap();
        assert!(out.is_empty());
    }

    #[cfg(unix)]
    fn shell(script: &str) -> std::process::Command {
        let mut cmd = std::process::Command::new("sh");
        cmd.arg("-c").arg(script);
        cmd
    }

    #[cfg(unix)]
    #[test]
    fn hand_off_returns_once_helper_is_ready() {
        // The helper consumes all of stdin before answering.
        hand_off(shell("cat >/dev/null; echo ready"), "copied text").unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn hand_off_fails_when_helper_exits_silently() {
        let err = hand_off(shell("cat >/dev/null; exit 1"), "copied text").unwrap_err();
        assert!(err.to_string().contains("clipboard helper failed"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn tail_ends_when_reader_exits() {
        use logbridge_logcat::TailerConfig;

        // `echo` stands in for logcat: prints its arguments and exits.
        let config = Config {
            drain_interval_ms: 10,
            tailer: TailerConfig {
                base_command: "echo".into(),
                idle_interval_ms: 10,
                clear_on_start: false,
            },
            ..Config::default()
        };

        tokio::time::timeout(
            std::time::Duration::from_secs(5),
            tail(&config, Some("hello".into())),
        )
        .await
        .unwrap()
        .unwrap();
    }

    #[tokio::test]
    async fn tail_reports_spawn_failure() {
        let config = Config {
            drain_interval_ms: 10,
            tailer: logbridge_logcat::TailerConfig {
                base_command: "logbridge-no-such-program".into(),
                idle_interval_ms: 10,
                clear_on_start: false,
            },
            ..Config::default()
        };

        let result = tokio::time::timeout(std::time::Duration::from_secs(5), tail(&config, None))
            .await
            .unwrap();
        assert!(result.is_err());
    }
}
