//! Host configuration.
//!
//! Stored as TOML:
//! - Linux: `~/.config/logbridge/logbridge.toml`
//! - Windows: `%APPDATA%/logbridge/logbridge.toml`

use std::path::{Path, PathBuf};
use std::time::Duration;

use logbridge_logcat::{DEFAULT_QUEUE_CAPACITY, TailerConfig};
use serde::{Deserialize, Serialize};

/// Host configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Default logcat arguments when none are given on the command line.
    #[serde(default)]
    pub arguments: String,

    /// Prefix printed before every tailed line.
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Lines buffered between drains before the oldest are dropped.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// How often queued lines are written out, in milliseconds.
    #[serde(default = "default_drain_interval_ms")]
    pub drain_interval_ms: u64,

    /// Worker settings.
    #[serde(default)]
    pub tailer: TailerConfig,
}

fn default_prefix() -> String {
    "LOGCAT: ".into()
}

fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}

fn default_drain_interval_ms() -> u64 {
    100
}

impl Default for Config {
    fn default() -> Self {
        Self {
            arguments: String::new(),
            prefix: default_prefix(),
            queue_capacity: default_queue_capacity(),
            drain_interval_ms: default_drain_interval_ms(),
            tailer: TailerConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from `path` (or the default location), writing
    /// defaults there if the file does not exist.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => config_path(),
        };

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            tracing::debug!(path = %path.display(), "configuration loaded");
            Ok(config)
        } else {
            let config = Config::default();
            config.save(&path)?;
            Ok(config)
        }
    }

    /// Writes the configuration to `path`.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    pub fn drain_interval(&self) -> Duration {
        Duration::from_millis(self.drain_interval_ms.max(1))
    }
}

/// Returns the platform-specific configuration file path.
fn config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        PathBuf::from(appdata)
            .join("logbridge")
            .join("logbridge.toml")
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        PathBuf::from(home)
            .join(".config")
            .join("logbridge")
            .join("logbridge.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert!(config.arguments.is_empty());
        assert_eq!(config.prefix, "LOGCAT: ");
        assert_eq!(config.queue_capacity, 1024);
        assert_eq!(config.drain_interval(), Duration::from_millis(100));
        assert_eq!(config.tailer, TailerConfig::default());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml_str = r#"
            arguments = "-s Unity"

            [tailer]
            idle_interval_ms = 250
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.arguments, "-s Unity");
        assert_eq!(config.prefix, "LOGCAT: ");
        assert_eq!(config.tailer.idle_interval_ms, 250);
        assert_eq!(config.tailer.base_command, "logcat");
        assert!(config.tailer.clear_on_start);
    }

    #[test]
    fn missing_file_writes_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("logbridge.toml");

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.prefix, "LOGCAT: ");
        assert!(path.exists());

        let reloaded = Config::load(Some(&path)).unwrap();
        assert_eq!(reloaded.queue_capacity, config.queue_capacity);
        assert_eq!(reloaded.tailer, config.tailer);
    }

    #[test]
    fn save_and_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("logbridge.toml");

        let config = Config {
            arguments: "-b crash".into(),
            tailer: TailerConfig {
                base_command: "adb logcat".into(),
                ..TailerConfig::default()
            },
            ..Config::default()
        };
        config.save(&path).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.arguments, "-b crash");
        assert_eq!(loaded.tailer.base_command, "adb logcat");
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("logbridge.toml");
        std::fs::write(&path, "queue_capacity = \"lots\"").unwrap();
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn config_path_not_empty() {
        assert!(config_path().to_string_lossy().contains("logbridge"));
    }
}
