//! Tracing setup: stderr output plus an optional log file.
//!
//! The file layer is enabled by `MEDIA_TOOLS_LOG_PATH` (exact file),
//! `MEDIA_TOOLS_LOG_DIR` (directory, default file name), the configured
//! `log_dir`, or an explicit override such as `update-tools` uses.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LOG_PATH_ENV: &str = "MEDIA_TOOLS_LOG_PATH";
const LOG_DIR_ENV: &str = "MEDIA_TOOLS_LOG_DIR";
const LOG_FILE_NAME: &str = "media-tools.log";

/// Where log output goes besides stderr.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// File that receives a plain-text copy of every event.
    pub log_file: Option<PathBuf>,
}

impl ObservabilityConfig {
    /// Resolve the log file from the environment, falling back to the
    /// configured log directory.
    pub fn from_env_with_overrides(config_log_dir: Option<PathBuf>) -> Self {
        let from_env = |name: &str| std::env::var_os(name).filter(|v| !v.is_empty());
        let log_file = from_env(LOG_PATH_ENV)
            .map(PathBuf::from)
            .or_else(|| from_env(LOG_DIR_ENV).map(|dir| PathBuf::from(dir).join(LOG_FILE_NAME)))
            .or_else(|| config_log_dir.map(|dir| dir.join(LOG_FILE_NAME)));
        Self { log_file }
    }

    /// Send file output to `path` regardless of the environment.
    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }
}

/// Build the event filter.
///
/// `-q` and `-v` win over `RUST_LOG`, which wins over the configured level.
pub fn env_filter(quiet: bool, verbose: u8, default_level: &str) -> EnvFilter {
    if quiet {
        return EnvFilter::new("error");
    }
    match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    }
}

/// Install the global subscriber.
///
/// Keep the returned guard alive until exit so buffered file output is
/// flushed.
pub fn init_observability(
    config: &ObservabilityConfig,
    filter: EnvFilter,
) -> anyhow::Result<Option<WorkerGuard>> {
    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let (file_layer, guard) = match config.log_file {
        Some(ref path) => {
            let (dir, file_name) = split_log_path(path)?;
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;
    Ok(guard)
}

fn split_log_path(path: &Path) -> anyhow::Result<(&Path, &std::ffi::OsStr)> {
    let file_name = path
        .file_name()
        .with_context(|| format!("log path has no file name: {}", path.display()))?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    Ok((dir, file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_dir_gets_default_file_name() {
        // Only meaningful when the env overrides are unset.
        if std::env::var_os(LOG_PATH_ENV).is_some() || std::env::var_os(LOG_DIR_ENV).is_some() {
            return;
        }
        let config = ObservabilityConfig::from_env_with_overrides(Some(PathBuf::from("/tmp/logs")));
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/logs/media-tools.log")));
    }

    #[test]
    fn explicit_log_file_wins() {
        let config = ObservabilityConfig::default().with_log_file("update_log.txt");
        assert_eq!(config.log_file, Some(PathBuf::from("update_log.txt")));
    }

    #[test]
    fn bare_file_name_logs_to_current_dir() {
        let (dir, name) = split_log_path(Path::new("update_log.txt")).unwrap();
        assert_eq!(dir, Path::new("."));
        assert_eq!(name, "update_log.txt");
    }

    #[test]
    fn root_path_is_rejected() {
        assert!(split_log_path(Path::new("/")).is_err());
    }

    #[test]
    fn quiet_overrides_verbose() {
        assert_eq!(env_filter(true, 3, "debug").to_string(), "error");
        assert_eq!(env_filter(false, 1, "warn").to_string(), "debug");
        assert_eq!(env_filter(false, 2, "warn").to_string(), "trace");
    }
}
