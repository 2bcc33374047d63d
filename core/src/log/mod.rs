//! Logging bootstrap for the desktop shell.
//!
//! `tracing` events go to a daily-rolling file under the platform data directory and to
//! stderr. `init` is called once from the window shell; later calls hand back the handle that
//! the first call installed.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::SystemTime;

use anyhow::{Context, Result};
use tracing_appender::rolling::Rotation;
use tracing_log::AsLog;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, filter::LevelFilter, util::SubscriberInitExt};

const ENV_FILTER_VARS: [&str; 2] = ["OAKHART_LOG", "RUST_LOG"];

static LOG_HANDLE: OnceLock<LogHandle> = OnceLock::new();

pub use tracing_subscriber::filter::LevelFilter as LogLevel;

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Directory holding the rolled files.
    pub directory: PathBuf,
    /// File name prefix; files are named `<prefix>.<date>.log`.
    pub file_prefix: String,
    /// Number of rolled files to keep. `None` keeps everything.
    pub retention: Option<usize>,
    pub file_level: LevelFilter,
    pub console_level: LevelFilter,
    /// Forward records from the `log` facade (used by tauri and its plugins) into `tracing`.
    pub capture_log: bool,
    /// Filter directive such as `oakhart_core=debug,tauri=info`.
    pub env_filter: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        let console_level =
            if cfg!(debug_assertions) { LevelFilter::INFO } else { LevelFilter::WARN };

        Self {
            directory: default_log_directory(),
            file_prefix: "oakhart".to_string(),
            retention: Some(10),
            file_level: LevelFilter::DEBUG,
            console_level,
            capture_log: true,
            env_filter: env_directive(),
        }
    }
}

impl LogConfig {
    pub fn with_directory<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.directory = path.into();
        self
    }

    pub fn with_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.file_prefix = prefix.into();
        self
    }
}

/// Owns the background writer; dropping it would stop file output, so it lives in a static.
#[derive(Debug)]
pub struct LogHandle {
    _guard: tracing_appender::non_blocking::WorkerGuard,
    directory: PathBuf,
}

impl LogHandle {
    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

/// Install the global subscriber. The first successful call wins.
pub fn init(config: LogConfig) -> Result<&'static LogHandle> {
    if let Some(handle) = LOG_HANDLE.get() {
        return Ok(handle);
    }

    let handle = setup(config)?;
    let _ = LOG_HANDLE.set(handle);
    LOG_HANDLE.get().context("log handle missing after initialisation")
}

fn setup(config: LogConfig) -> Result<LogHandle> {
    if config.capture_log {
        install_log_tracer(config.file_level.max(config.console_level));
    }

    fs::create_dir_all(&config.directory)
        .with_context(|| format!("creating log directory at {}", config.directory.display()))?;

    if let Some(retention) = config.retention.filter(|keep| *keep > 0) {
        prune_old_logs(&config.directory, &config.file_prefix, retention)
            .context("applying log retention policy")?;
    }

    let rolling = tracing_appender::rolling::Builder::new()
        .rotation(Rotation::DAILY)
        .filename_prefix(&config.file_prefix)
        .filename_suffix("log")
        .build(&config.directory)
        .context("creating rolling log appender")?;
    let (file_writer, guard) = tracing_appender::non_blocking(rolling);

    let directive = config
        .env_filter
        .unwrap_or_else(|| if cfg!(debug_assertions) { "debug" } else { "info" }.to_string());
    let env_filter = EnvFilter::try_new(directive).context("parsing env filter directive")?;

    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(file_writer)
        .with_target(true)
        .with_filter(config.file_level);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(config.console_level);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))?;

    Ok(LogHandle { _guard: guard, directory: config.directory })
}

fn install_log_tracer(max_level: LevelFilter) {
    // Another logger may already own the `log` facade (e.g. in tests); that is fine.
    let _ = tracing_log::LogTracer::builder().with_max_level(max_level.as_log()).init();
}

fn prune_old_logs(dir: &Path, prefix: &str, retention: usize) -> Result<()> {
    let mut entries: Vec<(PathBuf, SystemTime)> = fs::read_dir(dir)
        .with_context(|| format!("reading log directory at {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|kind| kind.is_file()).unwrap_or(false))
        .filter(|entry| matches_prefix(&entry.path(), prefix))
        .map(|entry| {
            let modified =
                entry.metadata().and_then(|meta| meta.modified()).unwrap_or(SystemTime::UNIX_EPOCH);
            (entry.path(), modified)
        })
        .collect();

    if entries.len() <= retention {
        return Ok(());
    }

    entries.sort_by_key(|(_, modified)| *modified);
    let excess = entries.len() - retention;
    for (path, _) in entries.into_iter().take(excess) {
        let _ = fs::remove_file(&path);
    }
    Ok(())
}

fn matches_prefix(path: &Path, prefix: &str) -> bool {
    path.file_name().and_then(OsStr::to_str).map(|name| name.starts_with(prefix)).unwrap_or(false)
}

fn env_directive() -> Option<String> {
    ENV_FILTER_VARS
        .iter()
        .find_map(|var| std::env::var(var).ok())
        .filter(|directive| !directive.trim().is_empty())
}

fn default_log_directory() -> PathBuf {
    crate::config::project_dirs()
        .map(|dirs| dirs.data_dir().join("logs"))
        .unwrap_or_else(|| std::env::temp_dir().join("oakhart-dm-tools").join("logs"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        let temp = tempfile::tempdir().expect("temp dir");
        let config =
            LogConfig::default().with_directory(temp.path().join("logs")).with_prefix("test");

        let first = init(config.clone()).expect("init once");
        assert!(first.directory().exists());

        let second = init(config).expect("init twice");
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn prunes_oldest_files_beyond_retention() {
        let temp = tempfile::tempdir().expect("temp dir");
        for name in ["oakhart.1.log", "oakhart.2.log", "oakhart.3.log", "other.log"] {
            fs::write(temp.path().join(name), b"x").unwrap();
        }

        prune_old_logs(temp.path(), "oakhart", 2).expect("prune");

        let remaining = fs::read_dir(temp.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| matches_prefix(&entry.path(), "oakhart"))
            .count();
        assert_eq!(remaining, 2);
        assert!(temp.path().join("other.log").exists());
    }
}
