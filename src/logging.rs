//! Tracing subscriber setup.
//!
//! The filter comes from `FETCHDOCK_LOG`, then `RUST_LOG`, defaulting to `info`.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::Subscriber;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV_VAR: &str = "FETCHDOCK_LOG";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// `logs` under the platform data dir.
pub fn default_log_dir() -> PathBuf {
    crate::platform::get_data_dir().join("logs")
}

/// Logs to a daily-rolling `fetchdock.log` in `log_dir`.
pub fn init(log_dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(log_dir)?;

    let file_appender = tracing_appender::rolling::daily(log_dir, "fetchdock.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let _ = LOG_GUARD.set(guard);

    let subscriber = Subscriber::builder()
        .with_env_filter(filter())
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("global subscriber already installed");
    }
    Ok(())
}

/// Logs to stderr. Used by the console demo.
pub fn init_stderr() {
    let subscriber = Subscriber::builder()
        .with_env_filter(filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
