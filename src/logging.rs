//! File-based tracing setup.
//!
//! The terminal belongs to the TUI and to training progress output, so log
//! records go to `<data dir>/logs/rl-arcade.log`.

use crate::constants;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over `default_level`. The returned guard flushes the
/// background writer when dropped and must live until the program exits.
///
/// # Errors
///
/// Returns an error if the log directory cannot be created or a subscriber
/// is already installed.
pub fn init(data_dir: &Path, default_level: &str) -> Result<WorkerGuard> {
    let logs_dir = logs_dir(data_dir);
    std::fs::create_dir_all(&logs_dir)?;

    let appender = tracing_appender::rolling::never(&logs_dir, constants::LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| eyre!(e))?;

    Ok(guard)
}

/// Log directory under the given data directory.
pub fn logs_dir(data_dir: &Path) -> PathBuf {
    data_dir.join(constants::LOGS_DIR_NAME)
}
