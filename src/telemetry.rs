//! Logging setup. `tracing` events land in `movieverse.log` under the data
//! directory.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "movieverse.log";
const DEFAULT_FILTER: &str = "movieverse=info";

/// Install the global subscriber. Output goes to a file inside `dir` because
/// the terminal belongs to the TUI; `RUST_LOG` overrides the default filter.
pub fn init(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).context("failed to create data directory")?;
    let path = dir.join(LOG_FILE_NAME);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))
        .context("failed to install log subscriber")
}
