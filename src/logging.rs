use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Used when neither RUST_LOG nor `[debug] log_filter` is set.
pub const DEFAULT_FILTER: &str = "info,expansion=debug,active=debug,pagination=debug,api=debug";

/// Install the global subscriber writing to `path`. The terminal belongs to the UI, so
/// without a log file nothing is installed and events are dropped.
pub fn init(path: Option<&Path>, filter: Option<&str>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| eyre!("Failed to open log file {}: {}", path.display(), e))?;

    // RUST_LOG takes precedence, then the configured filter
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter.unwrap_or(DEFAULT_FILTER)));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| eyre!("Failed to install logger: {}", e))?;

    tracing::info!(log_file = %path.display(), "logging started");
    Ok(())
}
