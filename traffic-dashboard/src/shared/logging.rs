/// Logging setup
///
/// The terminal belongs to the UI, so log output goes to a file.
use crate::shared::error::DashboardError;
use std::{fs::OpenOptions, path::Path, sync::Mutex};

/// Install the global `tracing` subscriber writing to `path`.
///
/// Filter comes from `RUST_LOG`, defaulting to `info`.
pub fn init_logging(path: &Path) -> Result<(), DashboardError> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| DashboardError::Logging(e.to_string()))
}
