//! Tracing setup
//!
//! CLI commands log to stderr. The TUI owns the terminal, so it logs to
//! `fairshare.log` under the base directory instead. The filter comes from
//! `FAIRSHARE_LOG` (default `warn`).

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{FairShareError, FairShareResult};

pub const LOG_ENV: &str = "FAIRSHARE_LOG";

const DEFAULT_FILTER: &str = "warn";

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Log to stderr; a second call is a no-op
pub fn init_stderr() {
    let _ = tracing_subscriber::registry()
        .with(filter())
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}

/// Log to a file, appending
pub fn init_file(path: &Path) -> FairShareResult<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            FairShareError::Io(format!("Failed to open log file {}: {}", path.display(), e))
        })?;

    let _ = tracing_subscriber::registry()
        .with(filter())
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .try_init();
    Ok(())
}
