//! Tracing setup shared by the binaries.
//!
//! Every line goes to stdout and to a durable log file that is truncated on
//! start, so the file always holds the current run.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use crate::error::AppError;

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str =
    "herald_poller=debug,herald_notifier=info,herald_common=info";

/// Install the global subscriber with a console layer and a file layer.
pub fn init(log_file: &Path) -> Result<(), AppError> {
    let file = File::create(log_file)?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let console_layer = fmt::layer().with_target(true);
    let file_layer = fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file));

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| AppError::Internal(format!("tracing subscriber already set: {e}")))?;

    tracing::debug!(log_file = %log_file.display(), "Logging initialised");
    Ok(())
}
