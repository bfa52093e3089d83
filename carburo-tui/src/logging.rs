//! File-backed tracing setup; the terminal itself is owned by the UI.

use std::{env, fs::OpenOptions, path::PathBuf, sync::Mutex};

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

/// Path of the log file; logging is off when unset.
pub(crate) const LOG_FILE_VAR: &str = "CARBURO_LOG_FILE";

pub(crate) fn init() -> Result<Option<PathBuf>> {
    let Some(path) = env::var_os(LOG_FILE_VAR).map(PathBuf::from) else {
        return Ok(None);
    };

    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|err| anyhow!("failed to install log subscriber: {err}"))?;

    Ok(Some(path))
}
