//! Tracing setup. The core logs through the `log` facade; `init_file` and
//! `init_stderr` both install the bridge so those records land in the same
//! place.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt, EnvFilter};

pub fn filter(debug: bool) -> EnvFilter {
    let default = if debug { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Interactive mode: everything goes to `path`, never to the terminal.
pub fn init_file(path: &Path, debug: bool) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .wrap_err_with(|| format!("cannot open log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(filter(debug))
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .try_init()
        .map_err(|e| eyre!("failed to install logger: {e}"))
}

/// Headless mode: stderr, so stdout stays clean for the report.
pub fn init_stderr(debug: bool) -> Result<()> {
    tracing_subscriber::registry()
        .with(filter(debug))
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| eyre!("failed to install logger: {e}"))
}
