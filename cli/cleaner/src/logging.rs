//! Logging initialization.

use std::io::IsTerminal;

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::fmt;

use crate::args::{LogFormat, LogLevel};

/// Initialize logging with the specified level and format.
///
/// Logs are written to stderr. In `auto` mode the format is chosen from
/// stdout: pretty on a terminal, JSON otherwise.
pub fn init_logging(level: LogLevel, format: LogFormat) -> Result<()> {
    let level: Level = level.into();

    let builder = fmt::Subscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr);

    if use_json(format, std::io::stdout().is_terminal()) {
        builder
            .json()
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;
    } else {
        builder
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;
    }

    Ok(())
}

fn use_json(format: LogFormat, is_terminal: bool) -> bool {
    match format {
        LogFormat::Auto => !is_terminal,
        LogFormat::Pretty => false,
        LogFormat::Json => true,
    }
}
