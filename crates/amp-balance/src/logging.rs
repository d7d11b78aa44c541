//! Logging initialization for amp-balance.
//!
//! Configures the `tracing` subscriber with level filtering via the
//! `AMP_BALANCE_LOG` environment variable. Falls back to the `[log] level`
//! from the configuration file when the variable is unset or invalid.
//!
//! # Usage
//!
//! ```bash
//! # Configured level (info by default)
//! amp-balance watch
//!
//! # Debug level
//! AMP_BALANCE_LOG=debug amp-balance watch
//!
//! # Module-specific filtering
//! AMP_BALANCE_LOG=amp_usage=debug,warn amp-balance watch
//! ```

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::schema::{LogConfig, LogLevel};
use crate::config::xdg;

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "AMP_BALANCE_LOG";

/// Initialize the tracing subscriber.
///
/// Output goes to stderr, or is appended to `config.file` when set (parent
/// directories are created). Stdout is left alone because it carries the
/// rendered status.
///
/// # Errors
///
/// Returns an I/O error if the log file cannot be opened.
///
/// # Panics
///
/// Panics if a global subscriber has already been set (should only be
/// called once, at startup).
pub fn init(config: &LogConfig) -> std::io::Result<()> {
    let filter = build_filter(config.level);

    let (writer, ansi) = if config.file.trim().is_empty() {
        (BoxMakeWriter::new(std::io::stderr), true)
    } else {
        let path = xdg::expand_tilde(config.file.trim());
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        (BoxMakeWriter::new(Mutex::new(file)), false)
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(ansi)
        .with_writer(writer)
        .init();
    Ok(())
}

/// Filter from `AMP_BALANCE_LOG`, or the configured level.
fn build_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level.as_directive()))
}
