//! User-facing notifications (low balance, interval adjustments).
//!
//! The refresh loop only knows the [`Notifier`] trait; the CLI picks the
//! implementation.

use tracing::{info, warn};

/// Sink for messages the user should see outside the status line.
pub trait Notifier: Send + Sync {
    /// Something the user should act on.
    fn warn(&self, message: &str);
    /// Informational message.
    fn info(&self, message: &str);
}

/// Sends notifications to the log only.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn warn(&self, message: &str) {
        warn!(notification = message, "user warning");
    }

    fn info(&self, message: &str) {
        info!(notification = message, "user notice");
    }
}

/// Prints notifications to stderr (and logs them).
///
/// Used by `watch`, whose stdout is reserved for rendered status lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn warn(&self, message: &str) {
        eprintln!("warning: {message}");
        LogNotifier.warn(message);
    }

    fn info(&self, message: &str) {
        eprintln!("{message}");
        LogNotifier.info(message);
    }
}
