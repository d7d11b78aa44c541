//! amp-balance library
//!
//! This crate keeps an Amp free-tier balance status up to date for terminal
//! status hosts (tmux, waybar, i3blocks, shell prompts). The fetching and
//! arithmetic live in `amp-usage`; this crate adds the configuration file,
//! the periodic refresh loop, the view model and the rendering adapters.
//!
//! # Platform Support
//!
//! `watch` relies on Unix signals (SIGHUP reloads the configuration, SIGUSR1
//! forces a refresh), so the binary supports **Unix-like systems only**.

/// Configuration utilities including XDG path resolution.
pub mod config;

/// Logging initialization.
pub mod logging;

/// User-facing notifications.
pub mod notify;

/// Refresh loop and presentation state.
pub mod refresh;

/// Rendering adapters for status hosts.
pub mod render;

/// Plain-data view model.
pub mod view;

#[cfg(test)]
pub(crate) mod test_support;

pub use notify::{LogNotifier, Notifier, StderrNotifier};
pub use refresh::{PresentationState, RefreshCommand, Refresher, Settings};
pub use render::{OutputFormat, Renderer};
pub use view::StatusView;
