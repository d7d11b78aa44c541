//! Command implementations for the amp-balance CLI.
//!
//! This module contains all command handler functions, organized by domain:
//! - `config` - Configuration file management (init, path, validate)
//! - `setup` - Session token extraction and storage
//! - `status` - One-shot refresh and print
//! - `watch` - Long-running refresh loop with signal handling

pub(crate) mod config;
pub(crate) mod setup;
pub(crate) mod status;
pub(crate) mod watch;

pub(crate) use config::*;
pub(crate) use setup::*;
pub(crate) use status::*;
pub(crate) use watch::*;
