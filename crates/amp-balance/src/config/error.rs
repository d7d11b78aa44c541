//! Errors from reading and writing `config.toml`.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Why a configuration file could not be loaded or stored.
///
/// Every variant names the file involved; the CLI prints these verbatim.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("Cannot read {path}: {source}")]
    Read {
        /// File being read.
        path: PathBuf,
        /// I/O failure.
        #[source]
        source: io::Error,
    },

    /// The file is not valid TOML for the schema.
    ///
    /// `line` and `column` are one-based; both are 0 when the parser gave no
    /// position.
    #[error("Invalid configuration at {path}:{line}:{column}: {message}")]
    Parse {
        /// File being parsed.
        path: PathBuf,
        /// Line of the offending token.
        line: usize,
        /// Column (in characters) of the offending token.
        column: usize,
        /// Parser message.
        message: String,
    },

    /// A file named with `--config` does not exist.
    #[error("Configuration file not found: {path}")]
    NotFound {
        /// Requested file.
        path: PathBuf,
    },

    /// `config init` without `--force` found a file in the way.
    #[error("{path} already exists (use --force to replace it)")]
    Exists {
        /// Existing file.
        path: PathBuf,
    },

    /// Writing the file, its backup or its directory failed.
    #[error("Cannot write {path}: {source}")]
    Write {
        /// File or directory being written.
        path: PathBuf,
        /// I/O failure.
        #[source]
        source: io::Error,
    },

    /// The in-memory configuration could not be turned into TOML.
    #[error("Cannot serialize configuration: {0}")]
    Serialize(String),
}
