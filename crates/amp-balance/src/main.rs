//! amp-balance - CLI entry point
//!
//! Shows the remaining Amp free-tier balance in terminal status hosts.
//! `watch` keeps the status fresh, `status` prints it once, `setup` stores
//! the session token.

mod commands;

use amp_balance::config::schema::LogConfig;
use amp_balance::config::ConfigLoader;
use amp_balance::{logging, OutputFormat};
use clap::{Parser, Subcommand};
use commands::{
    run_config_init_command, run_config_path_command, run_config_validate_command,
    run_setup_command, run_status_command, run_watch_command,
};
use std::path::PathBuf;
use std::process::ExitCode;

/// Amp free-tier balance for status bars
#[derive(Parser)]
#[command(name = "amp-balance")]
#[command(version, about = "Amp free-tier balance for status bars")]
struct Cli {
    /// Configuration file (defaults to the XDG location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands for the amp-balance CLI
#[derive(Subcommand)]
enum Commands {
    /// Keep the balance up to date, printing every change
    Watch {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
        format: OutputFormat,
        /// Print the detail rows under the status line (plain format only)
        #[arg(long)]
        details: bool,
    },

    /// Refresh once and print the balance
    Status {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
        format: OutputFormat,
    },

    /// Store the session token from a copied "getFreeTierUsage" request
    Setup {
        /// Read the request from the clipboard instead of stdin
        #[arg(long)]
        clipboard: bool,
        /// Open https://ampcode.com/settings in a browser first
        #[arg(long)]
        open: bool,
    },

    /// Manage configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Actions for the `config` subcommand.
#[derive(Subcommand)]
enum ConfigAction {
    /// Create default configuration file
    Init {
        /// Overwrite existing configuration (creates backup)
        #[arg(long)]
        force: bool,
    },
    /// Show configuration file path
    Path,
    /// Validate configuration file
    Validate,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    // Logging follows the file when it parses; commands report bad files themselves.
    let log_config = ConfigLoader::load(config_path)
        .map(|config| config.log)
        .unwrap_or_else(|_| LogConfig::default());
    if let Err(e) = logging::init(&log_config) {
        eprintln!("Warning: could not open log file: {e}");
    }

    match cli.command {
        Commands::Watch { format, details } => run_watch_command(config_path, format, details),
        Commands::Status { format } => run_status_command(config_path, format),
        Commands::Setup { clipboard, open } => run_setup_command(config_path, clipboard, open),
        Commands::Config { action } => match action {
            ConfigAction::Init { force } => run_config_init_command(config_path, force),
            ConfigAction::Path => run_config_path_command(config_path),
            ConfigAction::Validate => run_config_validate_command(config_path),
        },
    }
}
