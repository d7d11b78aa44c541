//! `config` subcommand implementations.

use std::path::Path;
use std::process::ExitCode;

use amp_balance::config::{default, xdg, ConfigError, ConfigLoader};

/// Creates the commented default configuration file.
pub(crate) fn run_config_init_command(config_path: Option<&Path>, force: bool) -> ExitCode {
    let path = xdg::resolve_config_path(config_path);
    report(default::create_default_config_at(&path, force).map(|()| {
        println!("Created configuration at {}", path.display());
    }))
}

/// Prints the configuration file path in effect.
pub(crate) fn run_config_path_command(config_path: Option<&Path>) -> ExitCode {
    println!("{}", xdg::resolve_config_path(config_path).display());
    ExitCode::SUCCESS
}

/// Parses the configuration file and prints the resulting values.
///
/// The session token is masked.
pub(crate) fn run_config_validate_command(config_path: Option<&Path>) -> ExitCode {
    report(ConfigLoader::load(config_path).map(|mut config| {
        if config.api.token().is_some() {
            config.api.access_token = "<set>".to_string();
        }
        println!("Configuration is valid");
        println!("{config:#?}");
    }))
}

fn report(result: Result<(), ConfigError>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Config error: {e}");
            ExitCode::FAILURE
        }
    }
}
