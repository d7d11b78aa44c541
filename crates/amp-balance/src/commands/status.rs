//! `status` command: run one refresh cycle and print the result.

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use amp_balance::refresh::{load_settings, HttpSource, PresentationState, Refresher};
use amp_balance::render::{renderer_for, OutputFormat};
use amp_balance::StderrNotifier;

/// Exit code when the cycle ended in `Error`.
pub(crate) const EXIT_ERROR: u8 = 1;

/// Exit code when no session token is configured.
pub(crate) const EXIT_UNCONFIGURED: u8 = 2;

/// Refreshes once, prints the status (with detail rows in plain mode) and
/// maps the outcome to an exit code.
pub(crate) fn run_status_command(config_path: Option<&Path>, format: OutputFormat) -> ExitCode {
    let settings = match load_settings(config_path) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Config error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to create tokio runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let state = runtime.block_on(async {
        let mut refresher =
            Refresher::new(settings, Arc::new(HttpSource), Arc::new(StderrNotifier));
        refresher.refresh_once().await;
        let cell = refresher.state();
        let state = cell.read().await.clone();
        state
    });

    let mut renderer = renderer_for(format, std::io::stdout(), true);
    if let Err(e) = renderer.render(&state) {
        eprintln!("Error: failed to write status: {e}");
        return ExitCode::FAILURE;
    }

    exit_code_for(&state)
}

/// Exit code for the state a one-shot refresh ended in.
pub(crate) fn exit_code_for(state: &PresentationState) -> ExitCode {
    match state {
        PresentationState::Error { .. } => ExitCode::from(EXIT_ERROR),
        PresentationState::Unconfigured => ExitCode::from(EXIT_UNCONFIGURED),
        PresentationState::Loading | PresentationState::Ready { .. } => ExitCode::SUCCESS,
    }
}
