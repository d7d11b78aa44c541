//! `setup` command: store the session token from a pasted request snippet.
//!
//! Reads the "Copy as cURL" (or "Copy as fetch") text from stdin, or from the
//! clipboard with `--clipboard`, extracts the session token and writes it to
//! the configuration file. The token is never printed or logged. `--open`
//! first opens the settings page in a browser.

use std::io::{self, IsTerminal, Read};
use std::path::Path;
use std::process::{Command, ExitCode, Stdio};

use amp_balance::config::{store, xdg, ConfigError};
use amp_usage::{extract_session_token, ExtractError};
use thiserror::Error;

/// Page the session token is copied from.
const SETTINGS_URL: &str = "https://ampcode.com/settings";

#[cfg(target_os = "macos")]
const URL_OPENER: &str = "open";
#[cfg(not(target_os = "macos"))]
const URL_OPENER: &str = "xdg-open";

const SETUP_STEPS: &str = "\
Setup - get your session token:
  1. Go to https://ampcode.com/settings
  2. Press F12 and open the Network tab
  3. Look for the \"getFreeTierUsage\" request
  4. Right-click it and choose Copy as cURL
  5. Paste the command here, then press Ctrl-D
";

/// Ways `setup` can fail.
#[derive(Debug, Error)]
pub(crate) enum SetupError {
    /// Reading the pasted text failed.
    #[error("Could not read input: {0}")]
    Input(String),

    /// No token in the pasted text.
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// Writing the configuration failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Reads the pasted snippet, extracts the token and saves it.
pub(crate) fn run_setup_command(
    config_path: Option<&Path>,
    from_clipboard: bool,
    open_browser: bool,
) -> ExitCode {
    let path = xdg::resolve_config_path(config_path);
    if open_browser {
        open_settings_page();
    }

    let result = read_input(from_clipboard).and_then(|text| save_session_token(&text, &path));
    match result {
        Ok(()) => {
            println!("✅ Session token saved!");
            println!(
                "Your balance will update automatically. If authentication fails later, \
                 refresh the token using the same steps."
            );
            tracing::info!(path = %path.display(), "session token saved");
            ExitCode::SUCCESS
        }
        Err(SetupError::Extract(e)) => {
            eprintln!("❌ {e}");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Setup failed: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Extract the token from `text` and store it at `path`.
pub(crate) fn save_session_token(text: &str, path: &Path) -> Result<(), SetupError> {
    let token = extract_session_token(text)?;
    store::set_access_token(path, &token)?;
    Ok(())
}

/// Best effort; setup goes on when no browser can be launched.
fn open_settings_page() {
    match open_url_command(SETTINGS_URL).spawn() {
        Ok(_) => tracing::debug!(opener = URL_OPENER, "opened settings page"),
        Err(e) => {
            tracing::warn!(opener = URL_OPENER, error = %e, "failed to open browser");
            eprintln!("Could not open a browser; visit {SETTINGS_URL}");
        }
    }
}

fn open_url_command(url: &str) -> Command {
    let mut command = Command::new(URL_OPENER);
    command
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    command
}

fn read_input(from_clipboard: bool) -> Result<String, SetupError> {
    if from_clipboard {
        return read_clipboard();
    }

    let mut stdin = io::stdin();
    if stdin.is_terminal() {
        eprint!("{SETUP_STEPS}");
    }
    let mut text = String::new();
    stdin
        .read_to_string(&mut text)
        .map_err(|e| SetupError::Input(e.to_string()))?;
    Ok(text)
}

fn read_clipboard() -> Result<String, SetupError> {
    let mut clipboard = arboard::Clipboard::new().map_err(|e| {
        tracing::warn!("failed to initialize clipboard: {}", e);
        SetupError::Input(format!("clipboard unavailable: {e}"))
    })?;
    clipboard
        .get_text()
        .map_err(|e| SetupError::Input(format!("clipboard has no text: {e}")))
}
