//! Where amp-balance keeps its files.
//!
//! The configuration lives in `amp-balance/config.toml` under
//! `$XDG_CONFIG_HOME` when that is set to a non-empty value, otherwise under
//! the platform config directory (`~/.config` on Linux).

use std::fs::DirBuilder;
use std::os::unix::fs::DirBuilderExt;
use std::path::{Component, Path, PathBuf};

/// Directory name under the config base.
pub const APP_DIR: &str = "amp-balance";

/// File name of the configuration.
pub const CONFIG_FILE: &str = "config.toml";

/// `<config base>/amp-balance`.
pub fn config_dir() -> PathBuf {
    config_base().join(APP_DIR)
}

/// `<config base>/amp-balance/config.toml`.
pub fn config_path() -> PathBuf {
    config_dir().join(CONFIG_FILE)
}

/// The file a command works on: `explicit` (from `--config`) or [`config_path`].
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    explicit.map_or_else(config_path, Path::to_path_buf)
}

fn config_base() -> PathBuf {
    std::env::var_os("XDG_CONFIG_HOME")
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::config_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Replace a leading `~` component with the home directory.
///
/// `~user` forms and paths without a home directory are returned unchanged.
pub fn expand_tilde(path: &str) -> PathBuf {
    let path = Path::new(path);
    let mut components = path.components();
    match (components.next(), dirs::home_dir()) {
        (Some(Component::Normal(first)), Some(home)) if first == "~" => {
            let rest = components.as_path();
            if rest.as_os_str().is_empty() {
                home
            } else {
                home.join(rest)
            }
        }
        _ => path.to_path_buf(),
    }
}

/// `mkdir -p` creating missing directories as 0700.
///
/// Directories that already exist keep their permissions.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    DirBuilder::new().recursive(true).mode(0o700).create(path)
}
