//! The commented starter file written by `amp-balance config init`.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};

use crate::config::error::ConfigError;
use crate::config::xdg;

/// Starter configuration. Parses to exactly `Config::default()`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# amp-balance configuration
#
# Every value below is the built-in default; delete a line to keep tracking
# the default. A running `amp-balance watch` re-reads this file on SIGHUP.

[api]
# Free-tier balance endpoint.
url = "https://ampcode.com/_app/remote/w6b2h6/getFreeTierUsage"

# Value of the `session` cookie. Run `amp-balance setup` and paste the
# "Copy as cURL" text of the getFreeTierUsage request to fill it in.
access_token = ""

[refresh]
# Minutes between refreshes, 1 to 60. Other values are clamped and the
# clamped value is written back here.
interval = 5

[display]
# Flag the balance as low (and warn once) below this many dollars.
# 0 turns the check off.
low_balance_threshold = 1.0

[log]
# error, warn, info, debug or trace. AMP_BALANCE_LOG overrides it.
# Needs a restart.
level = "info"

# Append logs to this file instead of stderr, e.g.
# "~/.local/state/amp-balance/amp-balance.log". Needs a restart.
file = ""
"#;

/// Write the starter file to `path`.
///
/// An existing file is an [`ConfigError::Exists`] error unless `force` is
/// set, in which case it is first renamed to `config.toml.backup`.
pub fn create_default_config_at(path: &Path, force: bool) -> Result<(), ConfigError> {
    if path.exists() {
        if !force {
            return Err(ConfigError::Exists {
                path: path.to_path_buf(),
            });
        }
        let backup = backup_path(path);
        fs::rename(path, &backup).map_err(|source| ConfigError::Write {
            path: backup.clone(),
            source,
        })?;
        tracing::info!(backup = %backup.display(), "previous configuration kept as backup");
    }

    write_private(path, DEFAULT_CONFIG_TEMPLATE)?;
    tracing::info!(path = %path.display(), "default configuration written");
    Ok(())
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".backup");
    path.with_file_name(name)
}

/// Replace `path` with `content`, readable by the owner only.
///
/// Missing parent directories are created as 0700. The file is 0600 even
/// when it already existed with wider permissions.
pub(crate) fn write_private(path: &Path, content: &str) -> Result<(), ConfigError> {
    let failed = |source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        xdg::ensure_dir(parent).map_err(failed)?;
    }

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
        .map_err(failed)?;
    file.write_all(content.as_bytes()).map_err(failed)?;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(failed)
}
