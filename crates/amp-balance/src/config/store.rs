//! Persisting configuration changes made by the application itself.
//!
//! `setup` stores the extracted session token and the refresh loop writes
//! back a clamped interval. Both read the current file (or defaults when
//! there is none), change one field, and rewrite the whole file.

use std::path::Path;

use crate::config::default::write_private;
use crate::config::error::ConfigError;
use crate::config::loader::ConfigLoader;
use crate::config::schema::Config;

/// Serialize `config` to TOML and write it to `path` with 0600 permissions.
pub fn save(path: &Path, config: &Config) -> Result<(), ConfigError> {
    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::Serialize(e.to_string()))?;
    write_private(path, &content)
}

/// Store a new session token at `path`.
pub fn set_access_token(path: &Path, token: &str) -> Result<(), ConfigError> {
    update(path, |config| config.api.access_token = token.to_string())
}

/// Store a refresh interval (minutes) at `path`.
pub fn set_refresh_interval(path: &Path, minutes: i64) -> Result<(), ConfigError> {
    update(path, |config| config.refresh.interval = minutes)
}

fn update(path: &Path, change: impl FnOnce(&mut Config)) -> Result<(), ConfigError> {
    let mut config = if path.exists() {
        ConfigLoader::load_from_path(path)?
    } else {
        Config::default()
    };
    change(&mut config);
    save(path, &config)?;
    tracing::debug!(path = %path.display(), "configuration updated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn set_access_token_creates_missing_file() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let path = tmp.path().join("amp-balance/config.toml");

        set_access_token(&path, "abcdefghijklmnop").expect("should save");

        let config = ConfigLoader::load_from_path(&path).expect("should reload");
        assert_eq!(config.api.token(), Some("abcdefghijklmnop"));
        assert_eq!(config.refresh.interval, 5);
    }

    #[test]
    fn set_access_token_keeps_other_fields() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[refresh]\ninterval = 20\n\n[display]\nlow_balance_threshold = 3.0\n")
            .expect("write config");

        set_access_token(&path, "new-token-value").expect("should save");

        let config = ConfigLoader::load_from_path(&path).expect("should reload");
        assert_eq!(config.api.token(), Some("new-token-value"));
        assert_eq!(config.refresh.interval, 20);
        assert!((config.display.low_balance_threshold - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn set_refresh_interval_overwrites_value() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[refresh]\ninterval = 500\n").expect("write config");

        set_refresh_interval(&path, 60).expect("should save");

        let config = ConfigLoader::load_from_path(&path).expect("should reload");
        assert_eq!(config.refresh.interval, 60);
    }

    #[test]
    fn update_refuses_to_clobber_unparseable_file() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let path = tmp.path().join("config.toml");
        fs::write(&path, "this is = = not toml").expect("write config");

        let err = set_access_token(&path, "abcdefghijkl").expect_err("should fail");
        assert!(matches!(err, ConfigError::Parse { .. }));
        let content = fs::read_to_string(&path).expect("read back");
        assert_eq!(content, "this is = = not toml");
    }

    #[cfg(unix)]
    #[test]
    fn saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let path = tmp.path().join("config.toml");
        save(&path, &Config::default()).expect("should save");
        let mode = fs::metadata(&path).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
