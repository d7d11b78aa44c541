//! Reading `config.toml`.
//!
//! A missing file at the default location means "use the defaults"; a
//! missing file named with `--config` is an error, since the user asked for
//! that exact file.

use std::io;
use std::path::Path;

use crate::config::error::ConfigError;
use crate::config::schema::Config;
use crate::config::xdg;

/// Stateless configuration loader.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load `path` when given, otherwise the default location.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        path.map_or_else(Self::load_default, Self::load_from_path)
    }

    /// Load the default location, falling back to `Config::default()` when
    /// there is no file yet.
    pub fn load_default() -> Result<Config, ConfigError> {
        let path = xdg::config_path();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no configuration file, using defaults");
            return Ok(Config::default());
        }
        Self::load_from_path(&path)
    }

    /// Load one specific file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NotFound`] when the file is missing,
    /// [`ConfigError::Read`] for other I/O failures and
    /// [`ConfigError::Parse`] for invalid content.
    pub fn load_from_path(path: &Path) -> Result<Config, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => ConfigError::NotFound {
                path: path.to_path_buf(),
            },
            _ => ConfigError::Read {
                path: path.to_path_buf(),
                source,
            },
        })?;
        parse(&text, path)
    }
}

fn parse(text: &str, path: &Path) -> Result<Config, ConfigError> {
    toml::from_str(text).map_err(|e| {
        let (line, column) = e
            .span()
            .map_or((0, 0), |span| line_and_column(text, span.start));
        ConfigError::Parse {
            path: path.to_path_buf(),
            line,
            column,
            message: e.message().trim_end().to_string(),
        }
    })
}

/// One-based line and character column of byte `offset` in `text`.
fn line_and_column(text: &str, offset: usize) -> (usize, usize) {
    let before = text.get(..offset).unwrap_or(text);
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let line = before.matches('\n').count() + 1;
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::LogLevel;
    use crate::test_support::EnvVarGuard;
    use serial_test::serial;
    use std::fs;
    use std::path::PathBuf;

    #[test]
    fn line_and_column_are_one_based() {
        let text = "[api]\nurl = 1\n";
        assert_eq!(line_and_column(text, 0), (1, 1));
        assert_eq!(line_and_column(text, 6), (2, 1));
        assert_eq!(line_and_column(text, 12), (2, 7));
        assert_eq!(line_and_column("é = x", 3), (1, 3), "columns count characters");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = parse("[display]\nlow_balance_threshold = 0.0\n", Path::new("p.toml"))
            .expect("partial config should parse");
        assert_eq!(config.display.low_balance_threshold, 0.0);
        assert_eq!(config.refresh, Config::default().refresh);
        assert_eq!(config.log.level, LogLevel::Info);
    }

    #[test]
    fn wrong_value_type_reports_its_line() {
        let err = parse("[api]\nurl = \"x\"\n\n[refresh]\ninterval = \"often\"\n", Path::new("c.toml"))
            .expect_err("should fail");
        match err {
            ConfigError::Parse {
                path, line, column, ..
            } => {
                assert_eq!(path, PathBuf::from("c.toml"));
                assert_eq!(line, 5);
                assert!(column > 1);
            }
            other => panic!("expected Parse, got {other:?}"),
        }
    }

    #[test]
    fn broken_syntax_is_a_parse_error() {
        let err = parse("[log\nlevel = \"debug\"", Path::new("b.toml")).expect_err("should fail");
        assert!(matches!(err, ConfigError::Parse { line: 1, .. }), "got {err:?}");
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let err = parse("[log]\nlevel = \"loud\"\n", Path::new("l.toml")).expect_err("should fail");
        assert!(matches!(err, ConfigError::Parse { line: 2, .. }), "got {err:?}");
    }

    #[test]
    fn explicit_file_is_read() {
        let dir = tempfile::tempdir().expect("temp dir");
        let file = dir.path().join("amp.toml");
        fs::write(&file, "[api]\naccess_token = \"abcdefghijkl\"\n").expect("write");

        let config = ConfigLoader::load(Some(&file)).expect("should load");
        assert_eq!(config.api.token(), Some("abcdefghijkl"));
    }

    #[test]
    fn explicit_missing_file_is_not_found() {
        let dir = tempfile::tempdir().expect("temp dir");
        let file = dir.path().join("absent.toml");

        match ConfigLoader::load(Some(&file)).expect_err("should fail") {
            ConfigError::NotFound { path } => assert_eq!(path, file),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn directory_is_a_read_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = ConfigLoader::load_from_path(dir.path()).expect_err("should fail");
        assert!(matches!(err, ConfigError::Read { .. }), "got {err:?}");
    }

    #[test]
    #[serial]
    fn default_location_without_file_gives_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let _xdg = EnvVarGuard::set("XDG_CONFIG_HOME", dir.path());

        assert_eq!(ConfigLoader::load(None).expect("defaults"), Config::default());
    }

    #[test]
    #[serial]
    fn default_location_file_is_read() {
        let dir = tempfile::tempdir().expect("temp dir");
        let _xdg = EnvVarGuard::set("XDG_CONFIG_HOME", dir.path());
        xdg::ensure_dir(&xdg::config_dir()).expect("config dir");
        fs::write(xdg::config_path(), "[refresh]\ninterval = 12\n").expect("write");

        let config = ConfigLoader::load_default().expect("should load");
        assert_eq!(config.refresh.interval, 12);
    }
}
