//! TOML configuration schema types for amp-balance.
//!
//! All structs derive `Deserialize` and `Serialize` with defaults via
//! `#[serde(default)]`, so a partial (or empty) file is always valid.
//! Fields are annotated with reload behavior in doc comments: "Reloadable"
//! fields take effect when a running `watch` receives SIGHUP.

use amp_usage::client::DEFAULT_API_URL;
use serde::{Deserialize, Serialize};

/// Default refresh interval in minutes.
pub const DEFAULT_REFRESH_MINUTES: i64 = 5;

/// Default low-balance threshold in currency units.
pub const DEFAULT_LOW_BALANCE_THRESHOLD: f64 = 1.0;

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// The whole `config.toml`: `[api]`, `[refresh]`, `[display]` and `[log]`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Endpoint and credential.
    pub api: ApiConfig,
    /// Polling behavior.
    pub refresh: RefreshConfig,
    /// Presentation thresholds.
    pub display: DisplayConfig,
    /// Logging settings.
    pub log: LogConfig,
}

// ---------------------------------------------------------------------------
// API
// ---------------------------------------------------------------------------

/// Endpoint and session credential.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    /// Balance endpoint URL. Reloadable.
    pub url: String,
    /// Session token; empty means not configured. Reloadable.
    ///
    /// Written by `amp-balance setup`.
    pub access_token: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_API_URL.to_string(),
            access_token: String::new(),
        }
    }
}

impl ApiConfig {
    /// The configured token, or `None` when it is empty or blank.
    pub fn token(&self) -> Option<&str> {
        let token = self.access_token.trim();
        (!token.is_empty()).then_some(token)
    }

    /// The configured URL, falling back to the default when blank.
    pub fn url_or_default(&self) -> &str {
        let url = self.url.trim();
        if url.is_empty() {
            DEFAULT_API_URL
        } else {
            url
        }
    }
}

// ---------------------------------------------------------------------------
// Refresh
// ---------------------------------------------------------------------------

/// Polling configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RefreshConfig {
    /// Minutes between refreshes. Out-of-range values are coerced into
    /// [1, 60] at load time. Reloadable.
    pub interval: i64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_REFRESH_MINUTES,
        }
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

/// Presentation thresholds.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    /// Remaining balance (in currency units) under which the balance is
    /// flagged low. Zero disables the check. Reloadable.
    pub low_balance_threshold: f64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            low_balance_threshold: DEFAULT_LOW_BALANCE_THRESHOLD,
        }
    }
}

// ---------------------------------------------------------------------------
// Log
// ---------------------------------------------------------------------------

/// Logging configuration.
///
/// Not reloadable: the subscriber is installed once at startup.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    /// Logging verbosity; `AMP_BALANCE_LOG` overrides it.
    pub level: LogLevel,
    /// Log destination; empty writes to stderr. A leading `~` is expanded.
    pub file: String,
}

/// `[log] level`, written lowercase in the file.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Only errors.
    Error,
    /// Errors and warnings.
    Warn,
    /// Lifecycle events and refresh outcomes (default).
    #[default]
    Info,
    /// Debug-level detail.
    Debug,
    /// Full trace output.
    Trace,
}

impl LogLevel {
    /// Filter directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
[api]
url = "https://example.test/usage"
access_token = "abcdefghijklmnop"

[refresh]
interval = 15

[display]
low_balance_threshold = 2.5

[log]
level = "debug"
file = "/var/log/amp-balance.log"
"#;

    #[test]
    fn every_section_is_read() {
        let config: Config = toml::from_str(FULL).expect("full file");
        assert_eq!(config.api.url, "https://example.test/usage");
        assert_eq!(config.api.token(), Some("abcdefghijklmnop"));
        assert_eq!(config.refresh.interval, 15);
        assert!((config.display.low_balance_threshold - 2.5).abs() < f64::EPSILON);
        assert_eq!(config.log.level, LogLevel::Debug);
        assert_eq!(config.log.file, "/var/log/amp-balance.log");
    }

    #[test]
    fn empty_file_is_the_default() {
        assert_eq!(toml::from_str::<Config>("").expect("empty file"), Config::default());
    }

    #[test]
    fn extra_keys_are_tolerated() {
        let config: Config = toml::from_str("theme = \"dark\"\n\n[api]\nretries = 3\n")
            .expect("extra keys");
        assert_eq!(config.api.url, DEFAULT_API_URL);
    }

    #[test]
    fn built_in_values() {
        let Config {
            api,
            refresh,
            display,
            log,
        } = Config::default();
        assert_eq!(api.url, DEFAULT_API_URL);
        assert_eq!(api.token(), None);
        assert_eq!(refresh.interval, 5);
        assert!((display.low_balance_threshold - 1.0).abs() < f64::EPSILON);
        assert_eq!(log.level, LogLevel::Info);
        assert!(log.file.is_empty());
    }

    #[test]
    fn blank_token_is_not_configured() {
        let api = ApiConfig {
            access_token: "   ".to_string(),
            ..ApiConfig::default()
        };
        assert_eq!(api.token(), None);
    }

    #[test]
    fn blank_url_falls_back_to_default() {
        let api = ApiConfig {
            url: String::new(),
            ..ApiConfig::default()
        };
        assert_eq!(api.url_or_default(), DEFAULT_API_URL);
    }

    #[test]
    fn negative_interval_parses_for_later_clamping() {
        let config: Config =
            toml::from_str("[refresh]\ninterval = -3\n").expect("negative should parse");
        assert_eq!(config.refresh.interval, -3);
    }

    #[test]
    fn level_names_match_filter_directives() {
        for level in [
            LogLevel::Error,
            LogLevel::Warn,
            LogLevel::Info,
            LogLevel::Debug,
            LogLevel::Trace,
        ] {
            let text = format!("level = \"{}\"", level.as_directive());
            let log: LogConfig = toml::from_str(&text).expect("level should parse");
            assert_eq!(log.level, level);
        }
    }

    #[test]
    fn unknown_level_is_rejected() {
        assert!(toml::from_str::<LogConfig>("level = \"verbose\"").is_err());
    }

    #[test]
    fn saved_config_reads_back_unchanged() {
        let mut config = Config::default();
        config.api.access_token = "token-value-123".to_string();
        config.refresh.interval = 30;
        let text = toml::to_string(&config).expect("serialize");
        assert_eq!(toml::from_str::<Config>(&text).expect("reparse"), config);
    }
}
