//! Settings a refresh loop runs with, derived from the configuration file.

use std::path::Path;
use std::time::Duration;

use amp_usage::dollars_to_cents;
use tracing::warn;

use crate::config::schema::Config;
use crate::config::{store, xdg, ConfigError, ConfigLoader};

/// Refresh period in whole minutes, always within
/// [`RefreshInterval::MIN_MINUTES`, `RefreshInterval::MAX_MINUTES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshInterval(u32);

impl RefreshInterval {
    /// Shortest allowed interval.
    pub const MIN_MINUTES: u32 = 1;
    /// Longest allowed interval.
    pub const MAX_MINUTES: u32 = 60;

    /// Coerce `minutes` into the allowed range.
    ///
    /// The flag is `true` when the input had to be changed.
    pub fn clamped(minutes: i64) -> (Self, bool) {
        let value = minutes.clamp(i64::from(Self::MIN_MINUTES), i64::from(Self::MAX_MINUTES));
        // In range after the clamp.
        let interval = Self(value as u32);
        (interval, value != minutes)
    }

    /// Whole minutes.
    pub fn minutes(self) -> u32 {
        self.0
    }

    /// The period as a [`Duration`].
    pub fn as_duration(self) -> Duration {
        Duration::from_secs(u64::from(self.0) * 60)
    }
}

impl Default for RefreshInterval {
    fn default() -> Self {
        Self(5)
    }
}

/// Everything one refresh cycle and the ticker need.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Balance endpoint.
    pub url: String,
    /// Session token; `None` means not configured.
    pub token: Option<String>,
    /// Period between automatic refreshes.
    pub interval: RefreshInterval,
    /// The configured interval when it was out of range, else `None`.
    pub requested_interval: Option<i64>,
    /// Low-balance threshold in cents; zero disables the check.
    pub threshold_cents: i64,
}

impl Settings {
    /// Derive settings from a loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        let (interval, adjusted) = RefreshInterval::clamped(config.refresh.interval);
        Self {
            url: config.api.url_or_default().to_string(),
            token: config.api.token().map(str::to_string),
            interval,
            requested_interval: adjusted.then_some(config.refresh.interval),
            threshold_cents: dollars_to_cents(config.display.low_balance_threshold),
        }
    }

    /// Take the endpoint, token and threshold from `config`, keeping the
    /// interval. Returns `true` when the token changed.
    pub fn update_credentials(&mut self, config: &Config) -> bool {
        let fresh = Self::from_config(config);
        let token_changed = fresh.token != self.token;
        self.url = fresh.url;
        self.token = fresh.token;
        self.threshold_cents = fresh.threshold_cents;
        token_changed
    }

    /// Tick period for the periodic timer.
    pub fn period(&self) -> Duration {
        self.interval.as_duration()
    }

    /// Message announcing an interval adjustment, if one happened.
    pub fn interval_adjustment_message(&self) -> Option<String> {
        self.requested_interval.map(|_| {
            format!(
                "Refresh interval adjusted to {} minutes (must be between {}-{})",
                self.interval.minutes(),
                RefreshInterval::MIN_MINUTES,
                RefreshInterval::MAX_MINUTES
            )
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Load settings from `path` (or the default location).
///
/// An out-of-range interval is written back to the file in its clamped
/// form. A failed write-back is logged and does not fail the load.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let config = ConfigLoader::load(path)?;
    let settings = Settings::from_config(&config);

    if settings.requested_interval.is_some() {
        let file = xdg::resolve_config_path(path);
        if file.exists() {
            let minutes = i64::from(settings.interval.minutes());
            if let Err(e) = store::set_refresh_interval(&file, minutes) {
                warn!(error = %e, "could not write clamped refresh interval back");
            }
        }
    }

    Ok(settings)
}
