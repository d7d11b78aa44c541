//! Derived balance quantities and severity tiers.
//!
//! Pure arithmetic over a validated [`UsageSample`]. Nothing here touches the
//! network or the clock.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::types::{UsageRecord, UsageSample};

/// Rounded percent used at or above which the balance is critical.
pub const CRITICAL_PERCENT: i64 = 90;

/// Rounded percent used at or above which the balance is a warning.
pub const WARNING_PERCENT: i64 = 70;

impl UsageRecord {
    /// Derive `remaining` and `percent_used` from a validated sample.
    ///
    /// `percent_used` may exceed 100 when `used > quota`.
    ///
    /// # Errors
    ///
    /// [`ParseError::InvalidNumericData`] when `quota - used` does not fit
    /// in an `i64`.
    pub fn from_sample(sample: UsageSample) -> Result<Self, ParseError> {
        let UsageSample {
            quota,
            used,
            replenishment_rate,
        } = sample;
        let remaining = quota
            .checked_sub(used)
            .ok_or(ParseError::InvalidNumericData)?;
        Ok(Self {
            quota,
            used,
            remaining,
            percent_used: used as f64 / quota as f64 * 100.0,
            replenishment_rate,
        })
    }
}

/// Severity of the current balance, driving styling and warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tier {
    /// Remaining balance is under the configured threshold.
    Low,
    /// 90% or more of the quota is used.
    Critical,
    /// 70% or more of the quota is used.
    Warning,
    /// Everything else.
    Normal,
}

impl Tier {
    /// Classify a record against a low-balance threshold in cents.
    ///
    /// The threshold check wins over the percentage bands; a threshold of
    /// zero (or below) disables it. Bands compare the rounded percent, the
    /// same figure users see next to the tier.
    pub fn classify(record: &UsageRecord, threshold_cents: i64) -> Self {
        let percent = record.percent_rounded();
        if threshold_cents > 0 && record.remaining < threshold_cents {
            Tier::Low
        } else if percent >= CRITICAL_PERCENT {
            Tier::Critical
        } else if percent >= WARNING_PERCENT {
            Tier::Warning
        } else {
            Tier::Normal
        }
    }

    /// Stable lowercase name, used as a style class by renderers.
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Low => "low",
            Tier::Critical => "critical",
            Tier::Warning => "warning",
            Tier::Normal => "normal",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Convert a currency-unit amount (dollars) into cents.
///
/// Rounds to the nearest cent. Non-finite input maps to zero, which
/// disables the low-balance check.
pub fn dollars_to_cents(dollars: f64) -> i64 {
    if dollars.is_finite() {
        (dollars * 100.0).round() as i64
    } else {
        0
    }
}

/// Format cents as dollars with two decimals, e.g. `$12.34` or `-$0.50`.
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}${}.{:02}", abs / 100, abs % 100)
}
