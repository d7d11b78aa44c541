//! Type definitions for the Amp free-tier balance data.
//!
//! The endpoint answers with a positional array rather than named fields, so
//! these structures are the crate's own names for the values it picks out.
//! All monetary amounts are integer cents.

use serde::{Deserialize, Serialize};

/// Validated raw values picked out of the endpoint's array.
///
/// Produced by [`parse_usage`](crate::parse_usage); `quota` is always
/// positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageSample {
    /// Total allotted budget (array index 2).
    pub quota: i64,
    /// Consumed portion of the budget (array index 6).
    pub used: i64,
    /// Cents restored per hour (array index 3).
    pub replenishment_rate: i64,
}

/// Balance snapshot with derived quantities.
///
/// Built fresh on every successful refresh and replaced wholesale, never
/// patched field by field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UsageRecord {
    /// Total allotted budget.
    pub quota: i64,

    /// Consumed portion of the budget.
    pub used: i64,

    /// `quota - used`. Negative when the budget is overdrawn.
    pub remaining: i64,

    /// `used / quota * 100`.
    ///
    /// Not clamped: values over 100.0 mean more than the quota was used.
    pub percent_used: f64,

    /// Cents restored per hour.
    pub replenishment_rate: i64,
}

impl UsageRecord {
    /// Percent used rounded half away from zero, as shown to users.
    pub fn percent_rounded(&self) -> i64 {
        self.percent_used.round() as i64
    }
}
