//! The presentation state a refresh cycle produces.

use amp_usage::{Tier, UsageRecord};
use chrono::{DateTime, Utc};

/// What the status host should show right now.
///
/// Replaced wholesale by each cycle; no field survives from one cycle to the
/// next.
#[derive(Debug, Clone, PartialEq)]
pub enum PresentationState {
    /// No session token is configured.
    Unconfigured,
    /// A cycle is in flight.
    Loading,
    /// The last cycle succeeded.
    Ready {
        /// Balance derived from the response.
        record: UsageRecord,
        /// Severity under the threshold in force for that cycle.
        tier: Tier,
        /// When the record was produced.
        updated_at: DateTime<Utc>,
    },
    /// The last cycle failed.
    Error {
        /// Human-readable failure message.
        message: String,
    },
}

impl PresentationState {
    /// Short lowercase name, used in logs and as the JSON `class` fallback.
    pub fn name(&self) -> &'static str {
        match self {
            PresentationState::Unconfigured => "unconfigured",
            PresentationState::Loading => "loading",
            PresentationState::Ready { .. } => "ready",
            PresentationState::Error { .. } => "error",
        }
    }

    /// The current record, present only when `Ready`.
    pub fn record(&self) -> Option<&UsageRecord> {
        match self {
            PresentationState::Ready { record, .. } => Some(record),
            _ => None,
        }
    }

    /// The current tier, present only when `Ready`.
    pub fn tier(&self) -> Option<Tier> {
        match self {
            PresentationState::Ready { tier, .. } => Some(*tier),
            _ => None,
        }
    }
}
