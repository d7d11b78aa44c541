//! Plain-data view model for the balance status.
//!
//! Turns a [`PresentationState`] into the strings a status host shows. This
//! module is a **stateless renderer**: styling (colors, fonts) is left to
//! the rendering adapter, which gets the [`Tier`] alongside the text.
//!
//! # Display Formats
//!
//! - **Status text**: `🟢 Amp Free Balance: $3.77`
//! - **Tooltip**: `Used: $1.23 of $5.00 (25%) | Daily replenishment: +$0.10/hour`
//! - **Rows**: progress bar, used/quota, remaining, replenishment, update time
//!
//! # Tier Icons
//!
//! | Tier     | Icon |
//! |----------|------|
//! | Low      | ⚠️    |
//! | Critical | 🔴   |
//! | Warning  | 🟡   |
//! | Normal   | 🟢   |

use amp_usage::{format_cents, Tier, UsageRecord};
use chrono::{DateTime, Local, Utc};

use crate::refresh::PresentationState;

/// Label every status text starts with (after the icon, when there is one).
pub const TITLE: &str = "Amp Free Balance";

/// Number of cells in the progress bar.
pub const BAR_CELLS: usize = 20;

const FILLED_CELL: char = '█';
const EMPTY_CELL: char = '░';

/// Status line plus tooltip for one state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    /// Short status text.
    pub text: String,
    /// Longer hover text.
    pub tooltip: String,
    /// Severity, present only for a ready balance.
    pub tier: Option<Tier>,
}

impl StatusView {
    /// Build the status view for `state`.
    pub fn from_state(state: &PresentationState) -> Self {
        match state {
            PresentationState::Unconfigured => Self {
                text: format!("{TITLE}: Not configured"),
                tooltip: "Run 'amp-balance setup' to configure your session token".to_string(),
                tier: None,
            },
            PresentationState::Loading => Self {
                text: format!("{TITLE}: Loading..."),
                tooltip: "Fetching balance...".to_string(),
                tier: None,
            },
            PresentationState::Error { message } => Self {
                text: format!("{TITLE}: Error"),
                tooltip: format!("Error: {message}"),
                tier: None,
            },
            PresentationState::Ready { record, tier, .. } => Self {
                text: format!(
                    "{} {TITLE}: {}",
                    tier_icon(*tier),
                    format_cents(record.remaining)
                ),
                tooltip: format!(
                    "Used: {} of {} ({}%) | Daily replenishment: +{}/hour",
                    format_cents(record.used),
                    format_cents(record.quota),
                    record.percent_rounded(),
                    format_cents(record.replenishment_rate)
                ),
                tier: Some(*tier),
            },
        }
    }
}

/// Icon shown in front of a ready balance.
pub fn tier_icon(tier: Tier) -> &'static str {
    match tier {
        Tier::Low => "⚠️",
        Tier::Critical => "🔴",
        Tier::Warning => "🟡",
        Tier::Normal => "🟢",
    }
}

/// Detail rows for `state` (the tree view).
pub fn rows(state: &PresentationState) -> Vec<String> {
    match state {
        PresentationState::Unconfigured => setup_rows(),
        PresentationState::Loading => vec!["⏳ Loading balance...".to_string()],
        PresentationState::Error { message } => vec![format!("Error: {message}")],
        PresentationState::Ready {
            record, updated_at, ..
        } => ready_rows(record, *updated_at),
    }
}

fn ready_rows(record: &UsageRecord, updated_at: DateTime<Utc>) -> Vec<String> {
    let percent = record.percent_rounded();
    vec![
        format!("{}  {percent}%", progress_bar(percent)),
        String::new(),
        format!(
            "Used: {} / {}",
            format_cents(record.used),
            format_cents(record.quota)
        ),
        format!("Remaining: {}", format_cents(record.remaining)),
        format!(
            "Replenish: +{}/hour",
            format_cents(record.replenishment_rate)
        ),
        format!(
            "Updated: {}",
            updated_at.with_timezone(&Local).format("%H:%M:%S")
        ),
    ]
}

fn setup_rows() -> Vec<String> {
    [
        "⚙️  Setup Required",
        "",
        "1️⃣  Run 'amp-balance setup'",
        "    then go to ampcode.com/settings",
        "",
        "2️⃣  Press F12 → Network tab",
        "3️⃣  Look for \"getFreeTierUsage\" request",
        "4️⃣  Right-click → Copy as cURL",
        "5️⃣  Paste the cURL command",
        "6️⃣  Done! Token auto-saved ✅",
        "",
        "⏰ Session expires periodically",
        "   If auth fails, repeat steps 1-6",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

/// A [`BAR_CELLS`]-wide bar for a rounded percentage.
///
/// Percentages outside 0..=100 fill nothing or everything.
pub fn progress_bar(percent: i64) -> String {
    let filled = ((percent as f64 / 100.0) * BAR_CELLS as f64)
        .round()
        .clamp(0.0, BAR_CELLS as f64) as usize;
    let mut bar = String::with_capacity(BAR_CELLS * FILLED_CELL.len_utf8());
    bar.extend(std::iter::repeat(FILLED_CELL).take(filled));
    bar.extend(std::iter::repeat(EMPTY_CELL).take(BAR_CELLS - filled));
    bar
}

/// Message for the one-shot low-balance notification.
pub fn low_balance_warning(record: &UsageRecord, threshold_cents: i64) -> String {
    format!(
        "Low balance: {} remaining (threshold: {})",
        format_cents(record.remaining),
        format_cents(threshold_cents)
    )
}
