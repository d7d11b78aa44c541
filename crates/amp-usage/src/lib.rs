//! # amp-usage
//!
//! A library for fetching and interpreting the Amp free-tier balance.
//!
//! The crate covers one refresh cycle end to end, without any UI:
//!
//! - [`extract_session_token`] pulls the session token out of a pasted
//!   request snippet ("Copy as cURL" and friends)
//! - [`fetch_usage_raw`] performs the bounded-time request
//! - [`parse_usage`] decodes the positional payload
//! - [`UsageRecord::from_sample`] and [`Tier::classify`] derive the balance
//!   and its severity
//!
//! ## Example
//!
//! ```rust,no_run
//! use amp_usage::{format_cents, get_usage, DEFAULT_API_URL};
//!
//! let (record, tier) = get_usage(DEFAULT_API_URL, Some("my-session-token"), 100)?;
//! println!("{} remaining ({tier})", format_cents(record.remaining));
//! # Ok::<(), amp_usage::Error>(())
//! ```

pub mod calculator;
pub mod client;
pub mod credentials;
pub mod error;
pub mod parser;
pub mod types;

pub use calculator::{dollars_to_cents, format_cents, Tier};
#[cfg(feature = "blocking")]
pub use client::{fetch_usage_raw, fetch_usage_raw_with_timeout};
pub use client::{DEFAULT_API_URL, REQUEST_TIMEOUT};
pub use credentials::extract_session_token;
pub use error::{ApiError, Error, ExtractError, ParseError};
pub use parser::parse_usage;
pub use types::{UsageRecord, UsageSample};

/// Interpret a raw response body: parse, derive, classify.
///
/// # Errors
///
/// Returns [`ParseError`] if the body cannot be decoded into a valid sample.
pub fn interpret(raw: &str, threshold_cents: i64) -> Result<(UsageRecord, Tier), ParseError> {
    let record = UsageRecord::from_sample(parse_usage(raw)?)?;
    let tier = Tier::classify(&record, threshold_cents);
    Ok((record, tier))
}

/// Fetch, parse and classify the current balance in one call (blocking).
///
/// `threshold_cents` is the low-balance threshold; zero disables it.
///
/// # Errors
///
/// Returns [`Error::Api`] if the request fails and [`Error::Parse`] if the
/// response cannot be interpreted.
#[cfg(feature = "blocking")]
pub fn get_usage(
    url: &str,
    token: Option<&str>,
    threshold_cents: i64,
) -> Result<(UsageRecord, Tier), Error> {
    let raw = fetch_usage_raw(url, token)?;
    Ok(interpret(&raw, threshold_cents)?)
}
