//! Session token extraction from pasted request snippets.
//!
//! Users obtain their token by copying the balance request out of the
//! browser's network inspector ("Copy as cURL", "Copy as fetch", ...) and
//! pasting it. Each browser and shell formats the cookie differently, so a
//! fixed list of matchers is tried in priority order and the first one that
//! yields a plausible token wins.
//!
//! # Security
//!
//! Extraction is a pure function of its input. The token is never logged;
//! persisting it is up to the caller.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ExtractError;

/// Name of the session cookie the endpoint authenticates with.
pub const SESSION_COOKIE: &str = "session";

/// A captured value must be longer than this to count as a token.
pub const MIN_TOKEN_LEN: usize = 10;

/// `-b "...session=VALUE..."` (cURL cookie flag, any platform's quoting).
///
/// VALUE stops at a semicolon, whitespace, caret (cmd.exe escaping), or quote.
static COOKIE_FLAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:^|\s)(?:-b|--cookie)\s+\^?["'][^"']*?session=([^;\s^"']+)"#)
        .expect("cookie flag pattern is valid")
});

/// `-H "Cookie: session=VALUE"` (cURL header flag).
static COOKIE_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"-H\s+["']Cookie:\s+session=([^"';]+)"#).expect("cookie header pattern is valid")
});

/// `"Cookie": "session=VALUE"` (fetch snippet headers object).
static COOKIE_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""Cookie":\s*"session=([^"]+)"#).expect("cookie field pattern is valid")
});

/// `session=VALUE` anywhere, restricted to token-safe characters.
static BARE_SESSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"session=([a-zA-Z0-9_\-*.]+)").expect("bare session pattern is valid")
});

/// Extract the session token from a pasted request snippet.
///
/// Matchers, in priority order:
///
/// 1. cookie flag: `-b "...session=VALUE..."`
/// 2. header flag: `-H "Cookie: session=VALUE"`
/// 3. headers object: `"Cookie": "session=VALUE"`
/// 4. bare `session=VALUE`
///
/// Priority is by matcher, not by position in the text. A value is accepted
/// only if it is longer than [`MIN_TOKEN_LEN`] characters. Values are cut
/// at the first character outside the matcher's allowed set.
///
/// # Errors
///
/// Returns [`ExtractError::NoSessionToken`] when no matcher produces an
/// acceptable value.
pub fn extract_session_token(text: &str) -> Result<String, ExtractError> {
    [&*COOKIE_FLAG, &*COOKIE_HEADER, &*COOKIE_FIELD, &*BARE_SESSION]
        .into_iter()
        .filter_map(|pattern| pattern.captures(text))
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .find(|value| value.chars().count() > MIN_TOKEN_LEN)
        .map(str::to_string)
        .ok_or(ExtractError::NoSessionToken)
}
