//! Error types for the amp-usage crate.
//!
//! Every failure a refresh cycle can hit has its own variant so callers can
//! tell a missing token from an expired one, a slow network from a broken
//! payload. The `Display` strings are written for end users: they end up
//! verbatim in the status tooltip.

use thiserror::Error;

/// Errors raised while requesting the balance endpoint.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No session token is configured.
    #[error("Session token not configured. Run `amp-balance setup` to configure it.")]
    NotConfigured,

    /// The configured token is too short to be a real session token.
    #[error("Session token appears to be invalid (too short). Please reconfigure your token.")]
    TokenTooShort,

    /// The request did not complete before the deadline.
    #[error("Request timed out. Check your internet connection.")]
    Timeout,

    /// Transport-level failure (DNS, refused connection, TLS, body read).
    #[error("Network error: {0}")]
    Network(String),

    /// Server rejected the session token (401 or 403).
    #[error("Authentication failed ({0}). Your session token may have expired. Please reconfigure.")]
    Unauthorized(u16),

    /// Rate limited (429).
    #[error("Rate limited. Please try again later.")]
    RateLimited {
        /// Raw `Retry-After` header value, if the server sent one.
        retry_after: Option<String>,
    },

    /// Server error (5xx).
    #[error("Server error ({0}). Amp API may be temporarily unavailable.")]
    Server(u16),

    /// Any other non-success status.
    #[error("API returned {status}: {reason}")]
    Unexpected {
        /// HTTP status code.
        status: u16,
        /// Canonical reason phrase, empty when unknown.
        reason: String,
    },
}

/// Errors raised while decoding the endpoint's response body.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The body (or the string nested in `result`) is not valid JSON.
    #[error("{}", malformed_message(.nested))]
    Malformed {
        /// `true` when the failure happened while unwrapping `result`.
        nested: bool,
        /// Decoder message, kept for logs.
        detail: String,
    },

    /// `result` is missing, not an array, or has fewer than 7 elements.
    #[error("Unexpected API response format. Expected array with at least 7 elements, got: {preview}...")]
    UnexpectedShape {
        /// Up to 100 characters of the offending value.
        preview: String,
    },

    /// Quota, used, or replenishment rate is not an integer, or quota <= 0.
    #[error("Invalid numeric data in API response. The service may be experiencing issues.")]
    InvalidNumericData,
}

fn malformed_message(nested: &bool) -> &'static str {
    if *nested {
        "Invalid nested JSON in API response."
    } else {
        "Invalid JSON response from API. The service may be experiencing issues."
    }
}

/// Errors raised while pulling a session token out of pasted text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// None of the matchers produced an acceptable token.
    #[error("Could not parse session cookie. Make sure you pasted the full cURL command starting with \"curl\".")]
    NoSessionToken,
}

/// Umbrella error for the whole fetch, parse, calculate pipeline.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Request failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Response could not be interpreted.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Token extraction failed.
    #[error(transparent)]
    Extract(#[from] ExtractError),
}
