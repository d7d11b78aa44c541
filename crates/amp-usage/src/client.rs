//! HTTP client for the Amp balance endpoint.
//!
//! This module performs the single read-only request a refresh cycle needs
//! and maps every failure to an [`ApiError`] variant. It never retries.

use std::time::Duration;

#[cfg(feature = "blocking")]
use tracing::debug;

use crate::credentials::{MIN_TOKEN_LEN, SESSION_COOKIE};
use crate::error::ApiError;

/// Default free-tier balance endpoint.
pub const DEFAULT_API_URL: &str = "https://ampcode.com/_app/remote/w6b2h6/getFreeTierUsage";

/// Deadline for the whole request, connect to last body byte.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("amp-balance/", env!("CARGO_PKG_VERSION"));

/// Check the token before any I/O happens.
///
/// An absent or empty token is [`ApiError::NotConfigured`]; one shorter than
/// [`MIN_TOKEN_LEN`] characters is [`ApiError::TokenTooShort`].
pub fn validate_token(token: Option<&str>) -> Result<&str, ApiError> {
    match token.map(str::trim) {
        None | Some("") => Err(ApiError::NotConfigured),
        Some(t) if t.chars().count() < MIN_TOKEN_LEN => Err(ApiError::TokenTooShort),
        Some(t) => Ok(t),
    }
}

/// Value of the `Cookie` header for a token.
pub fn cookie_header(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}")
}

/// Fetch the raw balance response body (blocking) with the default timeout.
///
/// # Errors
///
/// Returns [`ApiError`] if:
/// - no usable token is given (no request is made)
/// - the request exceeds [`REQUEST_TIMEOUT`]
/// - the transport fails
/// - the server answers with a non-2xx status
///
/// # Security
///
/// The token is used only for this request and is not stored or logged.
#[cfg(feature = "blocking")]
pub fn fetch_usage_raw(url: &str, token: Option<&str>) -> Result<String, ApiError> {
    fetch_usage_raw_with_timeout(url, token, REQUEST_TIMEOUT)
}

/// Same as [`fetch_usage_raw`] with an explicit deadline.
#[cfg(feature = "blocking")]
pub fn fetch_usage_raw_with_timeout(
    url: &str,
    token: Option<&str>,
    timeout: Duration,
) -> Result<String, ApiError> {
    let token = validate_token(token)?;

    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| ApiError::Network(e.to_string()))?;

    debug!(url, "requesting balance");

    let response = client
        .get(url)
        .header(reqwest::header::COOKIE, cookie_header(token))
        .send()
        .map_err(map_transport_error)?;

    map_response(response)
}

/// Map HTTP response to result, handling error status codes.
#[cfg(feature = "blocking")]
fn map_response(response: reqwest::blocking::Response) -> Result<String, ApiError> {
    let status = response.status();

    if status.is_success() {
        let body = response.text().map_err(map_transport_error)?;
        debug!(bytes = body.len(), "balance response received");
        return Ok(body);
    }

    let code = status.as_u16();
    match code {
        401 | 403 => Err(ApiError::Unauthorized(code)),
        429 => {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .map(String::from);
            Err(ApiError::RateLimited { retry_after })
        }
        500..=u16::MAX => Err(ApiError::Server(code)),
        _ => Err(ApiError::Unexpected {
            status: code,
            reason: status.canonical_reason().unwrap_or_default().to_string(),
        }),
    }
}

#[cfg(feature = "blocking")]
fn map_transport_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Network(e.to_string())
    }
}


#[cfg(all(test, feature = "blocking"))]
mod http_tests {
    //! Exercises the blocking client against a throwaway local HTTP server.

    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    const TOKEN: &str = "test-session-token";

    /// Serve one canned response and report the request head that came in.
    fn serve_once(response: &'static str) -> (String, mpsc::Receiver<String>) {
        serve_once_after(response, Duration::ZERO)
    }

    fn serve_once_after(
        response: &'static str,
        delay: Duration,
    ) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind local listener");
        let addr = listener.local_addr().expect("local addr");
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let (stream, _) = listener.accept().expect("accept connection");
            let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
            let mut head = String::new();
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap_or(0) == 0 || line == "\r\n" {
                    break;
                }
                head.push_str(&line);
            }
            let _ = tx.send(head);
            thread::sleep(delay);
            let mut stream = stream;
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
        });

        (format!("http://{addr}/usage"), rx)
    }

    #[test]
    fn test_success_returns_body_and_sends_cookie() {
        let (url, rx) = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 13\r\nConnection: close\r\n\r\n{\"result\":[]}",
        );

        let body = fetch_usage_raw(&url, Some(TOKEN)).expect("request should succeed");
        assert_eq!(body, "{\"result\":[]}");

        let head = rx.recv().expect("request head").to_ascii_lowercase();
        assert!(head.starts_with("get /usage "), "head: {head}");
        assert!(head.contains("cookie: session=test-session-token"), "head: {head}");
        assert!(head.contains("user-agent: amp-balance/"), "head: {head}");
    }

    #[test]
    fn test_status_mapping() {
        let cases: [(&'static str, ApiError); 5] = [
            (
                "HTTP/1.1 401 Unauthorized\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                ApiError::Unauthorized(401),
            ),
            (
                "HTTP/1.1 403 Forbidden\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                ApiError::Unauthorized(403),
            ),
            (
                "HTTP/1.1 429 Too Many Requests\r\nRetry-After: 30\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                ApiError::RateLimited {
                    retry_after: Some("30".to_string()),
                },
            ),
            (
                "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                ApiError::Server(503),
            ),
            (
                "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                ApiError::Unexpected {
                    status: 404,
                    reason: "Not Found".to_string(),
                },
            ),
        ];

        for (response, expected) in cases {
            let (url, _rx) = serve_once(response);
            let err = fetch_usage_raw(&url, Some(TOKEN)).expect_err("should fail");
            assert_eq!(err, expected);
        }
    }

    #[test]
    fn test_timeout_is_distinct_from_network_error() {
        let (url, _rx) = serve_once_after(
            "HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\n{}",
            Duration::from_secs(2),
        );
        let err = fetch_usage_raw_with_timeout(&url, Some(TOKEN), Duration::from_millis(200))
            .expect_err("should time out");
        assert_eq!(err, ApiError::Timeout);
    }

    #[test]
    fn test_connection_refused_is_network_error() {
        // Bind then drop to get a port nobody listens on.
        let port = TcpListener::bind("127.0.0.1:0")
            .expect("bind")
            .local_addr()
            .expect("addr")
            .port();
        let url = format!("http://127.0.0.1:{port}/usage");
        let err = fetch_usage_raw(&url, Some(TOKEN)).expect_err("should fail");
        assert!(matches!(err, ApiError::Network(_)), "got {err:?}");
    }

    #[test]
    fn test_missing_token_makes_no_request() {
        let err = fetch_usage_raw("http://127.0.0.1:9/unreachable", None).expect_err("should fail");
        assert_eq!(err, ApiError::NotConfigured);
    }
}
