//! Where a refresh cycle gets the raw response body from.

use amp_usage::ApiError;

/// Blocking fetch of the raw balance response.
///
/// Called from the blocking thread pool, never on the async runtime.
pub trait UsageSource: Send + Sync + 'static {
    /// Fetch the raw body from `url` authenticating with `token`.
    fn fetch(&self, url: &str, token: &str) -> Result<String, ApiError>;
}

/// Production source backed by `amp_usage`'s blocking HTTP client.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpSource;

impl UsageSource for HttpSource {
    fn fetch(&self, url: &str, token: &str) -> Result<String, ApiError> {
        amp_usage::fetch_usage_raw(url, Some(token))
    }
}

impl<F> UsageSource for F
where
    F: Fn(&str, &str) -> Result<String, ApiError> + Send + Sync + 'static,
{
    fn fetch(&self, url: &str, token: &str) -> Result<String, ApiError> {
        self(url, token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_is_a_source() {
        let source = |url: &str, token: &str| -> Result<String, ApiError> {
            Ok(format!("{url}|{token}"))
        };
        assert_eq!(source.fetch("u", "t"), Ok("u|t".to_string()));
    }

    #[test]
    fn test_http_source_rejects_short_token_without_request() {
        let err = HttpSource
            .fetch("http://127.0.0.1:9/unreachable", "short")
            .expect_err("should fail");
        assert_eq!(err, ApiError::TokenTooShort);
    }
}
