//! Decoder for the balance endpoint's response body.
//!
//! The endpoint answers `{"result": ...}` where `result` is either a JSON
//! array or a string holding a JSON-encoded array. The array is positional
//! and undocumented; the indices below are pinned to what the service sends
//! today. If upstream reorders the array, update the indices.

use serde_json::Value;

use crate::error::ParseError;
use crate::types::UsageSample;

/// Minimum number of elements the `result` array must carry.
pub const MIN_RESULT_LEN: usize = 7;

/// Position of the quota in the `result` array.
pub const QUOTA_INDEX: usize = 2;

/// Position of the hourly replenishment rate in the `result` array.
pub const REPLENISHMENT_INDEX: usize = 3;

/// Position of the used amount in the `result` array.
pub const USED_INDEX: usize = 6;

const PREVIEW_CHARS: usize = 100;

/// Decode a raw response body into a validated [`UsageSample`].
///
/// # Errors
///
/// - [`ParseError::Malformed`] if the body, or a string-encoded `result`,
///   is not valid JSON.
/// - [`ParseError::UnexpectedShape`] if `result` is not an array of at
///   least [`MIN_RESULT_LEN`] elements.
/// - [`ParseError::InvalidNumericData`] if a picked element is not an
///   integer or the quota is not positive.
pub fn parse_usage(raw: &str) -> Result<UsageSample, ParseError> {
    let document: Value = serde_json::from_str(raw).map_err(|e| ParseError::Malformed {
        nested: false,
        detail: e.to_string(),
    })?;

    let result = unwrap_result(&document)?;

    let items = match result.as_array() {
        Some(items) if items.len() >= MIN_RESULT_LEN => items,
        _ => {
            return Err(ParseError::UnexpectedShape {
                preview: preview(&result),
            })
        }
    };

    let quota = coerce_int(&items[QUOTA_INDEX]);
    let replenishment_rate = coerce_int(&items[REPLENISHMENT_INDEX]);
    let used = coerce_int(&items[USED_INDEX]);

    match (quota, used, replenishment_rate) {
        (Some(quota), Some(used), Some(replenishment_rate)) if quota > 0 => Ok(UsageSample {
            quota,
            used,
            replenishment_rate,
        }),
        _ => Err(ParseError::InvalidNumericData),
    }
}

/// Extract `result`, decoding it once more if the server double-encoded it.
///
/// Exactly one extra level is unwrapped: a string that decodes to another
/// string is left as a string and will fail the shape check.
fn unwrap_result(document: &Value) -> Result<Value, ParseError> {
    match document.get("result") {
        Some(Value::String(encoded)) => {
            serde_json::from_str(encoded).map_err(|e| ParseError::Malformed {
                nested: true,
                detail: e.to_string(),
            })
        }
        Some(value) => Ok(value.clone()),
        None => Ok(Value::Null),
    }
}

/// Coerce a JSON value to an integer the way a lenient integer parser would.
///
/// - integers are taken as-is
/// - finite floats are truncated toward zero
/// - strings yield their leading, optionally signed, run of ASCII digits
///   after leading whitespace (`" 42px"` is 42, `"px"` is rejected)
///
/// Anything else (null, bool, array, object) is rejected.
fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => leading_int(s),
        _ => None,
    }
}

fn leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    let magnitude: i64 = rest[..digits_len].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

fn preview(value: &Value) -> String {
    value.to_string().chars().take(PREVIEW_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(result: &str) -> String {
        format!(r#"{{"result": {result}}}"#)
    }

    #[test]
    fn test_parse_string_elements() {
        let raw = body(r#"["a", "b", "500", "10", "e", "f", "123"]"#);
        let sample = parse_usage(&raw).expect("should parse");
        assert_eq!(
            sample,
            UsageSample {
                quota: 500,
                used: 123,
                replenishment_rate: 10
            }
        );
    }

    #[test]
    fn test_parse_numeric_elements() {
        let raw = body("[0, 0, 1000, 42, 0, 0, 250, 99]");
        let sample = parse_usage(&raw).expect("should parse");
        assert_eq!(sample.quota, 1000);
        assert_eq!(sample.replenishment_rate, 42);
        assert_eq!(sample.used, 250);
    }

    #[test]
    fn test_parse_nested_string_result() {
        let inner = r#"[null, null, "500", "10", null, null, "123"]"#;
        let raw = serde_json::json!({ "result": inner }).to_string();
        let sample = parse_usage(&raw).expect("nested result should unwrap");
        assert_eq!(sample.quota, 500);
        assert_eq!(sample.used, 123);
    }

    #[test]
    fn test_nested_unwrap_is_single_level() {
        let inner = r#"[null, null, "500", "10", null, null, "123"]"#;
        let once = serde_json::to_string(inner).expect("encode");
        let raw = serde_json::json!({ "result": once }).to_string();
        let err = parse_usage(&raw).expect_err("doubly nested should not unwrap");
        assert!(matches!(err, ParseError::UnexpectedShape { .. }));
    }

    #[test]
    fn test_malformed_top_level() {
        let err = parse_usage("<html>Bad gateway</html>").expect_err("should fail");
        assert!(matches!(err, ParseError::Malformed { nested: false, .. }));
    }

    #[test]
    fn test_malformed_nested() {
        let raw = serde_json::json!({ "result": "[1, 2," }).to_string();
        let err = parse_usage(&raw).expect_err("should fail");
        assert!(matches!(err, ParseError::Malformed { nested: true, .. }));
    }

    #[test]
    fn test_short_array_is_unexpected_shape() {
        let raw = body("[1, 2, 3, 4, 5]");
        let err = parse_usage(&raw).expect_err("should fail");
        match err {
            ParseError::UnexpectedShape { preview } => assert_eq!(preview, "[1,2,3,4,5]"),
            other => panic!("expected UnexpectedShape, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_result_is_unexpected_shape() {
        let err = parse_usage(r#"{"data": [1,2,3,4,5,6,7]}"#).expect_err("should fail");
        assert!(matches!(err, ParseError::UnexpectedShape { .. }));
    }

    #[test]
    fn test_object_result_is_unexpected_shape() {
        let err = parse_usage(&body(r#"{"quota": 5}"#)).expect_err("should fail");
        assert!(matches!(err, ParseError::UnexpectedShape { .. }));
    }

    #[test]
    fn test_preview_is_truncated() {
        let long: Vec<String> = (0..3).map(|_| "x".repeat(80)).collect();
        let raw = serde_json::json!({ "result": long }).to_string();
        match parse_usage(&raw).expect_err("should fail") {
            ParseError::UnexpectedShape { preview } => assert_eq!(preview.chars().count(), 100),
            other => panic!("expected UnexpectedShape, got {other:?}"),
        }
    }

    #[test]
    fn test_non_numeric_element_is_invalid() {
        let raw = body(r#"[0, 0, "lots", 10, 0, 0, 5]"#);
        assert_eq!(parse_usage(&raw), Err(ParseError::InvalidNumericData));

        let raw = body("[0, 0, 500, null, 0, 0, 5]");
        assert_eq!(parse_usage(&raw), Err(ParseError::InvalidNumericData));

        let raw = body("[0, 0, 500, 10, 0, 0, true]");
        assert_eq!(parse_usage(&raw), Err(ParseError::InvalidNumericData));
    }

    #[test]
    fn test_non_positive_quota_is_invalid() {
        assert_eq!(
            parse_usage(&body("[0, 0, 0, 10, 0, 0, 5]")),
            Err(ParseError::InvalidNumericData)
        );
        assert_eq!(
            parse_usage(&body(r#"[0, 0, "-100", 10, 0, 0, 5]"#)),
            Err(ParseError::InvalidNumericData)
        );
    }

    #[test]
    fn test_lenient_integer_coercion() {
        let raw = body(r#"[0, 0, "  500 cents", 10.9, 0, 0, "+123.7"]"#);
        let sample = parse_usage(&raw).expect("should parse");
        assert_eq!(sample.quota, 500);
        assert_eq!(sample.replenishment_rate, 10);
        assert_eq!(sample.used, 123);
    }

    #[test]
    fn test_leading_int() {
        assert_eq!(leading_int("42"), Some(42));
        assert_eq!(leading_int("-7abc"), Some(-7));
        assert_eq!(leading_int("\t 8"), Some(8));
        assert_eq!(leading_int(""), None);
        assert_eq!(leading_int("-"), None);
        assert_eq!(leading_int("abc"), None);
        assert_eq!(leading_int("99999999999999999999999"), None);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let raw = body(r#"["a", "b", "500", "10", "e", "f", "123"]"#);
        let first = parse_usage(&raw).expect("should parse");
        let second = parse_usage(&raw).expect("should parse");
        assert_eq!(first, second);
    }
}
