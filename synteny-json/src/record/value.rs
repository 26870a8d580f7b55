//! Best-effort coercion of loosely-typed JSON values.

use serde_json::Value;

/// Parses a value as an integer the way a lenient decimal parser does.
///
/// Integers are taken as is; finite floats are truncated; strings parse their leading
/// decimal digits after leading whitespace, so `"1500bp"` is 1500. Everything else, including
/// `null`, booleans, and strings without leading digits, is `None`.
fn parse_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|x| x.is_finite() && x.abs() < 9.2e18)
                .map(|x| x.trunc() as i64)
        }),
        Value::String(s) => parse_int_prefix(s),
        _ => None,
    }
}

fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();

    let (is_negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());

    if end == 0 {
        return None;
    }

    let n: i64 = digits[..end].parse().ok()?;

    Some(if is_negative { -n } else { n })
}

/// Parses a value as a non-negative integer.
pub(super) fn parse_uint(value: &Value) -> Option<u64> {
    parse_int(value).and_then(|n| u64::try_from(n).ok())
}

/// Parses a value as a number, defaulting to 0.
///
/// Numeric strings (surrounding whitespace allowed) and booleans are converted; any other
/// value, or a value that does not convert to a finite number, is 0.
pub(super) fn parse_number_or_zero(value: Option<&Value>) -> f64 {
    let n = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        Some(Value::Bool(b)) => Some(f64::from(u8::from(*b))),
        _ => None,
    };

    n.filter(|x| x.is_finite()).unwrap_or_default()
}

/// Returns a value as a sequence name.
///
/// Strings are used as is, and numbers are rendered. Empty strings and all other values are
/// `None`.
pub(super) fn as_name(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
