//! Coercion of raw widget attributes
//!
//! Attribute values arrive from the host as loosely typed JSON. Nothing in
//! here fails: malformed or negative values collapse to 0 so a broken
//! attribute can never take the widget down.

use serde_json::Value;
use tracing::warn;

/// Parse a leading integer the way a browser `parseInt` would.
///
/// Leading whitespace and an optional sign are accepted, parsing stops at the
/// first non-digit. Returns `None` when no digits are found.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    // Saturate instead of overflowing on absurdly long digit runs
    let magnitude = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Coerce an arbitrary JSON value into a signed integer, if it holds one
pub fn value_as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|v| i64::try_from(v).unwrap_or(i64::MAX)))
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => parse_leading_int(s),
        _ => None,
    }
}

/// Coerce a raw attribute into a non-negative second count.
///
/// `field` only labels the warning emitted for malformed input.
pub fn coerce_seconds(field: &str, value: Option<&Value>) -> u64 {
    match value.and_then(value_as_int) {
        Some(n) if n >= 0 => n as u64,
        Some(n) => {
            warn!("Negative {} attribute ({}), clamping to 0", field, n);
            0
        }
        None => {
            warn!("Malformed {} attribute ({:?}), defaulting to 0", field, value);
            0
        }
    }
}
