//! Polars AnyValue utility functions.
//!
//! Source tables are read with every column as text, so most cells arrive as
//! `AnyValue::String`. The helpers here still accept the numeric variants so a
//! frame built in memory (tests, typed inference) goes through the same path.

use polars::prelude::AnyValue;

/// Converts a Polars `AnyValue` to trimmed text.
///
/// Returns `None` for `Null` and for cells that are blank after trimming, so a
/// missing value and an empty string are indistinguishable downstream.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use pvl_common::any_to_text;
///
/// assert_eq!(any_to_text(AnyValue::Null), None);
/// assert_eq!(any_to_text(AnyValue::String("  ")), None);
/// assert_eq!(any_to_text(AnyValue::Int32(42)), Some("42".to_string()));
/// assert_eq!(any_to_text(AnyValue::String(" aspirin ")), Some("aspirin".to_string()));
/// ```
pub fn any_to_text(value: AnyValue<'_>) -> Option<String> {
    let text = match value {
        AnyValue::Null => return None,
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        other => other.to_string(),
    };
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Formats a floating-point number without trailing fractional zeros.
///
/// # Examples
///
/// ```
/// use pvl_common::format_numeric;
///
/// assert_eq!(format_numeric(1.0), "1");
/// assert_eq!(format_numeric(10.0), "10");
/// assert_eq!(format_numeric(2.50), "2.5");
/// ```
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if !s.contains('.') {
        return s;
    }
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn float_to_i64(v: f64) -> Option<i64> {
    (v.is_finite() && v.fract() == 0.0).then_some(v as i64)
}

/// Parses a string as `f64`, returning `None` for empty, invalid or NaN input.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Parses a string as `i64`.
///
/// Integral floats such as `"25.0"` are accepted because numeric exports
/// frequently widen integer columns.
pub fn parse_i64(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .parse::<i64>()
        .ok()
        .or_else(|| trimmed.parse::<f64>().ok().and_then(float_to_i64))
}

/// Returns the first run of ASCII digits in `value` as a number.
///
/// # Examples
///
/// ```
/// use pvl_common::leading_digits;
///
/// assert_eq!(leading_digits("RxNorm:313782"), Some(313782));
/// assert_eq!(leading_digits("1049221"), Some(1049221));
/// assert_eq!(leading_digits("no code"), None);
/// ```
pub fn leading_digits(value: &str) -> Option<i64> {
    let start = value.find(|ch: char| ch.is_ascii_digit())?;
    let rest = &value[start..];
    let end = rest
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(rest.len());
    rest[..end].parse::<i64>().ok()
}
