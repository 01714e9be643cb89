//! Identifier sanitization for the metric wire protocol.
//!
//! User-supplied metric names, tag keys/values and units are free-form
//! strings; the downstream wire encoding only accepts a restricted character
//! set. Sanitization never rejects input; it transforms it, so the caller
//! always ends up with something forwardable and never sees a "bad metric
//! name" error.
//!
//! Two policies exist and they differ deliberately:
//!
//! - names and tag values have invalid characters *removed*, compacting the
//!   identifier, while
//! - units have invalid characters *replaced* with `_`, preserving token
//!   boundaries.
//!
//! Both transforms are deterministic, idempotent and total. Already-clean
//! input is returned borrowed, so the hot path allocates nothing.

use std::borrow::Cow;

fn is_value_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '_' | ':' | '/' | '@' | '.' | '{' | '}' | '[' | ']' | '$' | '-'
        )
}

fn is_unit_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.')
}

/// Sanitize a metric name or tag key/value.
///
/// Retains only `A-Z a-z 0-9 _ : / @ . { } [ ] $ -`; every other character
/// is removed. Relative order of retained characters is preserved.
///
/// # Examples
///
/// ```
/// use telemetry_guard::sanitize_value;
///
/// assert_eq!(sanitize_value("endpoint.hits"), "endpoint.hits");
/// assert_eq!(sanitize_value("test&value"), "testvalue");
/// ```
pub fn sanitize_value(input: &str) -> Cow<'_, str> {
    match input.find(|c: char| !is_value_char(c)) {
        None => Cow::Borrowed(input),
        Some(first_invalid) => {
            let mut out = String::with_capacity(input.len());
            out.push_str(&input[..first_invalid]);
            out.extend(input[first_invalid..].chars().filter(|&c| is_value_char(c)));
            Cow::Owned(out)
        }
    }
}

/// Sanitize a metric unit.
///
/// Retains only `A-Z a-z 0-9 _ .`; every other character is replaced with
/// `_`, one output character per invalid input character.
///
/// # Examples
///
/// ```
/// use telemetry_guard::sanitize_unit;
///
/// assert_eq!(sanitize_unit("millisecond"), "millisecond");
/// assert_eq!(sanitize_unit("req/s"), "req_s");
/// ```
pub fn sanitize_unit(input: &str) -> Cow<'_, str> {
    match input.find(|c: char| !is_unit_char(c)) {
        None => Cow::Borrowed(input),
        Some(first_invalid) => {
            let mut out = String::with_capacity(input.len());
            out.push_str(&input[..first_invalid]);
            out.extend(
                input[first_invalid..]
                    .chars()
                    .map(|c| if is_unit_char(c) { c } else { '_' }),
            );
            Cow::Owned(out)
        }
    }
}
