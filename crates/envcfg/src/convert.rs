// crates/envcfg/src/convert.rs
// ============================================================================
// Module: Value Conversion
// Description: String-to-type parsers used by the typed getters.
// Purpose: Convert raw environment strings without ever failing loudly.
// Dependencies: serde_json, time
// ============================================================================

//! ## Overview
//! Every parser returns `Option`: `None` means the text is not a valid value
//! of the requested type. The accessor maps `None` onto the getter's zero
//! value.
//!
//! Accepted formats:
//! - bool: `1 t T TRUE true True` and `0 f F FALSE false False`.
//! - duration: signed sequence of decimal numbers with unit suffixes, such as
//!   `300ms`, `-1.5h` or `2h45m`. Units are `ns`, `us` (`µs`, `μs`), `ms`, `s`,
//!   `m`, `h`. A bare `0` is accepted.
//! - float: decimal or exponent notation within `f32` range. Overflowing
//!   text is rejected; `inf`, `infinity` and `nan` are accepted as written.
//! - datetime: `YYYY-MM-DD HH:MM:SS` with optional fractional seconds,
//!   interpreted as UTC.
//! - arrays: a JSON array when the text contains both `[` and `]`, otherwise a
//!   comma-separated list when the text contains `,`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use time::Duration;
use time::OffsetDateTime;
use time::PrimitiveDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Layout accepted by [`parse_datetime`].
const DATETIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second][optional [.[subsecond]]]");
/// Fraction digits kept when parsing a duration component.
const MAX_FRACTION_DIGITS: usize = 18;

// ============================================================================
// SECTION: Scalars
// ============================================================================

/// Parses the boolean spellings listed in the module docs.
#[must_use]
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Parses an `f32`, rejecting finite text that overflows to infinity.
#[must_use]
pub fn parse_float(value: &str) -> Option<f32> {
    let parsed: f32 = value.parse().ok()?;
    if parsed.is_finite() {
        return Some(parsed);
    }
    let unsigned = value.trim_start_matches(['+', '-']).to_ascii_lowercase();
    matches!(unsigned.as_str(), "inf" | "infinity" | "nan").then_some(parsed)
}

/// Parses a `YYYY-MM-DD HH:MM:SS[.fff]` timestamp as UTC.
#[must_use]
pub fn parse_datetime(value: &str) -> Option<OffsetDateTime> {
    PrimitiveDateTime::parse(value, DATETIME_FORMAT).ok().map(PrimitiveDateTime::assume_utc)
}

/// Parses a duration string such as `1h15m30.5s`.
///
/// Returns `None` for empty input, missing or unknown units, and totals that
/// overflow `i64` nanoseconds.
#[must_use]
pub fn parse_duration(value: &str) -> Option<Duration> {
    let (negative, mut rest) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };
    if rest == "0" {
        return Some(Duration::ZERO);
    }
    if rest.is_empty() {
        return None;
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let (whole, tail) = split_digits(rest);
        let (fraction, tail) = tail.strip_prefix('.').map_or(("", tail), split_digits);
        if whole.is_empty() && fraction.is_empty() {
            return None;
        }
        let unit_end = tail.find(|c: char| c == '.' || c.is_ascii_digit()).unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_end);
        let scale = unit_nanos(unit)?;

        let whole: u128 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
        total = total.checked_add(whole.checked_mul(scale)?)?;
        total = total.checked_add(fraction_nanos(fraction, scale))?;
        rest = tail;
    }

    let nanos = i64::try_from(total).ok()?;
    Some(if negative { Duration::nanoseconds(-nanos) } else { Duration::nanoseconds(nanos) })
}

/// Splits leading ASCII digits from the rest of `value`.
fn split_digits(value: &str) -> (&str, &str) {
    let end = value.find(|c: char| !c.is_ascii_digit()).unwrap_or(value.len());
    value.split_at(end)
}

/// Nanoseconds per unit suffix.
fn unit_nanos(unit: &str) -> Option<u128> {
    let scale = match unit {
        "ns" => 1,
        "us" | "µs" | "μs" => 1_000,
        "ms" => 1_000_000,
        "s" => 1_000_000_000,
        "m" => 60 * 1_000_000_000,
        "h" => 3_600 * 1_000_000_000,
        _ => return None,
    };
    Some(scale)
}

/// Truncated nanoseconds contributed by a fractional component.
fn fraction_nanos(fraction: &str, scale: u128) -> u128 {
    let mut numerator: u128 = 0;
    let mut denominator: u128 = 1;
    for digit in fraction.bytes().take(MAX_FRACTION_DIGITS) {
        numerator = numerator * 10 + u128::from(digit - b'0');
        denominator *= 10;
    }
    numerator * scale / denominator
}

// ============================================================================
// SECTION: Arrays
// ============================================================================

/// Returns true when `value` should be parsed as a JSON array.
fn is_bracketed(value: &str) -> bool {
    value.contains('[') && value.contains(']')
}

/// Returns true when `value` should be split on commas.
fn is_comma_list(value: &str) -> bool {
    value.contains(',') && !value.contains('[')
}

/// Parses a JSON string array or a comma-separated list.
#[must_use]
pub fn parse_string_array(value: &str) -> Option<Vec<String>> {
    if is_bracketed(value) {
        return serde_json::from_str(value).ok();
    }
    if is_comma_list(value) {
        return Some(value.split(',').map(str::to_string).collect());
    }
    None
}

/// Parses a JSON integer array or a comma-separated list of integers.
///
/// Unparsable list elements are skipped; a list with no parsable element
/// yields `None`.
#[must_use]
pub fn parse_int_array(value: &str) -> Option<Vec<i64>> {
    if is_bracketed(value) {
        return serde_json::from_str(value).ok();
    }
    if is_comma_list(value) {
        let parsed: Vec<i64> = value.split(',').filter_map(|item| item.parse().ok()).collect();
        if !parsed.is_empty() {
            return Some(parsed);
        }
    }
    None
}
