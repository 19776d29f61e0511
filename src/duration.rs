//! Duration rendering for reports and duration parsing for the CLI

use std::time::Duration;

use thiserror::Error;

/// Unit character, separator toward the next-smaller unit, and span in
/// milliseconds, largest first
const UNITS: [(&str, &str, u64); 6] = [
    ("w", " ", 7 * 86_400_000),
    ("d", " ", 86_400_000),
    ("h", ":", 3_600_000),
    ("m", " ", 60_000),
    ("s", ":", 1_000),
    ("ms", "", 1),
];

/// Render a duration at millisecond resolution
///
/// Nanoseconds are truncated to whole milliseconds. Leading zero units are
/// omitted and a unit's separator is only emitted when the next-smaller
/// piece is non-zero: `500ms`, `1s:500ms`, `1m 5s`, `2h:30m`, `1h5s` for one
/// hour and five seconds. A zero duration renders as `0s`.
pub fn format_duration(duration: Duration) -> String {
    let mut remainder = duration.as_millis() as u64;
    let mut pieces = [0u64; UNITS.len()];
    for (index, &(_, _, span)) in UNITS.iter().enumerate() {
        pieces[index] = remainder / span;
        remainder %= span;
    }

    let mut out = String::new();
    for (index, &(unit, separator, _)) in UNITS.iter().enumerate() {
        if pieces[index] == 0 {
            continue;
        }
        out.push_str(&pieces[index].to_string());
        out.push_str(unit);
        if index + 1 < UNITS.len() && pieces[index + 1] != 0 {
            out.push_str(separator);
        }
    }
    if out.is_empty() {
        out.push_str("0s");
    }
    out
}

/// Errors from [`parse_duration`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DurationParseError {
    #[error("empty duration string")]
    Empty,
    #[error("invalid duration number in '{0}'")]
    InvalidNumber(String),
    #[error("unknown duration unit '{0}' (expected ms, s, m or h)")]
    UnknownUnit(String),
}

/// Parse a duration string such as `250ms`, `2s`, `1m` or `1h`
///
/// A bare number is taken as milliseconds.
pub fn parse_duration(input: &str) -> Result<Duration, DurationParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(DurationParseError::Empty);
    }

    let split = input
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(input.len());
    let (digits, unit) = input.split_at(split);
    let value: u64 = digits
        .parse()
        .map_err(|_| DurationParseError::InvalidNumber(input.to_string()))?;

    let millis = match unit {
        "" | "ms" => value,
        "s" => value * 1_000,
        "m" => value * 60_000,
        "h" => value * 3_600_000,
        other => return Err(DurationParseError::UnknownUnit(other.to_string())),
    };
    Ok(Duration::from_millis(millis))
}
