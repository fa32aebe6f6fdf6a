//! Conversion between seconds and `HH:MM:SS.ffffff` timestamps.
//!
//! Clip records store their positions as timestamp strings, while every
//! computation (durations, seeks, ordering) works on seconds.

use crate::{Error, Result};

const MICROS_PER_SECOND: u64 = 1_000_000;
const MICROS_PER_MINUTE: u64 = 60 * MICROS_PER_SECOND;
const MICROS_PER_HOUR: u64 = 60 * MICROS_PER_MINUTE;

/// Format seconds as a zero-padded `HH:MM:SS.ffffff` timestamp.
///
/// The value is rounded to whole microseconds before it is split into
/// fields, so the seconds field is always below 60.
///
/// # Examples
///
/// ```
/// use quietcut_common::timestamp::seconds_to_timestamp;
///
/// assert_eq!(seconds_to_timestamp(0.0), "00:00:00.000000");
/// assert_eq!(seconds_to_timestamp(3723.5), "01:02:03.500000");
/// ```
pub fn seconds_to_timestamp(seconds: f64) -> String {
    let total = (seconds * MICROS_PER_SECOND as f64).round() as u64;

    let hours = total / MICROS_PER_HOUR;
    let minutes = (total % MICROS_PER_HOUR) / MICROS_PER_MINUTE;
    let micros = total % MICROS_PER_MINUTE;

    format!(
        "{:02}:{:02}:{:02}.{:06}",
        hours,
        minutes,
        micros / MICROS_PER_SECOND,
        micros % MICROS_PER_SECOND
    )
}

/// Parse an `HH:MM:SS[.ffffff]` timestamp into seconds.
///
/// Exactly three colon-separated components are required. Hours and
/// minutes are plain digits; seconds are digits with an optional `.fraction`.
/// Signs, exponents and `inf`/`nan` are rejected.
///
/// # Errors
///
/// Returns [`Error::Format`] on a wrong component count or a component that
/// is not a non-negative number.
///
/// # Examples
///
/// ```
/// use quietcut_common::timestamp::timestamp_to_seconds;
///
/// assert_eq!(timestamp_to_seconds("01:02:03.5").unwrap(), 3723.5);
/// assert_eq!(timestamp_to_seconds("0:05:00").unwrap(), 300.0);
/// assert!(timestamp_to_seconds("05:00").is_err());
/// ```
pub fn timestamp_to_seconds(s: &str) -> Result<f64> {
    let parts: Vec<&str> = s.trim().split(':').collect();
    if parts.len() != 3 {
        return Err(Error::format(
            s,
            format!("expected 3 components, got {}", parts.len()),
        ));
    }

    let hours = parse_component(s, "hours", parts[0], false)?;
    let minutes = parse_component(s, "minutes", parts[1], false)?;
    let seconds = parse_component(s, "seconds", parts[2], true)?;

    Ok(hours * 3600.0 + minutes * 60.0 + seconds)
}

fn parse_component(original: &str, name: &str, value: &str, fraction: bool) -> Result<f64> {
    let value = value.trim();
    let (whole, frac) = match value.split_once('.') {
        Some((whole, frac)) if fraction => (whole, Some(frac)),
        _ => (value, None),
    };

    let is_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    if !is_digits(whole) || !frac.map_or(true, is_digits) {
        return Err(Error::format(
            original,
            format!("{name} is not numeric: {value:?}"),
        ));
    }

    value
        .parse()
        .map_err(|_| Error::format(original, format!("{name} is not numeric: {value:?}")))
}
