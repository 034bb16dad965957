//! Cue Timestamps
//!
//! A [`TimeCode`] is a non-negative count of milliseconds. Its canonical
//! text form is `HH:MM:SS.mmm` with unbounded hours; the short
//! `MM:SS.mmm` form is accepted on input and normalized on output.
//!
//! Two parsers exist:
//! - [`TimeCode::parse`] is fail-soft and yields zero for anything it
//!   cannot read. Table edits and the decoder go through it.
//! - `str::parse::<TimeCode>()` is strict and reports the bad input.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{CoreError, TimeSec};

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;

/// Cue timestamp in whole milliseconds
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TimeCode(u64);

impl TimeCode {
    pub const ZERO: TimeCode = TimeCode(0);

    pub const fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    /// Converts playback seconds, truncating the sub-millisecond remainder.
    ///
    /// Negative and non-finite values map to zero.
    pub fn from_secs_f64(secs: TimeSec) -> Self {
        if !secs.is_finite() || secs <= 0.0 {
            return Self::ZERO;
        }
        // Absorb binary representation error (1.001 * 1000 = 1000.999...).
        Self((secs * MS_PER_SECOND as f64 + 1e-6).floor() as u64)
    }

    pub const fn as_millis(self) -> u64 {
        self.0
    }

    pub fn as_secs_f64(self) -> TimeSec {
        self.0 as f64 / MS_PER_SECOND as f64
    }

    pub fn saturating_add(self, other: TimeCode) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(self, other: TimeCode) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Fail-soft parse: unreadable text yields [`TimeCode::ZERO`].
    pub fn parse(text: &str) -> Self {
        parse_components(text).map(Self).unwrap_or_default()
    }

    /// Canonical `HH:MM:SS.mmm` form
    pub fn format(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TimeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ms = self.0;
        write!(
            f,
            "{:02}:{:02}:{:02}.{:03}",
            ms / MS_PER_HOUR,
            (ms / MS_PER_MINUTE) % 60,
            (ms / MS_PER_SECOND) % 60,
            ms % MS_PER_SECOND
        )
    }
}

impl FromStr for TimeCode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_components(s)
            .map(Self)
            .ok_or_else(|| CoreError::InvalidTimeCode(s.to_string()))
    }
}

/// Splits `HH:MM:SS.mmm` / `MM:SS.mmm` into milliseconds.
fn parse_components(text: &str) -> Option<u64> {
    let parts: Vec<&str> = text.trim().split(':').collect();
    let (hours, minutes, seconds) = match parts.as_slice() {
        [h, m, s] => (parse_digits(h)?, parse_digits(m)?, *s),
        [m, s] => (0, parse_digits(m)?, *s),
        _ => return None,
    };

    let (whole, fraction) = match seconds.split_once('.') {
        Some((whole, fraction)) => (parse_digits(whole)?, parse_fraction_ms(fraction)?),
        None => (parse_digits(seconds)?, 0),
    };

    hours
        .checked_mul(MS_PER_HOUR)?
        .checked_add(minutes.checked_mul(MS_PER_MINUTE)?)?
        .checked_add(whole.checked_mul(MS_PER_SECOND)?)?
        .checked_add(fraction)
}

fn parse_digits(segment: &str) -> Option<u64> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

/// Reads up to three fraction digits as milliseconds; extra digits are truncated.
fn parse_fraction_ms(fraction: &str) -> Option<u64> {
    if fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let mut ms = 0;
    let mut digits = fraction.bytes();
    for _ in 0..3 {
        let digit = digits.next().map(|b| u64::from(b - b'0')).unwrap_or(0);
        ms = ms * 10 + digit;
    }
    Some(ms)
}

/// Signed `end - start` in seconds with three decimals (e.g. `"2.500"`, `"-0.500"`).
///
/// A negative result marks an invalid cue; callers validate, this never corrects.
pub fn format_duration(start: TimeCode, end: TimeCode) -> String {
    let diff = i128::from(end.0) - i128::from(start.0);
    let sign = if diff < 0 { "-" } else { "" };
    let abs = diff.unsigned_abs();
    format!("{sign}{}.{:03}", abs / 1_000, abs % 1_000)
}

/// Duration between two timestamp texts, both parsed fail-soft.
pub fn duration_text(start: &str, end: &str) -> String {
    format_duration(TimeCode::parse(start), TimeCode::parse(end))
}
