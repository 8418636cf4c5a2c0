// src/duration.rs

//! Human-readable durations: `1m`, `1h30m`, `500ms`, `1.5s`.
//!
//! The grammar is a sequence of decimal numbers, each with an optional
//! fraction and a mandatory unit suffix (`ns`, `us`/`µs`, `ms`, `s`, `m`, `h`).
//! A lone `0` needs no unit. Formatting produces the canonical form that
//! parses back to the same value, e.g. `1m0s` or `1h30m0s`.

// dependencies
use std::time::Duration;
use thiserror::Error;

const NANOSECOND: u64 = 1;
const MICROSECOND: u64 = 1_000 * NANOSECOND;
const MILLISECOND: u64 = 1_000 * MICROSECOND;
const SECOND: u64 = 1_000 * MILLISECOND;
const MINUTE: u64 = 60 * SECOND;
const HOUR: u64 = 60 * MINUTE;

// fraction digits beyond this cannot change the nanosecond result
const MAX_FRACTION_DIGITS: usize = 18;

/// Error returned when a duration string does not parse.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    #[error("empty duration")]
    Empty,
    #[error("invalid duration {0:?}")]
    Invalid(String),
    #[error("missing unit in duration {0:?}")]
    MissingUnit(String),
    #[error("unknown unit {unit:?} in duration {input:?}")]
    UnknownUnit { unit: String, input: String },
    #[error("duration {0:?} is out of range")]
    Overflow(String),
    #[error("duration {0:?} is negative")]
    Negative(String),
}

fn unit_nanos(unit: &str) -> Option<u64> {
    match unit {
        "ns" => Some(NANOSECOND),
        "us" | "µs" | "μs" => Some(MICROSECOND),
        "ms" => Some(MILLISECOND),
        "s" => Some(SECOND),
        "m" => Some(MINUTE),
        "h" => Some(HOUR),
        _ => None,
    }
}

/// Parse a duration such as `1h30m` or `250ms`.
///
/// A leading `+` is accepted. A leading `-` is only accepted for a zero
/// duration; anything else is reported as [`DurationError::Negative`].
pub fn parse_duration(input: &str) -> Result<Duration, DurationError> {
    let invalid = || DurationError::Invalid(input.to_string());
    let overflow = || DurationError::Overflow(input.to_string());

    let mut rest = input;
    let negative = match rest.as_bytes().first() {
        None => return Err(DurationError::Empty),
        Some(b'-') => {
            rest = &rest[1..];
            true
        }
        Some(b'+') => {
            rest = &rest[1..];
            false
        }
        Some(_) => false,
    };

    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total: u64 = 0;
    while !rest.is_empty() {
        let int_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        let (int_digits, tail) = rest.split_at(int_len);
        rest = tail;

        let mut frac_digits = "";
        if let Some(tail) = rest.strip_prefix('.') {
            let frac_len = tail.bytes().take_while(u8::is_ascii_digit).count();
            (frac_digits, rest) = tail.split_at(frac_len);
        }
        if int_digits.is_empty() && frac_digits.is_empty() {
            return Err(invalid());
        }

        let unit_len = rest
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(rest.len());
        if unit_len == 0 {
            return Err(DurationError::MissingUnit(input.to_string()));
        }
        let (unit, tail) = rest.split_at(unit_len);
        rest = tail;
        let scale = unit_nanos(unit).ok_or_else(|| DurationError::UnknownUnit {
            unit: unit.to_string(),
            input: input.to_string(),
        })?;

        // digits only, so parse can only fail on overflow
        let whole: u64 = if int_digits.is_empty() {
            0
        } else {
            int_digits.parse().map_err(|_| overflow())?
        };
        let term = whole
            .checked_mul(scale)
            .and_then(|nanos| nanos.checked_add(fraction_nanos(frac_digits, scale)))
            .ok_or_else(overflow)?;
        total = total.checked_add(term).ok_or_else(overflow)?;
    }

    if negative && total > 0 {
        return Err(DurationError::Negative(input.to_string()));
    }
    Ok(Duration::from_nanos(total))
}

// value of `0.<digits>` units, truncated to whole nanoseconds
fn fraction_nanos(digits: &str, scale: u64) -> u64 {
    let digits = &digits[..digits.len().min(MAX_FRACTION_DIGITS)];
    if digits.is_empty() {
        return 0;
    }
    let numerator: u128 = digits.parse().unwrap_or(0);
    let denominator = 10u128.pow(digits.len() as u32);
    (numerator * scale as u128 / denominator) as u64
}

/// Format a duration in canonical form: `0s`, `750ns`, `1.5µs`, `500ms`,
/// `1.5s`, `1m0s`, `1h30m0s`.
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }

    if nanos < SECOND as u128 {
        return if nanos < MICROSECOND as u128 {
            format!("{nanos}ns")
        } else if nanos < MILLISECOND as u128 {
            format!("{}µs", decimal(nanos, MICROSECOND))
        } else {
            format!("{}ms", decimal(nanos, MILLISECOND))
        };
    }

    let total_secs = nanos / SECOND as u128;
    let subsec = nanos % SECOND as u128;
    let hours = total_secs / 3600;
    let minutes = (total_secs / 60) % 60;
    let seconds = total_secs % 60;

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }
    if hours > 0 || minutes > 0 {
        out.push_str(&format!("{minutes}m"));
    }
    out.push_str(&decimal(seconds * SECOND as u128 + subsec, SECOND));
    out.push('s');
    out
}

// `value / scale` with the fraction written out and trailing zeros trimmed
fn decimal(value: u128, scale: u64) -> String {
    let scale = scale as u128;
    let whole = value / scale;
    let frac = value % scale;
    if frac == 0 {
        return whole.to_string();
    }
    let width = scale.ilog10() as usize;
    let digits = format!("{frac:0width$}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}
