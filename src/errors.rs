// src/errors.rs

// error handling for the sliding window limiter

// dependencies
use std::num::ParseIntError;
use thiserror::Error;

use crate::duration::DurationError;

/// Error type for limiter construction issues.
///
/// Only construction can fail. Admission checks never return an error,
/// a denied request is a plain `false`.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum LimiterError {
    /// window is zero, negative or too large to express in nanoseconds
    #[error("invalid window: must be positive")]
    InvalidWindow,

    /// limit is zero
    #[error("invalid limit: must be positive")]
    InvalidLimit,

    /// spec string has no `/` between count and duration
    #[error("bad limiter specification format, expected: <count>/<duration>, error: slash is missing")]
    MissingSeparator,

    /// count segment of a spec string is not an unsigned integer
    #[error("bad limiter specification format, expected: <count>/<duration>, error: {0}")]
    InvalidCount(#[source] ParseIntError),

    /// duration segment of a spec string does not parse
    #[error("bad limiter specification format, expected: <count>/<duration>, error: {0}")]
    InvalidDuration(#[source] DurationError),
}
