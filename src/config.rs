// src/config.rs

//! Configuration types for the sliding window limiter

// dependencies
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::duration::{DurationError, format_duration, parse_duration};
use crate::errors::LimiterError;

/// Configuration for rate limiter behavior: at most `limit` events per `window`.
///
/// The textual form is `<count>/<duration>`, e.g. `100/1m` or `5/1h30m`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimiterConfig {
    pub(crate) window: Duration,
    pub(crate) limit: u64,
}

impl LimiterConfig {
    /// Create a new configuration with window and limit settings
    pub fn new(window: Duration, limit: u64) -> Self {
        Self { window, limit }
    }

    /// Builder-style: set window duration
    pub fn window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Builder-style: set limit
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    pub fn window_duration(&self) -> Duration {
        self.window
    }

    pub fn max_events(&self) -> u64 {
        self.limit
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), LimiterError> {
        self.validated_window_nanos().map(|_| ())
    }

    // validate, returning the window length in nanoseconds;
    // zero and anything past u64 are rejected
    pub(crate) fn validated_window_nanos(&self) -> Result<u64, LimiterError> {
        let window_nanos = match u64::try_from(self.window.as_nanos()) {
            Ok(0) | Err(_) => return Err(LimiterError::InvalidWindow),
            Ok(nanos) => nanos,
        };
        if self.limit == 0 {
            return Err(LimiterError::InvalidLimit);
        }
        Ok(window_nanos)
    }
}

impl FromStr for LimiterConfig {
    type Err = LimiterError;

    /// Parse `<count>/<duration>`. Only the format is checked here, a zero
    /// count or window is left for [`LimiterConfig::validate`].
    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let (count, duration) = spec
            .split_once('/')
            .ok_or(LimiterError::MissingSeparator)?;

        let limit = count.parse::<u64>().map_err(LimiterError::InvalidCount)?;
        let window = parse_duration(duration).map_err(|err| match err {
            DurationError::Negative(_) => LimiterError::InvalidWindow,
            other => LimiterError::InvalidDuration(other),
        })?;

        Ok(Self::new(window, limit))
    }
}

impl fmt::Display for LimiterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.limit, format_duration(self.window))
    }
}
