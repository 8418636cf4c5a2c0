// src/limiter.rs

// width-independent limiter interface and counter width selection

// dependencies
use crate::clock::{Clock, SystemClock};
use crate::config::LimiterConfig;
use crate::counter::{Counter, CounterWidth};
use crate::errors::LimiterError;
use crate::sliding_window::SlidingWindowLimiter;
use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;
use std::time::Duration;

/// Operations shared by every limiter regardless of its counter width.
pub trait RateLimit<K> {
    /// Reports whether one event for `key` may happen now, recording it if so.
    fn allow(&self, key: K) -> bool {
        self.allow_n(key, 1)
    }

    /// Reserves `n` events for `key` atomically, or none at all.
    fn allow_n(&self, key: K, n: u64) -> bool;

    /// Estimated events for `key` in the trailing window. Never records one.
    ///
    /// Accepts any borrowed form of the key, e.g. `&str` for `String` keys.
    fn window_value<Q>(&self, key: &Q) -> f64
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized;

    fn limit(&self) -> u64;

    fn window(&self) -> Duration;

    fn config(&self) -> LimiterConfig {
        LimiterConfig::new(self.window(), self.limit())
    }
}

impl<K, V, C> RateLimit<K> for SlidingWindowLimiter<K, V, C>
where
    K: Hash + Eq,
    V: Counter,
    C: Clock,
{
    fn allow(&self, key: K) -> bool {
        SlidingWindowLimiter::allow(self, key)
    }

    fn allow_n(&self, key: K, n: u64) -> bool {
        SlidingWindowLimiter::allow_n(self, key, n)
    }

    fn window_value<Q>(&self, key: &Q) -> f64
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        SlidingWindowLimiter::window_value(self, key)
    }

    fn limit(&self) -> u64 {
        SlidingWindowLimiter::limit(self).as_u64()
    }

    fn window(&self) -> Duration {
        SlidingWindowLimiter::window(self)
    }
}

/// A limiter whose counter width was picked from its limit.
///
/// Built by [`AnyLimiter::new_smallest`], [`AnyLimiter::with_config`] or by
/// parsing a `<count>/<duration>` spec string.
#[derive(Debug)]
pub enum AnyLimiter<K, C = SystemClock>
where
    K: Hash + Eq,
    C: Clock,
{
    U8(SlidingWindowLimiter<K, u8, C>),
    U16(SlidingWindowLimiter<K, u16, C>),
    U32(SlidingWindowLimiter<K, u32, C>),
    U64(SlidingWindowLimiter<K, u64, C>),
}

macro_rules! dispatch {
    ($self:expr, $limiter:ident => $body:expr) => {
        match $self {
            AnyLimiter::U8($limiter) => $body,
            AnyLimiter::U16($limiter) => $body,
            AnyLimiter::U32($limiter) => $body,
            AnyLimiter::U64($limiter) => $body,
        }
    };
}

// constructors that use the system clock
impl<K> AnyLimiter<K, SystemClock>
where
    K: Hash + Eq,
{
    /// Create a limiter with the narrowest counter type that can hold `limit`.
    pub fn new_smallest(window: Duration, limit: u64) -> Result<Self, LimiterError> {
        Self::with_config(LimiterConfig::new(window, limit), SystemClock)
    }

    /// Create a limiter from a `<count>/<duration>` spec, e.g. `100/20m`.
    pub fn from_spec(spec: &str) -> Result<Self, LimiterError> {
        Self::with_config(spec.parse()?, SystemClock)
    }
}

impl<K, C> AnyLimiter<K, C>
where
    K: Hash + Eq,
    C: Clock,
{
    /// Create a limiter from a config object, choosing the counter width from its limit.
    pub fn with_config(config: LimiterConfig, clock: C) -> Result<Self, LimiterError> {
        let limiter = match CounterWidth::for_limit(config.limit) {
            CounterWidth::U8 => AnyLimiter::U8(SlidingWindowLimiter::with_config(config, clock)?),
            CounterWidth::U16 => AnyLimiter::U16(SlidingWindowLimiter::with_config(config, clock)?),
            CounterWidth::U32 => AnyLimiter::U32(SlidingWindowLimiter::with_config(config, clock)?),
            CounterWidth::U64 => AnyLimiter::U64(SlidingWindowLimiter::with_config(config, clock)?),
        };
        Ok(limiter)
    }

    /// Create a limiter from a spec string with an explicit clock.
    pub fn from_spec_with_clock(spec: &str, clock: C) -> Result<Self, LimiterError> {
        Self::with_config(spec.parse()?, clock)
    }

    /// Counter width chosen for this limiter.
    pub fn width(&self) -> CounterWidth {
        match self {
            AnyLimiter::U8(_) => CounterWidth::U8,
            AnyLimiter::U16(_) => CounterWidth::U16,
            AnyLimiter::U32(_) => CounterWidth::U32,
            AnyLimiter::U64(_) => CounterWidth::U64,
        }
    }

    /// Number of keys currently held across both windows.
    pub fn tracked_keys(&self) -> usize {
        dispatch!(self, limiter => limiter.tracked_keys())
    }
}

impl<K, C> RateLimit<K> for AnyLimiter<K, C>
where
    K: Hash + Eq,
    C: Clock,
{
    fn allow(&self, key: K) -> bool {
        dispatch!(self, limiter => limiter.allow(key))
    }

    fn allow_n(&self, key: K, n: u64) -> bool {
        dispatch!(self, limiter => limiter.allow_n(key, n))
    }

    fn window_value<Q>(&self, key: &Q) -> f64
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        dispatch!(self, limiter => limiter.window_value(key))
    }

    fn limit(&self) -> u64 {
        dispatch!(self, limiter => limiter.limit().as_u64())
    }

    fn window(&self) -> Duration {
        dispatch!(self, limiter => limiter.window())
    }
}

impl<K> FromStr for AnyLimiter<K, SystemClock>
where
    K: Hash + Eq,
{
    type Err = LimiterError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        Self::from_spec(spec)
    }
}

impl<K, C> fmt::Display for AnyLimiter<K, C>
where
    K: Hash + Eq,
    C: Clock,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        dispatch!(self, limiter => fmt::Display::fmt(limiter, f))
    }
}

/// Unwraps a limiter construction result, panicking on error.
///
/// Meant for limiters built from constants at startup:
///
/// ```rust
/// use slide_limiter::{AnyLimiter, must};
///
/// let limiter: AnyLimiter<String> = must("10/1s".parse());
/// ```
pub fn must<L>(result: Result<L, LimiterError>) -> L {
    match result {
        Ok(limiter) => limiter,
        Err(err) => panic!("invalid rate limiter configuration: {err}"),
    }
}
