// src/sliding_window.rs

// slide-limiter: per-key rate limiting with the sliding window counter algorithm.

// dependencies
use crate::clock::{Clock, SystemClock};
use crate::config::LimiterConfig;
use crate::counter::Counter;
use crate::duration::format_duration;
use crate::errors::LimiterError;
use parking_lot::Mutex;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::mem;
use std::time::Duration;

/// The main sliding window limiter.
///
/// Allows approximately `limit` events per key within any `window`-long
/// interval. Counts are kept for two adjacent, epoch-aligned windows only.
/// The previous window's count is weighted by how much of it still overlaps
/// the trailing interval ending now.
///
/// K is the type used to identify clients (e.g., String, IpAddr, u64).
/// V is the counter type, see [`Counter`].
/// C is the clock type, defaulting to SystemClock.
///
/// A single mutex guards all keys, so the check and the increment for one
/// call can never interleave with another call on the same limiter.
#[derive(Debug)]
pub struct SlidingWindowLimiter<K, V, C = SystemClock>
where
    K: Hash + Eq,
    V: Counter,
    C: Clock,
{
    window: Duration,
    window_nanos: u64,
    limit: V,
    state: Mutex<WindowState<K, V>>,
    clock: C,
}

// window boundaries for one call, computed before the lock is taken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TimePoints {
    now: u64,
    current_start: u64,
    previous_start: Option<u64>,
}

#[derive(Debug)]
struct WindowState<K, V> {
    current: HashMap<K, V>,
    previous: HashMap<K, V>,
    current_start: Option<u64>,
    previous_start: Option<u64>,
}

impl<K, V> WindowState<K, V>
where
    K: Hash + Eq,
    V: Counter,
{
    fn new() -> Self {
        Self {
            current: HashMap::new(),
            previous: HashMap::new(),
            current_start: None,
            previous_start: None,
        }
    }

    // Bring stored windows up to date with `points` and return the time
    // points the estimate must be evaluated at.
    fn rotate(&mut self, points: TimePoints) -> TimePoints {
        match self.current_start {
            Some(start) if start == points.current_start => points,
            Some(start) if start > points.current_start => {
                // clock stepped back: stay on the stored window, full previous weight
                TimePoints {
                    now: start,
                    current_start: start,
                    previous_start: self.previous_start,
                }
            }
            stored => {
                let carried = stored.is_some() && points.previous_start == stored;
                let dropped = self.previous.len() + if carried { 0 } else { self.current.len() };

                let current = mem::take(&mut self.current);
                self.previous = if carried { current } else { HashMap::new() };
                self.current_start = Some(points.current_start);
                self.previous_start = points.previous_start;

                tracing::debug!(
                    window_start = points.current_start,
                    carried_keys = self.previous.len(),
                    dropped_keys = dropped,
                    "rotated sliding window"
                );
                points
            }
        }
    }

    // (weighted previous count, exact current count) for `key`
    fn counts<Q>(&self, key: &Q, points: TimePoints, window_nanos: u64) -> (f64, u64)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let elapsed = points.now.saturating_sub(points.current_start) as f64 / window_nanos as f64;
        let weight = 1.0 - elapsed;
        let previous = self.previous.get(key).map_or(0.0, |count| count.as_f64());
        let current = self.current.get(key).map_or(0, |count| count.as_u64());
        (previous * weight, current)
    }

    fn estimate<Q>(&self, key: &Q, points: TimePoints, window_nanos: u64) -> f64
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (previous, current) = self.counts(key, points, window_nanos);
        previous + current as f64
    }
}

// methods that use the system clock
impl<K, V> SlidingWindowLimiter<K, V, SystemClock>
where
    K: Hash + Eq,
    V: Counter,
{
    /// Create a limiter allowing about `limit` events per `window` for each key.
    pub fn new(window: Duration, limit: V) -> Result<Self, LimiterError> {
        Self::with_clock(window, limit, SystemClock)
    }
}

// methods for the SlidingWindowLimiter type
impl<K, V, C> SlidingWindowLimiter<K, V, C>
where
    K: Hash + Eq,
    V: Counter,
    C: Clock,
{
    /// Create a limiter reading time from `clock`.
    pub fn with_clock(window: Duration, limit: V, clock: C) -> Result<Self, LimiterError> {
        let window_nanos = LimiterConfig::new(window, limit.as_u64()).validated_window_nanos()?;
        Ok(Self::from_parts(window, window_nanos, limit, clock))
    }

    /// Create a limiter from a config object. The config limit must fit in `V`.
    pub fn with_config(config: LimiterConfig, clock: C) -> Result<Self, LimiterError> {
        let window_nanos = config.validated_window_nanos()?;
        if config.limit > V::WIDTH.max_value() {
            return Err(LimiterError::InvalidLimit);
        }
        let limit = V::saturating_from_u64(config.limit);
        Ok(Self::from_parts(config.window, window_nanos, limit, clock))
    }

    fn from_parts(window: Duration, window_nanos: u64, limit: V, clock: C) -> Self {
        Self {
            window,
            window_nanos,
            limit,
            state: Mutex::new(WindowState::new()),
            clock,
        }
    }

    // accessor method to return the limit field
    pub fn limit(&self) -> V {
        self.limit
    }

    // accessor method to return the window field
    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn config(&self) -> LimiterConfig {
        LimiterConfig::new(self.window, self.limit.as_u64())
    }

    /// Reports whether one event for `key` may happen now, and records it if so.
    pub fn allow(&self, key: K) -> bool {
        self.allow_n(key, 1)
    }

    /// Reserves `n` events for `key` at once.
    ///
    /// Either all `n` are recorded or nothing is. `n == 0` only checks that
    /// the key is not already over its limit.
    pub fn allow_n(&self, key: K, n: u64) -> bool {
        let points = self.time_points();

        let mut state = self.state.lock();
        let points = state.rotate(points);
        let (previous, current) = state.counts(&key, points, self.window_nanos);
        let limit = self.limit.as_u64();

        // the current count is exact, only the decayed previous share is fractional
        let total = match current.checked_add(n) {
            Some(total) if total <= limit && previous <= (limit - total) as f64 => total,
            _ => {
                tracing::trace!(
                    previous,
                    current,
                    requested = n,
                    limit,
                    "rate limit exceeded"
                );
                return false;
            }
        };

        if n > 0 {
            // total <= limit, so it fits in V
            state.current.insert(key, V::saturating_from_u64(total));
        }
        true
    }

    /// Estimated number of events for `key` in the trailing window ending now.
    ///
    /// Never records an event. Stale windows are still rotated out so the
    /// value matches what [`allow`](Self::allow) would see.
    pub fn window_value<Q>(&self, key: &Q) -> f64
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let points = self.time_points();

        let mut state = self.state.lock();
        let points = state.rotate(points);
        state.estimate(key, points, self.window_nanos)
    }

    /// Number of keys currently held across both windows.
    pub fn tracked_keys(&self) -> usize {
        let points = self.time_points();

        let mut state = self.state.lock();
        state.rotate(points);
        let previous_only = state
            .previous
            .keys()
            .filter(|key| !state.current.contains_key(*key))
            .count();
        state.current.len() + previous_only
    }

    fn time_points(&self) -> TimePoints {
        let now = self.clock.now();
        let current_start = now - now % self.window_nanos;
        TimePoints {
            now,
            current_start,
            previous_start: current_start.checked_sub(self.window_nanos),
        }
    }
}

impl<K, V, C> fmt::Display for SlidingWindowLimiter<K, V, C>
where
    K: Hash + Eq,
    V: Counter,
    C: Clock,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.limit, format_duration(self.window))
    }
}
