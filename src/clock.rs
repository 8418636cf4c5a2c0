// src/clock.rs

// clock module definition and implementations

// dependencies
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Clock trait to abstract time retrieval.
/// Implementors must be thread-safe (Send + Sync).
/// The `now` method returns the current time in nanoseconds since the Unix epoch.
/// Window boundaries are aligned to multiples of the window duration since the epoch,
/// so the value has to be wall-clock based rather than an arbitrary monotonic origin.
pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

/// SystemClock implementation using the system time.
/// Returns the current time in nanoseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        // a clock set before 1970 reads as the epoch itself
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(nanos_since_epoch)
            .unwrap_or_default()
    }
}

// clamps instead of wrapping once the count no longer fits in u64 (year 2554)
fn nanos_since_epoch(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX)
}
