// src/lib.rs

//! # Slide Limiter
//!
//! A per-key rate limiter based on the sliding window counter algorithm.
//!
//! Each key gets about `limit` events per `window`. Only two counters per key
//! are kept, one for the current epoch-aligned window and one for the window
//! before it; the previous count is weighted by how much of it still overlaps
//! the trailing `window` ending now.
//!
//! ## Quick Example
//!
//! ```rust
//! use slide_limiter::{AnyLimiter, RateLimit};
//!
//! let limiter: AnyLimiter<&str> = "5/1m".parse().unwrap();
//!
//! for _ in 0..5 {
//!     assert!(limiter.allow("user1"));
//! }
//! assert!(!limiter.allow("user1"));
//! assert!(limiter.allow("user2"));
//! ```

// private modules
mod clock;
mod config;
mod counter;
mod duration;
mod errors;
mod limiter;
mod sliding_window;
mod zones;

// public API exports
pub use clock::{Clock, SystemClock};
pub use config::LimiterConfig;
pub use counter::{Counter, CounterWidth, U8_MAX, U16_MAX, U32_MAX};
pub use duration::{DurationError, format_duration, parse_duration};
pub use errors::LimiterError;
pub use limiter::{AnyLimiter, RateLimit, must};
pub use sliding_window::SlidingWindowLimiter;
pub use zones::LimiterZones;
