// src/zones.rs

// named rate limit zones, e.g. "logins" or "api-requests"

// dependencies
use crate::clock::{Clock, SystemClock};
use crate::config::LimiterConfig;
use crate::errors::LimiterError;
use crate::limiter::{AnyLimiter, RateLimit};
use dashmap::DashMap;
use std::hash::Hash;
use std::sync::Arc;

/// A set of independent limiters looked up by zone name.
///
/// Each zone has its own window, limit and counters. Zones can be added,
/// replaced and removed while other threads are checking requests.
/// We use `DashMap` so lookups for different zones do not contend.
#[derive(Debug)]
pub struct LimiterZones<K, C = SystemClock>
where
    K: Hash + Eq,
    C: Clock + Clone,
{
    zones: DashMap<String, Arc<AnyLimiter<K, C>>>,
    clock: C,
}

impl<K> LimiterZones<K, SystemClock>
where
    K: Hash + Eq,
{
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    /// Build zones from `(name, "<count>/<duration>")` pairs.
    ///
    /// Stops at the first spec that fails to parse or validate.
    pub fn from_specs<'a, I>(specs: I) -> Result<Self, LimiterError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let zones = Self::new();
        for (name, spec) in specs {
            zones.configure_spec(name, spec)?;
        }
        Ok(zones)
    }
}

impl<K> Default for LimiterZones<K, SystemClock>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, C> LimiterZones<K, C>
where
    K: Hash + Eq,
    C: Clock + Clone,
{
    /// Create an empty set whose limiters all read time from `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self {
            zones: DashMap::new(),
            clock,
        }
    }

    /// Add a zone, replacing any zone with the same name.
    ///
    /// A replaced zone starts over with empty counters.
    pub fn configure(
        &self,
        name: impl Into<String>,
        config: LimiterConfig,
    ) -> Result<Arc<AnyLimiter<K, C>>, LimiterError> {
        let name = name.into();
        let limiter = Arc::new(AnyLimiter::with_config(config, self.clock.clone())?);
        tracing::info!(
            zone = %name,
            limit = %limiter,
            width = %limiter.width(),
            "configured rate limit zone"
        );
        self.zones.insert(name, Arc::clone(&limiter));
        Ok(limiter)
    }

    /// Add a zone from a `<count>/<duration>` spec string.
    pub fn configure_spec(
        &self,
        name: impl Into<String>,
        spec: &str,
    ) -> Result<Arc<AnyLimiter<K, C>>, LimiterError> {
        self.configure(name, spec.parse()?)
    }

    pub fn get(&self, name: &str) -> Option<Arc<AnyLimiter<K, C>>> {
        self.zones.get(name).map(|entry| Arc::clone(entry.value()))
    }

    pub fn remove(&self, name: &str) -> bool {
        let removed = self.zones.remove(name).is_some();
        if removed {
            tracing::debug!(zone = %name, "removed rate limit zone");
        }
        removed
    }

    /// Check one event for `key` in `zone`. `None` if the zone does not exist.
    pub fn allow(&self, zone: &str, key: K) -> Option<bool> {
        self.allow_n(zone, key, 1)
    }

    /// Reserve `n` events for `key` in `zone`. `None` if the zone does not exist.
    pub fn allow_n(&self, zone: &str, key: K, n: u64) -> Option<bool> {
        // clone the Arc so the shard lock is not held during the check
        let limiter = self.get(zone)?;
        Some(limiter.allow_n(key, n))
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Zone names in no particular order.
    pub fn names(&self) -> Vec<String> {
        self.zones.iter().map(|entry| entry.key().clone()).collect()
    }
}
