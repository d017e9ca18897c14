//! Short-lived read cache for record queries
//!
//! Entries are keyed by the BLAKE3 fingerprint of the read query and expire
//! after a fixed TTL. Writers must call [`RecordCache::invalidate_all`]
//! synchronously after every successful write so that a read following a
//! write never observes stale records.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Statistics for cache performance tracking
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub invalidations: usize,
    pub writes: usize,
}

impl CacheStats {
    /// Calculate cache hit ratio
    #[must_use]
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// BLAKE3 hex fingerprint of a read query.
#[must_use]
pub fn fingerprint(query: &str) -> String {
    blake3::hash(query.as_bytes()).to_hex().to_string()
}

#[derive(Debug, Clone)]
struct CachedEntry<V> {
    value: V,
    cached_at: Instant,
}

/// TTL cache keyed by query fingerprint.
///
/// A TTL of zero disables caching: every lookup misses and inserts are
/// dropped.
#[derive(Debug)]
pub struct RecordCache<V> {
    ttl: Duration,
    entries: HashMap<String, CachedEntry<V>>,
    stats: CacheStats,
}

impl<V: Clone> RecordCache<V> {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
            stats: CacheStats::default(),
        }
    }

    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    #[must_use]
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    /// Look up a fresh entry for `query`.
    pub fn get(&mut self, query: &str) -> Option<V> {
        self.get_at(query, Instant::now())
    }

    /// Look up a fresh entry for `query` as seen at `now`.
    pub fn get_at(&mut self, query: &str, now: Instant) -> Option<V> {
        let key = fingerprint(query);
        let fresh = self
            .entries
            .get(&key)
            .filter(|entry| now.saturating_duration_since(entry.cached_at) < self.ttl)
            .map(|entry| entry.value.clone());

        match fresh {
            Some(value) => {
                self.stats.hits += 1;
                Some(value)
            }
            None => {
                // Expired entries are dropped on access.
                self.entries.remove(&key);
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Store `value` for `query`.
    pub fn insert(&mut self, query: &str, value: V) {
        self.insert_at(query, value, Instant::now());
    }

    pub fn insert_at(&mut self, query: &str, value: V, now: Instant) {
        if !self.is_enabled() {
            return;
        }
        self.entries.insert(
            fingerprint(query),
            CachedEntry {
                value,
                cached_at: now,
            },
        );
        self.stats.writes += 1;
    }

    /// Return the cached value for `query`, or compute, store and return it.
    pub fn get_or_try_insert_with<E, F>(&mut self, query: &str, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(value) = self.get(query) {
            return Ok(value);
        }
        let value = fetch()?;
        self.insert(query, value.clone());
        Ok(value)
    }

    /// Drop every entry. Called after each write.
    pub fn invalidate_all(&mut self) {
        if !self.entries.is_empty() {
            self.stats.invalidations += 1;
        }
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_stable_and_distinct() {
        assert_eq!(fingerprint("records:all"), fingerprint("records:all"));
        assert_ne!(fingerprint("records:all"), fingerprint("records:project:Acme"));
        assert_eq!(fingerprint("records:all").len(), 64);
    }

    #[test]
    fn test_hit_then_expiry() {
        let mut cache = RecordCache::new(Duration::from_secs(60));
        let start = Instant::now();
        cache.insert_at("records:all", vec![1, 2, 3], start);

        assert_eq!(
            cache.get_at("records:all", start + Duration::from_secs(59)),
            Some(vec![1, 2, 3])
        );
        assert_eq!(cache.get_at("records:all", start + Duration::from_secs(60)), None);
        assert!(cache.is_empty());

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.writes, 1);
    }

    #[test]
    fn test_invalidate_all_clears_entries() {
        let mut cache = RecordCache::new(Duration::from_secs(60));
        cache.insert("records:all", 1);
        cache.insert("records:project:Acme", 2);
        assert_eq!(cache.len(), 2);

        cache.invalidate_all();
        assert!(cache.is_empty());
        assert_eq!(cache.get("records:all"), None);
        assert_eq!(cache.stats().invalidations, 1);

        // Invalidating an empty cache is not counted.
        cache.invalidate_all();
        assert_eq!(cache.stats().invalidations, 1);
    }

    #[test]
    fn test_zero_ttl_disables_cache() {
        let mut cache = RecordCache::new(Duration::ZERO);
        assert!(!cache.is_enabled());
        cache.insert("records:all", 1);
        assert!(cache.is_empty());
        assert_eq!(cache.get("records:all"), None);
    }

    #[test]
    fn test_get_or_try_insert_with_fetches_once() {
        let mut cache = RecordCache::new(Duration::from_secs(60));
        let mut calls = 0;
        for _ in 0..3 {
            let value: Result<u32, ()> = cache.get_or_try_insert_with("q", || {
                calls += 1;
                Ok(7)
            });
            assert_eq!(value, Ok(7));
        }
        assert_eq!(calls, 1);
        assert_eq!(cache.stats().hits, 2);
    }

    #[test]
    fn test_get_or_try_insert_with_propagates_errors() {
        let mut cache: RecordCache<u32> = RecordCache::new(Duration::from_secs(60));
        let result: Result<u32, &str> = cache.get_or_try_insert_with("q", || Err("down"));
        assert_eq!(result, Err("down"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_hit_ratio() {
        let stats = CacheStats {
            hits: 3,
            misses: 1,
            invalidations: 0,
            writes: 1,
        };
        assert!((stats.hit_ratio() - 0.75).abs() < f64::EPSILON);
        assert_eq!(CacheStats::default().hit_ratio(), 0.0);
    }
}
