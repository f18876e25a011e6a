//! Result cache with TTL (Time-To-Live) support.
//!
//! Entries are keyed by the canonical query key and expire lazily: an entry
//! older than the TTL is never served and is dropped when it is next looked
//! up. Nothing sweeps the map in the background. An optional capacity bounds
//! the number of entries for long-running hosts.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use seismic_core::ResultSet;
use tracing::{debug, trace};

/// Source of monotonic time for cache expiry.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// The real monotonic clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset: Mutex<Duration>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        *lock(&self.offset) += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + *lock(&self.offset)
    }
}

/// One cached result.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// When the entry was stored (monotonic clock).
    pub inserted_at: Instant,
    pub value: ResultSet,
}

impl CacheEntry {
    /// Returns true if the entry is older than `ttl` at `now`.
    pub fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.inserted_at) > ttl
    }
}

/// Process-wide cache of normalized results.
///
/// Shared between fetchers through an `Arc`. The map is guarded by a mutex
/// that is never held across an await point.
pub struct ResultCache {
    ttl: Duration,
    capacity: Option<usize>,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl fmt::Debug for ResultCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultCache")
            .field("ttl", &self.ttl)
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .finish()
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(Self::DEFAULT_TTL_SECS))
    }
}

impl ResultCache {
    pub const DEFAULT_TTL_SECS: u64 = 60;

    /// Creates an unbounded cache using the system clock.
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Creates an unbounded cache driven by `clock`.
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            capacity: None,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Builder method to bound the number of entries.
    ///
    /// A capacity of zero disables caching entirely.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Returns a copy of the cached result for `key` if it is still fresh.
    ///
    /// An expired entry is removed on the way out.
    pub fn get(&self, key: &str) -> Option<ResultSet> {
        let now = self.clock.now();
        let mut entries = lock(&self.entries);

        match entries.get(key) {
            Some(entry) if !entry.is_expired(now, self.ttl) => {
                trace!(key = %key, "Cache hit");
                Some(entry.value.clone())
            }
            Some(_) => {
                entries.remove(key);
                debug!(key = %key, "Dropped expired cache entry");
                None
            }
            None => None,
        }
    }

    /// Stores `value` under `key`, replacing any previous entry.
    pub fn insert(&self, key: impl Into<String>, value: ResultSet) {
        let key = key.into();
        let now = self.clock.now();
        let mut entries = lock(&self.entries);

        if let Some(capacity) = self.capacity {
            if capacity == 0 {
                return;
            }
            if !entries.contains_key(&key) && entries.len() >= capacity {
                make_room(&mut entries, now, self.ttl, capacity);
            }
        }

        entries.insert(
            key.clone(),
            CacheEntry {
                inserted_at: now,
                value,
            },
        );
        debug!(key = %key, "Inserted cache entry");
    }

    /// Removes all expired entries and returns how many were dropped.
    pub fn evict_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = lock(&self.entries);
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now, self.ttl));
        let evicted = before - entries.len();
        if evicted > 0 {
            debug!(evicted, "Evicted expired cache entries");
        }
        evicted
    }

    /// Removes every entry.
    pub fn clear(&self) {
        lock(&self.entries).clear();
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Frees at least one slot: expired entries first, then the oldest ones.
fn make_room(
    entries: &mut HashMap<String, CacheEntry>,
    now: Instant,
    ttl: Duration,
    capacity: usize,
) {
    entries.retain(|_, entry| !entry.is_expired(now, ttl));

    while entries.len() >= capacity {
        let oldest = entries
            .iter()
            .min_by_key(|(_, entry)| entry.inserted_at)
            .map(|(key, _)| key.clone());
        match oldest {
            Some(key) => {
                entries.remove(&key);
                trace!(key = %key, "Evicted oldest cache entry");
            }
            None => break,
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use seismic_core::{Query, ResultMeta};

    fn result(provider: &str) -> ResultSet {
        ResultSet::new(
            provider,
            ResultMeta {
                requested: Query::parse("2024-01-01", "2024-01-31", 4.0, 10, "time")
                    .unwrap()
                    .into(),
                source: "test".to_string(),
                documentation: "https://example.org".to_string(),
            },
            vec![],
            serde_json::Map::new(),
        )
    }

    fn cache(ttl_secs: u64) -> (Arc<ManualClock>, ResultCache) {
        let clock = Arc::new(ManualClock::new());
        let cache = ResultCache::with_clock(Duration::from_secs(ttl_secs), clock.clone());
        (clock, cache)
    }

    #[test]
    fn insert_and_get() {
        let (_, cache) = cache(60);
        cache.insert("k1", result("a"));

        assert_eq!(cache.get("k1").unwrap().provider, "a");
        assert!(cache.get("missing").is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn entry_served_up_to_ttl_inclusive() {
        let (clock, cache) = cache(60);
        cache.insert("k1", result("a"));

        clock.advance(Duration::from_secs(60));
        assert!(cache.get("k1").is_some());

        clock.advance(Duration::from_millis(1));
        assert!(cache.get("k1").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn reinsert_resets_age() {
        let (clock, cache) = cache(60);
        cache.insert("k1", result("a"));
        clock.advance(Duration::from_secs(50));
        cache.insert("k1", result("b"));
        clock.advance(Duration::from_secs(50));

        assert_eq!(cache.get("k1").unwrap().provider, "b");
    }

    #[test]
    fn evict_expired_sweeps() {
        let (clock, cache) = cache(60);
        cache.insert("old", result("a"));
        clock.advance(Duration::from_secs(45));
        cache.insert("new", result("b"));
        clock.advance(Duration::from_secs(30));

        assert_eq!(cache.evict_expired(), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("new").is_some());
    }

    #[test]
    fn capacity_evicts_oldest() {
        let (clock, cache) = cache(60);
        let cache = cache.with_capacity(2);
        cache.insert("k1", result("a"));
        clock.advance(Duration::from_secs(1));
        cache.insert("k2", result("b"));
        clock.advance(Duration::from_secs(1));
        cache.insert("k3", result("c"));

        assert_eq!(cache.len(), 2);
        assert!(cache.get("k1").is_none());
        assert!(cache.get("k2").is_some());
        assert!(cache.get("k3").is_some());
    }

    #[test]
    fn capacity_prefers_expired_entries() {
        let (clock, cache) = cache(10);
        let cache = cache.with_capacity(2);
        cache.insert("stale", result("a"));
        clock.advance(Duration::from_secs(8));
        cache.insert("fresh", result("b"));
        clock.advance(Duration::from_secs(5));
        cache.insert("newest", result("c"));

        assert!(cache.get("fresh").is_some());
        assert!(cache.get("newest").is_some());
        assert!(cache.get("stale").is_none());
    }

    #[test]
    fn zero_capacity_disables_cache() {
        let (_, cache) = cache(60);
        let cache = cache.with_capacity(0);
        cache.insert("k1", result("a"));
        assert!(cache.is_empty());
    }

    #[test]
    fn clear_removes_everything() {
        let (_, cache) = cache(60);
        cache.insert("k1", result("a"));
        cache.insert("k2", result("b"));
        cache.clear();
        assert!(cache.is_empty());
    }
}
