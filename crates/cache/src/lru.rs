//! Icon cache with LRU eviction
//!
//! Provides in-memory caching of resolved icon payloads with automatic
//! eviction of the least recently used entry when the capacity limit is
//! reached. Frequently viewed icons are touched on every hit, so they are
//! the last to be evicted when a long scroll pushes new icons in.

use crate::key::{IconKey, IconPayload};
use log::debug;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Default maximum number of cached icons.
///
/// Sized for a launcher grid: large enough that a couple of screenfuls of
/// icons stay resident, small enough that the encoded payloads never grow
/// into a memory problem.
pub const DEFAULT_CACHE_CAPACITY: usize = 300;

/// Statistics about cache usage
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    /// Number of icons currently in the cache
    pub entry_count: usize,

    /// Maximum number of icons allowed
    pub capacity: usize,

    /// Number of cache hits
    pub hits: u64,

    /// Number of cache misses
    pub misses: u64,

    /// Number of icons evicted due to capacity pressure
    pub evictions: u64,
}

impl CacheStats {
    /// Calculate the cache hit rate (0.0 to 1.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Internal cache state
struct CacheState {
    /// Map from key to resolved payload
    entries: HashMap<IconKey, IconPayload>,

    /// LRU order (most recently used at back, least recently used at front)
    order: VecDeque<IconKey>,

    /// Maximum number of entries
    capacity: usize,

    /// Statistics
    stats: CacheStats,
}

impl CacheState {
    fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity,
            stats: CacheStats {
                capacity,
                ..Default::default()
            },
        }
    }

    /// Move a key to the back of the order queue (mark as most recently used)
    fn touch(&mut self, key: &IconKey) {
        self.order.retain(|k| k != key);
        self.order.push_back(key.clone());
    }

    /// Evict the least recently used entry
    fn evict_lru(&mut self) {
        if let Some(key) = self.order.pop_front() {
            if self.entries.remove(&key).is_some() {
                self.stats.evictions += 1;
                debug!("evicted icon cache entry for {key}");
            }
        }
    }
}

/// Bounded icon cache with LRU eviction
///
/// Maps launcher item keys to resolved icon payloads. The cache never holds
/// more than `capacity` entries: inserting past the limit evicts the single
/// least recently used entry. Hits refresh an entry's position, so icons the
/// user keeps scrolling past stay resident.
///
/// Each `get` and `put` is one atomic critical section, so the cache can be
/// shared freely between the scheduler and UI bindings.
///
/// # Example
///
/// ```
/// use launcher_icon_cache::{IconCache, IconKey};
///
/// let cache = IconCache::new(300);
///
/// let key = IconKey::path("/Applications/Safari.app");
/// cache.put(key.clone(), "data:image/png;base64,...".to_string());
///
/// if let Some(payload) = cache.get(&key) {
///     println!("cache hit: {} bytes", payload.len());
/// }
/// ```
pub struct IconCache {
    state: Mutex<CacheState>,
}

impl IconCache {
    /// Create a new icon cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(CacheState::new(capacity)),
        }
    }

    /// Look up the icon for `key`.
    ///
    /// A hit moves the entry to the most-recently-used position and returns a
    /// clone of the payload. Updates hit/miss statistics.
    pub fn get(&self, key: &IconKey) -> Option<IconPayload> {
        let mut state = self.state.lock().unwrap();

        if let Some(payload) = state.entries.get(key).cloned() {
            state.touch(key);
            state.stats.hits += 1;
            Some(payload)
        } else {
            state.stats.misses += 1;
            None
        }
    }

    /// Store the icon for `key`.
    ///
    /// The entry is inserted at the most-recently-used position; if the key
    /// was already present its prior position is discarded first, so there is
    /// never a duplicate. If the insert pushes the cache over capacity the
    /// single least recently used entry is evicted.
    ///
    /// Empty payloads mean "no icon" and are rejected: a later request for
    /// the same key should retry the backend rather than remember the miss.
    pub fn put(&self, key: IconKey, payload: IconPayload) {
        if payload.is_empty() {
            return;
        }

        let mut state = self.state.lock().unwrap();

        if state.entries.remove(&key).is_some() {
            state.order.retain(|k| k != &key);
        }

        state.entries.insert(key.clone(), payload);
        state.touch(&key);

        // Capacity can only ever be exceeded by one, so a single eviction
        // restores the invariant.
        if state.entries.len() > state.capacity {
            state.evict_lru();
        }

        state.stats.entry_count = state.entries.len();
    }

    /// Check whether `key` is cached, without refreshing its position.
    pub fn contains(&self, key: &IconKey) -> bool {
        let state = self.state.lock().unwrap();
        state.entries.contains_key(key)
    }

    /// Number of icons currently cached.
    pub fn len(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.entries.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        let state = self.state.lock().unwrap();
        state.entries.is_empty()
    }

    /// Maximum number of entries the cache will hold.
    pub fn capacity(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.capacity
    }

    /// Remove all entries.
    ///
    /// For wholesale invalidation: an application catalog rescan can change
    /// any item's icon, so the owner drops every cached payload and lets
    /// subsequent requests re-fetch. Occupancy is zeroed; the hit, miss, and
    /// eviction counters are cumulative since construction and survive.
    pub fn clear(&self) {
        let mut state = self.state.lock().unwrap();
        state.entries.clear();
        state.order.clear();
        state.stats.entry_count = 0;
    }

    /// Get current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut state = self.state.lock().unwrap();
        state.stats.entry_count = state.entries.len();
        state.stats
    }
}

impl Default for IconCache {
    /// Create a cache with the default 300-entry capacity.
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str) -> IconKey {
        IconKey::path(format!("/Applications/{name}.app"))
    }

    #[test]
    fn test_get_miss() {
        let cache = IconCache::new(10);
        assert!(cache.get(&key("Safari")).is_none());

        let stats = cache.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 0);
    }

    #[test]
    fn test_put_then_get() {
        let cache = IconCache::new(10);
        cache.put(key("Safari"), "data:imgS".to_string());

        assert_eq!(cache.get(&key("Safari")), Some("data:imgS".to_string()));
        assert_eq!(cache.len(), 1);

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
    }

    #[test]
    fn test_put_overwrites_without_duplicate() {
        let cache = IconCache::new(10);
        cache.put(key("Safari"), "data:v1".to_string());
        cache.put(key("Safari"), "data:v2".to_string());

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&key("Safari")), Some("data:v2".to_string()));
    }

    #[test]
    fn test_capacity_never_exceeded() {
        let cache = IconCache::new(300);
        for i in 0..301 {
            cache.put(key(&format!("App{i}")), format!("data:img{i}"));
            assert!(cache.len() <= 300);
        }

        // The 301st distinct key evicted the least recently touched one.
        assert!(!cache.contains(&key("App0")));
        assert!(cache.contains(&key("App300")));
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_lru_touch_protects_entry() {
        let cache = IconCache::new(2);
        cache.put(key("A"), "data:a".to_string());
        cache.put(key("B"), "data:b".to_string());

        // Reading A makes B the least recently used.
        assert!(cache.get(&key("A")).is_some());

        cache.put(key("C"), "data:c".to_string());

        assert!(cache.contains(&key("A")));
        assert!(!cache.contains(&key("B")));
        assert!(cache.contains(&key("C")));
    }

    #[test]
    fn test_eviction_order_follows_insertion_without_touches() {
        let cache = IconCache::new(2);
        cache.put(key("A"), "data:a".to_string());
        cache.put(key("B"), "data:b".to_string());
        cache.put(key("C"), "data:c".to_string());

        assert!(!cache.contains(&key("A")));
        assert!(cache.contains(&key("B")));
        assert!(cache.contains(&key("C")));
    }

    #[test]
    fn test_empty_payload_rejected() {
        let cache = IconCache::new(10);
        cache.put(key("Safari"), String::new());

        assert!(cache.is_empty());
        assert!(cache.get(&key("Safari")).is_none());
    }

    #[test]
    fn test_clear_drops_entries_but_keeps_counters() {
        let cache = IconCache::new(10);
        cache.put(key("A"), "data:a".to_string());
        cache.put(key("B"), "data:b".to_string());
        assert!(cache.get(&key("A")).is_some());
        assert_eq!(cache.len(), 2);

        cache.clear();

        assert!(cache.is_empty());
        let stats = cache.stats();
        assert_eq!(stats.entry_count, 0);
        assert_eq!(stats.hits, 1);

        // Cleared icons are re-fetchable, not remembered as absent.
        assert!(cache.get(&key("A")).is_none());
    }

    #[test]
    fn test_stats_hit_rate() {
        let cache = IconCache::new(10);
        assert_eq!(cache.stats().hit_rate(), 0.0);

        cache.put(key("A"), "data:a".to_string());
        cache.get(&key("A"));
        cache.get(&key("B"));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_default_capacity() {
        let cache = IconCache::default();
        assert_eq!(cache.capacity(), DEFAULT_CACHE_CAPACITY);
    }

    #[test]
    fn test_synthetic_keys_are_distinct_from_paths() {
        let cache = IconCache::new(10);
        cache.put(IconKey::path("x"), "data:p".to_string());

        assert!(cache.get(&IconKey::synthetic("x")).is_none());
    }
}
