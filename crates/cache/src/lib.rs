//! Launcher Icon Cache Library
//!
//! Bounded in-memory cache for resolved launcher icons with LRU eviction.
//! Icons scroll through the launcher grid by the thousand, so the cache keeps
//! only the most recently viewed entries and evicts the rest under capacity
//! pressure.

pub mod key;
pub mod lru;

pub use key::{IconKey, IconPayload};
pub use lru::{CacheStats, IconCache, DEFAULT_CACHE_CAPACITY};
