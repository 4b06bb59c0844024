//! Launcher Icon Scheduler Library
//!
//! Bounded-concurrency icon retrieval for the launcher grid.
//!
//! Icon requests are deduplicated per key, answered from the shared LRU cache
//! when possible, and otherwise queued and dispatched to the native icon
//! backend in priority order, at most six at a time. Requests carry a
//! cancellation handle so items that scroll out of view stop competing for
//! backend slots, and a visibility gate decides when an item's request should
//! be active at all.
//!
//! # Example
//!
//! ```no_run
//! use launcher_icon_cache::{IconCache, IconKey};
//! use launcher_icon_scheduler::{FetchScheduler, SchedulerConfig};
//! use std::sync::Arc;
//!
//! # async fn demo(backend: Arc<dyn launcher_icon_scheduler::IconFetcher>) {
//! let cache = Arc::new(IconCache::default());
//! let scheduler = FetchScheduler::new(backend, cache, SchedulerConfig::default());
//!
//! let request = scheduler.request(IconKey::path("/Applications/Safari.app"), 10);
//! match request.outcome().await {
//!     Some(payload) => println!("icon resolved: {} bytes", payload.len()),
//!     None => println!("no icon, render the placeholder glyph"),
//! }
//! # }
//! ```

mod cancel;
mod fetcher;
mod queue;
mod scheduler;
mod viewport;

// Re-export public API
pub use cancel::CancellationToken;
pub use fetcher::{FetchError, IconFetcher};
pub use scheduler::{
    FetchScheduler, IconRequest, SchedulerConfig, SchedulerStats, DEFAULT_MAX_CONCURRENT_FETCHES,
};
pub use viewport::{
    GateTransition, ItemBounds, Viewport, VisibilityGate, DEFAULT_VIEWPORT_MARGIN,
};
