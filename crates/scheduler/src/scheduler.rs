//! Icon fetch scheduler implementation
//!
//! The scheduler sits between the launcher UI and the native icon backend.
//! It deduplicates concurrent requests for the same key, consults the shared
//! icon cache before going to the backend, limits the number of outstanding
//! backend calls, and dispatches pending work in priority order.

use crate::cancel::CancellationToken;
use crate::fetcher::IconFetcher;
use crate::queue::PendingQueue;
use launcher_icon_cache::{IconCache, IconKey, IconPayload};
use log::{debug, warn};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

/// Default number of backend fetches that may be outstanding at once.
///
/// The native icon backend is an OS-level resource; hundreds of items can
/// scroll into view in a single gesture and it must not be saturated.
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 6;

/// Scheduler configuration
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Maximum number of concurrently outstanding backend fetches.
    pub max_concurrent: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_concurrent: DEFAULT_MAX_CONCURRENT_FETCHES,
        }
    }
}

impl SchedulerConfig {
    /// Create a configuration with the default concurrency bound.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the concurrency bound.
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }
}

/// Scheduler statistics
#[derive(Debug, Clone, Default)]
pub struct SchedulerStats {
    /// Total requests received
    pub requests: u64,

    /// Requests answered directly from the cache
    pub cache_hits: u64,

    /// Requests attached to an already in-flight fetch
    pub dedup_hits: u64,

    /// Backend fetches dispatched
    pub dispatched: u64,

    /// Backend fetches completed (successfully or not)
    pub completed: u64,

    /// Requests cancelled before dispatch and dropped by lazy cleanup
    pub cancelled: u64,

    /// Current pending queue depth (cancelled entries included)
    pub pending: usize,

    /// Current number of in-flight backend fetches
    pub in_flight: usize,
}

/// Handle to one icon request.
///
/// Couples the awaitable outcome with a cancellation handle. Cancelling only
/// detaches this requester: a fetch that has already been dispatched runs to
/// completion and still populates the shared cache for everyone else.
pub struct IconRequest {
    outcome: oneshot::Receiver<Option<IconPayload>>,
    token: CancellationToken,
}

impl IconRequest {
    /// Cancellation handle for this request.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Cancel this request. Equivalent to cancelling the token.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Wait for the outcome.
    ///
    /// Resolves to `Some(payload)` when an icon was found and `None` when the
    /// item has no icon, the backend failed, or the request was cancelled
    /// before dispatch.
    pub async fn outcome(self) -> Option<IconPayload> {
        self.outcome.await.unwrap_or(None)
    }
}

struct SchedulerState {
    pending: PendingQueue,

    /// Waiters per dispatched key. At most one backend fetch is in flight per
    /// key; every deduplicated requester parks its settlement channel here.
    in_flight: HashMap<IconKey, Vec<oneshot::Sender<Option<IconPayload>>>>,

    /// Occupied concurrency slots.
    active: usize,

    stats: SchedulerStats,
}

/// Bounded-concurrency, deduplicating, priority-ordered icon fetch scheduler.
///
/// All scheduling state lives behind one mutex; critical sections never span
/// an await point, so queue mutation, cache consultation, and drain selection
/// each execute atomically with respect to every other scheduler operation.
///
/// Dispatched fetches run as spawned tasks, so the scheduler must be used
/// from within a Tokio runtime.
///
/// # Example
///
/// ```no_run
/// use launcher_icon_cache::{IconCache, IconKey};
/// use launcher_icon_scheduler::{FetchScheduler, SchedulerConfig};
/// use std::sync::Arc;
///
/// # fn demo(backend: Arc<dyn launcher_icon_scheduler::IconFetcher>) {
/// let cache = Arc::new(IconCache::default());
/// let scheduler = FetchScheduler::new(backend, cache, SchedulerConfig::default());
///
/// let request = scheduler.request(IconKey::path("/Applications/Safari.app"), 10);
/// // request.outcome().await resolves once the fetch settles;
/// // request.cancel() detaches if the item scrolls away first.
/// # }
/// ```
pub struct FetchScheduler {
    fetcher: Arc<dyn IconFetcher>,
    cache: Arc<IconCache>,
    max_concurrent: usize,
    state: Mutex<SchedulerState>,
}

impl FetchScheduler {
    /// Create a new scheduler issuing fetches through `fetcher` and caching
    /// results in `cache`.
    pub fn new(
        fetcher: Arc<dyn IconFetcher>,
        cache: Arc<IconCache>,
        config: SchedulerConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            fetcher,
            cache,
            max_concurrent: config.max_concurrent,
            state: Mutex::new(SchedulerState {
                pending: PendingQueue::new(),
                in_flight: HashMap::new(),
                active: 0,
                stats: SchedulerStats::default(),
            }),
        })
    }

    /// Request the icon for `key` at the given priority.
    ///
    /// Resolution order:
    /// 1. Synthetic keys settle immediately to absent; the backend is never
    ///    asked for them.
    /// 2. A cache hit settles immediately with the payload.
    /// 3. A key already in flight attaches this caller to the existing fetch.
    /// 4. Otherwise the request is queued and dispatched when a concurrency
    ///    slot frees up, highest priority first, FIFO within a priority.
    pub fn request(self: &Arc<Self>, key: IconKey, priority: i32) -> IconRequest {
        let token = CancellationToken::new();
        let (settle_tx, settle_rx) = oneshot::channel();
        let request = IconRequest {
            outcome: settle_rx,
            token: token.clone(),
        };

        if !key.is_fetchable() {
            self.state.lock().unwrap().stats.requests += 1;
            let _ = settle_tx.send(None);
            return request;
        }

        if let Some(payload) = self.cache.get(&key) {
            let mut state = self.state.lock().unwrap();
            state.stats.requests += 1;
            state.stats.cache_hits += 1;
            drop(state);
            let _ = settle_tx.send(Some(payload));
            return request;
        }

        {
            let mut state = self.state.lock().unwrap();
            state.stats.requests += 1;

            if let Some(waiters) = state.in_flight.get_mut(&key) {
                waiters.push(settle_tx);
                state.stats.dedup_hits += 1;
                return request;
            }

            state.pending.push(key, priority, token, settle_tx);
        }

        self.drain();
        request
    }

    /// Fill free concurrency slots from the pending queue.
    ///
    /// Runs until either the slots are exhausted or the queue is. A selected
    /// entry whose key went in flight in the meantime is attached as a waiter
    /// instead of being dispatched, preserving the one-fetch-per-key
    /// guarantee; one whose key got cached while it waited is settled from
    /// the cache without a backend call.
    fn drain(self: &Arc<Self>) {
        loop {
            let dispatch = {
                let mut state = self.state.lock().unwrap();
                if state.active >= self.max_concurrent {
                    return;
                }
                let Some(entry) = state.pending.select_next() else {
                    return;
                };

                if let Some(payload) = self.cache.get(&entry.key) {
                    state.stats.cache_hits += 1;
                    let _ = entry.settle.send(Some(payload));
                    None
                } else if let Some(waiters) = state.in_flight.get_mut(&entry.key) {
                    waiters.push(entry.settle);
                    state.stats.dedup_hits += 1;
                    None
                } else {
                    state.in_flight.insert(entry.key.clone(), vec![entry.settle]);
                    state.active += 1;
                    state.stats.dispatched += 1;
                    Some(entry.key)
                }
            };

            if let Some(key) = dispatch {
                debug!("dispatching icon fetch for {key}");
                let this = Arc::clone(self);
                tokio::spawn(async move {
                    let outcome = match this.fetcher.fetch_icon(&key).await {
                        Ok(payload) => payload.filter(|p| !p.is_empty()),
                        Err(err) => {
                            warn!("icon fetch failed for {key}: {err}");
                            None
                        }
                    };
                    this.settle(&key, outcome);
                });
            }
        }
    }

    /// Settle a completed fetch: release its slot, cache a non-empty payload,
    /// fan the outcome out to every attached waiter, and re-drain so the
    /// freed slot is reused immediately.
    fn settle(self: &Arc<Self>, key: &IconKey, outcome: Option<IconPayload>) {
        if let Some(payload) = &outcome {
            self.cache.put(key.clone(), payload.clone());
        }

        let waiters = {
            let mut state = self.state.lock().unwrap();
            state.active -= 1;
            state.stats.completed += 1;
            state.in_flight.remove(key).unwrap_or_default()
        };

        // Detached waiters (dropped receivers) are fine to miss.
        for waiter in waiters {
            let _ = waiter.send(outcome.clone());
        }

        self.drain();
    }

    /// The shared icon cache this scheduler populates and consults.
    pub fn cache(&self) -> &Arc<IconCache> {
        &self.cache
    }

    /// Current pending queue depth, cancelled entries included.
    ///
    /// The queue is deliberately uncapped; an unbounded scroll burst grows it
    /// until cancellations from scrolled-away items trim it back. Consumers
    /// that care can watch this number.
    pub fn pending_len(&self) -> usize {
        self.state.lock().unwrap().pending.len()
    }

    /// Get scheduler statistics.
    pub fn stats(&self) -> SchedulerStats {
        let state = self.state.lock().unwrap();
        let mut stats = state.stats.clone();
        stats.cancelled = state.pending.cancelled_count();
        stats.pending = state.pending.len();
        stats.in_flight = state.in_flight.len();
        stats
    }
}
