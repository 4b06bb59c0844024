//! Cancellation tokens for icon requests
//!
//! A requester that no longer wants an icon (its grid cell scrolled away or
//! was torn down) flips its token. The scheduler checks tokens lazily: a
//! cancelled pending entry is dropped when it would otherwise be dispatched,
//! and is never allowed to consume a concurrency slot.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Advisory cancellation flag shared between a requester and the scheduler.
///
/// Cancellation is cooperative: flipping the token before dispatch prevents
/// the fetch from ever starting; flipping it afterwards only detaches this
/// requester, the fetch itself runs to completion for any other caller
/// deduplicated onto it.
///
/// All clones share the same underlying flag.
///
/// # Example
///
/// ```
/// use launcher_icon_scheduler::CancellationToken;
///
/// let token = CancellationToken::new();
/// let scheduler_side = token.clone();
///
/// token.cancel();
/// assert!(scheduler_side.is_cancelled());
/// ```
#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a token in the non-cancelled state.
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Cancel this token. Idempotent; observed by every clone.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Check whether `cancel()` has been called on this token or any clone.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}
