//! Pending request queue
//!
//! Holds icon requests that are waiting for a free concurrency slot. Entries
//! are selected by priority (higher first) with a strict FIFO tie-break via a
//! monotone enqueue counter. Cancelled entries are cleaned up lazily: dropped
//! from the front of the queue, or skipped at the moment they are selected,
//! never actively removed from the middle.
//!
//! Queue depth is bounded only by cancellations from scrolled-away items, not
//! by a hard cap; the scheduler exposes the depth so consumers can watch it.

use crate::cancel::CancellationToken;
use launcher_icon_cache::{IconKey, IconPayload};
use std::collections::VecDeque;
use tokio::sync::oneshot;

/// A queued icon request awaiting dispatch.
pub(crate) struct QueueEntry {
    /// Item whose icon is wanted.
    pub key: IconKey,

    /// Urgency; higher values dispatch first.
    pub priority: i32,

    /// Enqueue counter, used only as the FIFO tie-break within a priority.
    pub seq: u64,

    /// Requester-side cancellation flag, checked lazily at selection time.
    pub cancelled: CancellationToken,

    /// Settlement channel for the requester that created this entry.
    pub settle: oneshot::Sender<Option<IconPayload>>,
}

/// Priority-ordered pending set with lazy cancellation cleanup.
pub(crate) struct PendingQueue {
    entries: VecDeque<QueueEntry>,
    next_seq: u64,

    /// Total cancelled entries dropped so far.
    dropped_cancelled: u64,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
            next_seq: 0,
            dropped_cancelled: 0,
        }
    }

    /// Append a request and return its enqueue sequence number.
    pub fn push(
        &mut self,
        key: IconKey,
        priority: i32,
        cancelled: CancellationToken,
        settle: oneshot::Sender<Option<IconPayload>>,
    ) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push_back(QueueEntry {
            key,
            priority,
            seq,
            cancelled,
            settle,
        });
        seq
    }

    /// Remove and return the next entry to dispatch.
    ///
    /// Selection is highest priority first, earliest enqueue within a
    /// priority. Cancelled entries at the front are dropped eagerly; a
    /// cancelled entry elsewhere is dropped only if it wins selection, in
    /// which case selection simply continues with the remainder.
    pub fn select_next(&mut self) -> Option<QueueEntry> {
        loop {
            while self
                .entries
                .front()
                .is_some_and(|entry| entry.cancelled.is_cancelled())
            {
                self.entries.pop_front();
                self.dropped_cancelled += 1;
            }

            let best = self
                .entries
                .iter()
                .enumerate()
                .max_by(|(_, a), (_, b)| {
                    a.priority
                        .cmp(&b.priority)
                        .then_with(|| b.seq.cmp(&a.seq))
                })
                .map(|(index, _)| index)?;

            let entry = self.entries.remove(best)?;
            if entry.cancelled.is_cancelled() {
                self.dropped_cancelled += 1;
                continue;
            }
            return Some(entry);
        }
    }

    /// Number of entries currently queued, cancelled ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Total cancelled entries dropped by lazy cleanup so far.
    pub fn cancelled_count(&self) -> u64 {
        self.dropped_cancelled
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
