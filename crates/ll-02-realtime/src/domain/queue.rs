//! # Delivery Queue
//!
//! Bounded single-subscription buffer between the router (producer) and
//! the caller (consumer).
//!
//! - `push` never blocks: when full, the oldest item is evicted.
//! - After `close_unsubscribed`, queued items stay readable; once drained,
//!   reads fail with [`RecvError::Unsubscribed`].
//! - After `terminate`, queued items are discarded. Exactly one read
//!   observes [`RecvError::SessionTerminated`]; all later reads get
//!   [`RecvError::Closed`]. This holds with any number of concurrent
//!   readers because the terminal flag is taken under the queue lock.

use crate::error::RecvError;
use parking_lot::Mutex;
use std::collections::VecDeque;
use tokio::sync::Notify;

/// Result of a push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    Delivered,
    /// Delivered after evicting the oldest item.
    DroppedOldest,
    /// Queue no longer accepts items.
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Closed {
    Unsubscribed,
    Terminated(String),
}

#[derive(Debug)]
struct QueueState<T> {
    items: VecDeque<T>,
    closed: Option<Closed>,
    terminal_taken: bool,
    overflow: u64,
}

/// Bounded drop-oldest queue with a one-shot terminal signal.
#[derive(Debug)]
pub struct DeliveryQueue<T> {
    state: Mutex<QueueState<T>>,
    notify: Notify,
    capacity: usize,
}

impl<T> DeliveryQueue<T> {
    /// Create a queue holding at most `capacity` items (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            state: Mutex::new(QueueState {
                items: VecDeque::with_capacity(capacity.min(64)),
                closed: None,
                terminal_taken: false,
                overflow: 0,
            }),
            notify: Notify::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Items evicted because the queue was full.
    pub fn overflow_count(&self) -> u64 {
        self.state.lock().overflow
    }

    /// Whether the queue has been unsubscribed or terminated.
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed.is_some()
    }

    /// Enqueue an item without blocking.
    pub fn push(&self, item: T) -> PushOutcome {
        let outcome = {
            let mut state = self.state.lock();
            if state.closed.is_some() {
                return PushOutcome::Closed;
            }
            let outcome = if state.items.len() >= self.capacity {
                state.items.pop_front();
                state.overflow += 1;
                PushOutcome::DroppedOldest
            } else {
                PushOutcome::Delivered
            };
            state.items.push_back(item);
            outcome
        };
        self.notify.notify_one();
        outcome
    }

    /// Stop accepting items; already queued items remain readable.
    ///
    /// Returns `false` if the queue was already closed.
    pub fn close_unsubscribed(&self) -> bool {
        {
            let mut state = self.state.lock();
            if state.closed.is_some() {
                return false;
            }
            state.closed = Some(Closed::Unsubscribed);
        }
        self.notify.notify_waiters();
        true
    }

    /// Discard queued items and arm the terminal signal.
    ///
    /// No effect on a queue that is already closed.
    pub fn terminate(&self, reason: &str) -> bool {
        {
            let mut state = self.state.lock();
            if state.closed.is_some() {
                return false;
            }
            state.items.clear();
            state.closed = Some(Closed::Terminated(reason.to_string()));
        }
        self.notify.notify_waiters();
        true
    }

    /// Take the next item if one is ready.
    ///
    /// `Ok(None)` means the queue is open but empty.
    pub fn try_recv(&self) -> Result<Option<T>, RecvError> {
        let mut state = self.state.lock();
        if let Some(item) = state.items.pop_front() {
            return Ok(Some(item));
        }
        match &state.closed {
            None => Ok(None),
            Some(Closed::Unsubscribed) => Err(RecvError::Unsubscribed),
            Some(Closed::Terminated(reason)) => {
                if state.terminal_taken {
                    Err(RecvError::Closed)
                } else {
                    let reason = reason.clone();
                    state.terminal_taken = true;
                    Err(RecvError::SessionTerminated { reason })
                }
            }
        }
    }

    /// Wait for the next item or the end of the subscription.
    pub async fn recv(&self) -> Result<T, RecvError> {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            // Register before checking so a push between the check and the
            // await is not missed.
            notified.as_mut().enable();

            if let Some(item) = self.try_recv()? {
                return Ok(item);
            }
            notified.await;
        }
    }
}
