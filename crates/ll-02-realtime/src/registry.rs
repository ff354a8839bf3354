//! # Subscription Registry
//!
//! Maps channels to the delivery queues of the subscriptions listening on
//! them. Several subscriptions may share a channel; each gets its own copy
//! of every notification.
//!
//! The mapping sits behind one mutex. Routing clones the matching entries
//! under the lock and pushes into their queues after releasing it, so no
//! lock is held while a queue is touched or while the session does I/O.

use crate::domain::notification::Notification;
use crate::domain::queue::{DeliveryQueue, PushOutcome};
use crate::domain::topic::Channel;
use crate::error::{RealtimeError, RecvError};
use crate::metrics::SessionMetrics;
use crate::session::SessionInner;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, warn};

/// Session-local subscription identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

/// Registry-side record of one subscription.
#[derive(Debug)]
pub(crate) struct Entry {
    pub(crate) id: SubscriptionId,
    pub(crate) channel: Channel,
    pub(crate) queue: DeliveryQueue<Notification>,
}

#[derive(Debug, Default)]
struct RegistryState {
    entries: HashMap<SubscriptionId, Arc<Entry>>,
    by_channel: HashMap<Channel, Vec<SubscriptionId>>,
    terminated: Option<String>,
}

/// Channel -> subscriptions mapping for one session.
#[derive(Debug)]
pub struct SubscriptionRegistry {
    state: Mutex<RegistryState>,
    id_counter: AtomicU64,
    queue_capacity: usize,
    metrics: Arc<SessionMetrics>,
}

impl SubscriptionRegistry {
    pub(crate) fn new(queue_capacity: usize, metrics: Arc<SessionMetrics>) -> Self {
        Self {
            state: Mutex::new(RegistryState::default()),
            id_counter: AtomicU64::new(1),
            queue_capacity,
            metrics,
        }
    }

    /// Live subscriptions.
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Distinct channels with at least one live subscription.
    pub fn channel_count(&self) -> usize {
        self.state.lock().by_channel.len()
    }

    /// Live subscriptions on `channel`.
    pub fn subscribers(&self, channel: &Channel) -> usize {
        self.state
            .lock()
            .by_channel
            .get(channel)
            .map_or(0, Vec::len)
    }

    /// Reason the session ended, once it has.
    pub fn terminated_reason(&self) -> Option<String> {
        self.state.lock().terminated.clone()
    }

    /// Add a subscription; it is visible to the router on return.
    pub(crate) fn register(&self, channel: Channel) -> Result<Arc<Entry>, RealtimeError> {
        let mut state = self.state.lock();
        if let Some(reason) = &state.terminated {
            return Err(RealtimeError::SessionTerminated {
                reason: reason.clone(),
            });
        }

        let id = SubscriptionId(self.id_counter.fetch_add(1, Ordering::Relaxed));
        let entry = Arc::new(Entry {
            id,
            channel,
            queue: DeliveryQueue::new(self.queue_capacity),
        });
        state.entries.insert(id, entry.clone());
        state.by_channel.entry(channel).or_default().push(id);

        debug!(subscription_id = %id, channel = %channel, "Registered subscription");
        Ok(entry)
    }

    /// Remove a subscription from routing.
    ///
    /// Returns the entry and whether it was the last one on its channel,
    /// or `None` if it was not registered.
    pub(crate) fn remove(&self, id: SubscriptionId) -> Option<(Arc<Entry>, bool)> {
        let mut state = self.state.lock();
        let entry = state.entries.remove(&id)?;

        let mut last = false;
        if let Some(ids) = state.by_channel.get_mut(&entry.channel) {
            ids.retain(|other| *other != id);
            if ids.is_empty() {
                state.by_channel.remove(&entry.channel);
                last = true;
            }
        }

        debug!(subscription_id = %id, channel = %entry.channel, last, "Removed subscription");
        Some((entry, last))
    }

    /// Put back an entry whose unsubscribe could not be sent.
    pub(crate) fn restore(&self, entry: Arc<Entry>) {
        let mut state = self.state.lock();
        if let Some(reason) = state.terminated.clone() {
            drop(state);
            entry.queue.terminate(&reason);
            return;
        }
        state.by_channel.entry(entry.channel).or_default().push(entry.id);
        state.entries.insert(entry.id, entry);
    }

    /// Deliver a notification to every subscription on `channel`.
    ///
    /// Returns the number of queues that accepted it.
    pub(crate) fn route(&self, channel: &Channel, notification: Notification) -> usize {
        let targets: Vec<Arc<Entry>> = {
            let state = self.state.lock();
            match state.by_channel.get(channel) {
                Some(ids) => ids
                    .iter()
                    .filter_map(|id| state.entries.get(id).cloned())
                    .collect(),
                None => Vec::new(),
            }
        };

        let mut delivered = 0;
        for entry in &targets {
            match entry.queue.push(notification.clone()) {
                PushOutcome::Delivered => delivered += 1,
                PushOutcome::DroppedOldest => {
                    delivered += 1;
                    self.metrics.record_overflow();
                    warn!(
                        subscription_id = %entry.id,
                        channel = %channel,
                        capacity = entry.queue.capacity(),
                        "Delivery queue full, dropped oldest notification"
                    );
                }
                // Unsubscribed after the snapshot was taken.
                PushOutcome::Closed => {}
            }
        }

        self.metrics.record_routed(delivered);
        delivered
    }

    /// Mark the session ended and cancel every subscription.
    ///
    /// Returns `false` if it had already been terminated.
    pub(crate) fn terminate(&self, reason: &str) -> bool {
        let entries: Vec<Arc<Entry>> = {
            let mut state = self.state.lock();
            if state.terminated.is_some() {
                return false;
            }
            state.terminated = Some(reason.to_string());
            state.by_channel.clear();
            state.entries.drain().map(|(_, entry)| entry).collect()
        };

        for entry in &entries {
            entry.queue.terminate(reason);
        }
        debug!(cancelled = entries.len(), reason = %reason, "Registry terminated");
        true
    }
}

/// Caller handle to one subscription.
///
/// Dropping the handle does not unsubscribe; call
/// [`Subscription::unsubscribe`] or close the session.
#[derive(Debug)]
pub struct Subscription {
    entry: Arc<Entry>,
    session: Weak<SessionInner>,
}

impl Subscription {
    pub(crate) fn new(entry: Arc<Entry>, session: Weak<SessionInner>) -> Self {
        Self { entry, session }
    }

    pub fn id(&self) -> SubscriptionId {
        self.entry.id
    }

    pub fn channel(&self) -> &Channel {
        &self.entry.channel
    }

    /// Wait for the next notification.
    ///
    /// Fails once the subscription is cancelled and drained, or the
    /// session has ended.
    pub async fn recv(&self) -> Result<Notification, RecvError> {
        self.entry.queue.recv().await
    }

    /// Take a notification if one is queued.
    pub fn try_recv(&self) -> Result<Option<Notification>, RecvError> {
        self.entry.queue.try_recv()
    }

    /// Notifications waiting to be read.
    pub fn pending(&self) -> usize {
        self.entry.queue.len()
    }

    /// Notifications evicted because this queue was full.
    pub fn overflow_count(&self) -> u64 {
        self.entry.queue.overflow_count()
    }

    /// Whether unsubscribe or session termination has been applied.
    pub fn is_cancelled(&self) -> bool {
        self.entry.queue.is_closed()
    }

    /// Stop routing to this subscription. Idempotent.
    pub async fn unsubscribe(&self) -> Result<(), RealtimeError> {
        match self.session.upgrade() {
            Some(session) => session.unsubscribe(self).await,
            None => {
                self.entry.queue.terminate("session dropped");
                Ok(())
            }
        }
    }
}
