//! Session counters.
//!
//! Updated by the read loop and the registry; read through
//! [`SessionMetrics::snapshot`].

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for one session.
#[derive(Debug, Default)]
pub struct SessionMetrics {
    /// Frames read from the transport
    pub frames_received: AtomicU64,
    /// Notification deliveries into subscription queues
    pub frames_routed: AtomicU64,
    /// Notifications with no matching subscription
    pub frames_unmatched: AtomicU64,
    /// Frames dropped because they could not be decoded
    pub decode_errors: AtomicU64,
    /// Items evicted from full delivery queues
    pub overflow_drops: AtomicU64,
    /// Subscribe and unsubscribe messages sent
    pub control_messages_sent: AtomicU64,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_received(&self) {
        self.frames_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a notification fanned out to `deliveries` queues.
    pub fn record_routed(&self, deliveries: usize) {
        if deliveries == 0 {
            self.frames_unmatched.fetch_add(1, Ordering::Relaxed);
        } else {
            self.frames_routed
                .fetch_add(deliveries as u64, Ordering::Relaxed);
        }
    }

    pub fn record_decode_error(&self) {
        self.decode_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_overflow(&self) {
        self.overflow_drops.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_control_sent(&self) {
        self.control_messages_sent.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            frames_received: self.frames_received.load(Ordering::Relaxed),
            frames_routed: self.frames_routed.load(Ordering::Relaxed),
            frames_unmatched: self.frames_unmatched.load(Ordering::Relaxed),
            decode_errors: self.decode_errors.load(Ordering::Relaxed),
            overflow_drops: self.overflow_drops.load(Ordering::Relaxed),
            control_messages_sent: self.control_messages_sent.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`SessionMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub frames_received: u64,
    pub frames_routed: u64,
    pub frames_unmatched: u64,
    pub decode_errors: u64,
    pub overflow_drops: u64,
    pub control_messages_sent: u64,
}
