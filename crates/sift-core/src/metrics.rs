//! Session metrics
//!
//! Process-local counters for the current session: how many suggestions were
//! shown, accepted, and rejected. Counters are atomics so concurrent editors
//! can share one instance; nothing here is ever persisted.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Monotonic session counters with a derived acceptance rate
#[derive(Debug, Default)]
pub struct SessionMetrics {
    shown: AtomicU64,
    accepted: AtomicU64,
    rejected: AtomicU64,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `count` suggestions were shown to the user
    pub fn record_shown(&self, count: u64) {
        self.shown.fetch_add(count, Ordering::SeqCst);
    }

    pub fn record_accepted(&self) {
        self.accepted.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::SeqCst);
    }

    pub fn shown(&self) -> u64 {
        self.shown.load(Ordering::SeqCst)
    }

    pub fn accepted(&self) -> u64 {
        self.accepted.load(Ordering::SeqCst)
    }

    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::SeqCst)
    }

    /// accepted / shown, 0.0 when nothing has been shown
    pub fn acceptance_rate(&self) -> f64 {
        let shown = self.shown();
        if shown == 0 {
            0.0
        } else {
            self.accepted() as f64 / shown as f64
        }
    }

    /// Plain copy for display or JSON output
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            shown: self.shown(),
            accepted: self.accepted(),
            rejected: self.rejected(),
            acceptance_rate: self.acceptance_rate(),
        }
    }
}

/// Serializable point-in-time view of the session counters
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub shown: u64,
    pub accepted: u64,
    pub rejected: u64,
    pub acceptance_rate: f64,
}
