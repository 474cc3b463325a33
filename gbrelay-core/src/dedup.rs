//! In-memory record of webhook deliveries that have already been relayed.
//!
//! GameBoost retries a delivery until it sees a 2xx, so the same event can
//! arrive several times. The tracker remembers every [`WebhookId`] that led
//! to a notification for the lifetime of the process. Nothing is persisted
//! and nothing is evicted.
//!
//! Relay tasks run in parallel, so checking and marking an id happens in a
//! single critical section through [`DedupTracker::try_claim`]. A claimed id
//! is "in flight" until its [`ClaimGuard`] is completed or dropped.

use gbrelay_sdk::objects::WebhookId;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct DedupState {
    processed: HashSet<WebhookId>,
    in_flight: HashSet<WebhookId>,
}

/// Cloneable handle to the shared dedup set.
#[derive(Debug, Clone, Default)]
pub struct DedupTracker {
    inner: Arc<Mutex<DedupState>>,
}

/// Result of [`DedupTracker::try_claim`].
#[derive(Debug)]
pub enum Claim {
    /// The id was free and is now in flight.
    Acquired(ClaimGuard),
    /// A notification for this id was already sent.
    AlreadyProcessed,
    /// Another task is currently delivering this id.
    InFlight,
}

impl DedupTracker {
    pub fn new() -> Self {
        Self::default()
    }

    // Every critical section leaves the sets consistent, so a poisoned
    // lock is still safe to use.
    fn state(&self) -> MutexGuard<'_, DedupState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn has_processed(&self, id: &WebhookId) -> bool {
        self.state().processed.contains(id)
    }

    pub fn mark_processed(&self, id: WebhookId) {
        let mut state = self.state();
        state.in_flight.remove(&id);
        state.processed.insert(id);
    }

    /// Atomically check both sets and, if the id is unseen, mark it in flight.
    pub fn try_claim(&self, id: &WebhookId) -> Claim {
        let mut state = self.state();
        if state.processed.contains(id) {
            return Claim::AlreadyProcessed;
        }
        if !state.in_flight.insert(id.clone()) {
            return Claim::InFlight;
        }
        Claim::Acquired(ClaimGuard {
            tracker: self.clone(),
            id: Some(id.clone()),
        })
    }

    /// Number of ids marked processed.
    pub fn len(&self) -> usize {
        self.state().processed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn release(&self, id: &WebhookId) {
        self.state().in_flight.remove(id);
    }
}

/// An in-flight claim on a [`WebhookId`].
///
/// Dropping the guard without calling [`complete`](Self::complete) releases
/// the id, so a later retry can claim it again.
#[derive(Debug)]
pub struct ClaimGuard {
    tracker: DedupTracker,
    id: Option<WebhookId>,
}

impl ClaimGuard {
    /// Mark the id as processed.
    pub fn complete(mut self) {
        if let Some(id) = self.id.take() {
            self.tracker.mark_processed(id);
        }
    }
}

impl Drop for ClaimGuard {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.tracker.release(&id);
        }
    }
}
