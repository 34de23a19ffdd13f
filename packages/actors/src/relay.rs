//! The subscriber set behind the broadcast relay.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use dispatch_core::JobEvent;

use crate::subscriber::{DeliveryError, Subscriber};

/// Token returned by `subscribe`, used to remove the subscription later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionHandle(u64);

impl SubscriptionHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Outcome of one publish call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Subscribers that accepted the event.
    pub delivered: usize,
    /// Subscribers that returned an error or panicked.
    pub failed: usize,
}

impl PublishReport {
    pub fn attempted(&self) -> usize {
        self.delivered + self.failed
    }
}

/// Registration-ordered set of subscribers.
///
/// Not synchronized. The relay actor owns one and serializes access to it.
#[derive(Default)]
pub struct SubscriberSet {
    entries: Vec<(SubscriptionHandle, Arc<dyn Subscriber>)>,
    next_id: u64,
}

impl SubscriberSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber. It receives every event published from now on.
    pub fn subscribe(&mut self, subscriber: Arc<dyn Subscriber>) -> SubscriptionHandle {
        self.next_id += 1;
        let handle = SubscriptionHandle(self.next_id);
        self.entries.push((handle, subscriber));
        handle
    }

    /// Remove a subscription. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, handle: SubscriptionHandle) -> bool {
        match self.entries.iter().position(|(h, _)| *h == handle) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Deliver `event` to every subscriber in registration order.
    ///
    /// A subscriber that errors or panics is logged and skipped; the rest
    /// still receive the event.
    pub fn publish(&self, event: &JobEvent) -> PublishReport {
        let mut report = PublishReport::default();

        for (handle, subscriber) in &self.entries {
            let outcome = catch_unwind(AssertUnwindSafe(|| subscriber.deliver(event)));
            match outcome {
                Ok(Ok(())) => report.delivered += 1,
                Ok(Err(DeliveryError::Closed)) => {
                    tracing::debug!("Subscriber {} already closed", handle);
                    report.failed += 1;
                }
                Ok(Err(e)) => {
                    tracing::warn!("Subscriber {} failed: {}", handle, e);
                    report.failed += 1;
                }
                Err(_) => {
                    tracing::warn!("Subscriber {} panicked during delivery", handle);
                    report.failed += 1;
                }
            }
        }

        report
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl std::fmt::Debug for SubscriberSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let handles: Vec<SubscriptionHandle> = self.entries.iter().map(|(h, _)| *h).collect();
        f.debug_struct("SubscriberSet")
            .field("handles", &handles)
            .field("next_id", &self.next_id)
            .finish()
    }
}
