//! Subscriber trait and closure adapter.

use dispatch_core::JobEvent;
use thiserror::Error;

/// Why a subscriber could not take an event.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeliveryError {
    /// The receiving side is gone (client disconnected, stream closed).
    #[error("subscriber closed")]
    Closed,
    /// The event could not be encoded for this subscriber.
    #[error("failed to serialize event: {0}")]
    Serialize(String),
    /// Any other refusal.
    #[error("delivery rejected: {0}")]
    Rejected(String),
}

/// Receives every event published while it is registered.
///
/// `deliver` runs inside the relay's publish loop, so it should hand the event
/// off (to a channel, a buffer) rather than block.
pub trait Subscriber: Send + Sync + 'static {
    fn deliver(&self, event: &JobEvent) -> Result<(), DeliveryError>;
}

/// A subscriber backed by a closure.
pub struct FnSubscriber<F>
where
    F: Fn(&JobEvent) -> Result<(), DeliveryError> + Send + Sync + 'static,
{
    deliver: F,
}

impl<F> FnSubscriber<F>
where
    F: Fn(&JobEvent) -> Result<(), DeliveryError> + Send + Sync + 'static,
{
    pub fn new(deliver: F) -> Self {
        Self { deliver }
    }
}

impl<F> Subscriber for FnSubscriber<F>
where
    F: Fn(&JobEvent) -> Result<(), DeliveryError> + Send + Sync + 'static,
{
    fn deliver(&self, event: &JobEvent) -> Result<(), DeliveryError> {
        (self.deliver)(event)
    }
}

impl<F> std::fmt::Debug for FnSubscriber<F>
where
    F: Fn(&JobEvent) -> Result<(), DeliveryError> + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnSubscriber").finish_non_exhaustive()
    }
}
