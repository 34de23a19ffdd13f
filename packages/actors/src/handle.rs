//! Cloneable handle to a running relay.

use std::sync::Arc;

use dispatch_core::JobEvent;
use ractor::{Actor, ActorRef};
use thiserror::Error;

use crate::messages::RelayMessage;
use crate::relay::{PublishReport, SubscriptionHandle};
use crate::relay_actor::RelayActor;
use crate::subscriber::Subscriber;

/// Relay errors.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("failed to spawn relay: {0}")]
    Spawn(String),
    #[error("relay is not running")]
    Stopped,
}

/// Publish/subscribe hub for job events.
///
/// Each `start` spawns its own unnamed actor, so any number of relays can run
/// side by side. Clones share the same actor.
#[derive(Debug, Clone)]
pub struct Relay {
    actor: ActorRef<RelayMessage>,
}

impl Relay {
    /// Spawn a relay.
    pub async fn start() -> Result<(Self, tokio::task::JoinHandle<()>), RelayError> {
        let (actor, handle) = Actor::spawn(None, RelayActor, ())
            .await
            .map_err(|e| RelayError::Spawn(e.to_string()))?;
        Ok((Self { actor }, handle))
    }

    /// Register a subscriber for every event published after this returns.
    pub async fn subscribe(
        &self,
        subscriber: Arc<dyn Subscriber>,
    ) -> Result<SubscriptionHandle, RelayError> {
        let (tx, rx) = ractor::concurrency::oneshot();
        self.actor
            .send_message(RelayMessage::Subscribe {
                subscriber,
                reply: tx.into(),
            })
            .map_err(|_| RelayError::Stopped)?;
        rx.await.map_err(|_| RelayError::Stopped)
    }

    /// Remove a subscription. Returns false if it was already removed.
    pub async fn unsubscribe(&self, handle: SubscriptionHandle) -> Result<bool, RelayError> {
        let (tx, rx) = ractor::concurrency::oneshot();
        self.actor
            .send_message(RelayMessage::Unsubscribe {
                handle,
                reply: Some(tx.into()),
            })
            .map_err(|_| RelayError::Stopped)?;
        rx.await.map_err(|_| RelayError::Stopped)
    }

    /// Queue a removal without waiting. Safe to call from `Drop`.
    ///
    /// A stopped relay has no subscriptions left, so a failed send is ignored.
    pub fn unsubscribe_detached(&self, handle: SubscriptionHandle) {
        let _ = self.actor.send_message(RelayMessage::Unsubscribe {
            handle,
            reply: None,
        });
    }

    /// Deliver an event to every current subscriber.
    ///
    /// Subscriber failures are counted in the report, never returned as errors.
    pub async fn publish(&self, event: JobEvent) -> Result<PublishReport, RelayError> {
        let (tx, rx) = ractor::concurrency::oneshot();
        self.actor
            .send_message(RelayMessage::Publish {
                event: Box::new(event),
                reply: tx.into(),
            })
            .map_err(|_| RelayError::Stopped)?;
        rx.await.map_err(|_| RelayError::Stopped)
    }

    pub async fn subscriber_count(&self) -> Result<usize, RelayError> {
        let (tx, rx) = ractor::concurrency::oneshot();
        self.actor
            .send_message(RelayMessage::SubscriberCount { reply: tx.into() })
            .map_err(|_| RelayError::Stopped)?;
        rx.await.map_err(|_| RelayError::Stopped)
    }

    /// Stop the relay, dropping all subscriptions.
    pub fn shutdown(&self) {
        let _ = self.actor.send_message(RelayMessage::Shutdown);
    }
}
