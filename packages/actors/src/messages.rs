//! Message types for the relay actor.

use std::sync::Arc;

use dispatch_core::JobEvent;
use ractor::RpcReplyPort;

use crate::relay::{PublishReport, SubscriptionHandle};
use crate::subscriber::Subscriber;

/// Messages for the RelayActor.
pub enum RelayMessage {
    /// Register a subscriber.
    Subscribe {
        subscriber: Arc<dyn Subscriber>,
        reply: RpcReplyPort<SubscriptionHandle>,
    },

    /// Remove a subscription. `reply` is None for fire-and-forget removal.
    Unsubscribe {
        handle: SubscriptionHandle,
        reply: Option<RpcReplyPort<bool>>,
    },

    /// Deliver an event to every current subscriber.
    Publish {
        event: Box<JobEvent>,
        reply: RpcReplyPort<PublishReport>,
    },

    /// Number of live subscriptions.
    SubscriberCount { reply: RpcReplyPort<usize> },

    /// Drop every subscription and stop.
    Shutdown,
}

impl std::fmt::Debug for RelayMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelayMessage::Subscribe { .. } => f.write_str("Subscribe"),
            RelayMessage::Unsubscribe { handle, .. } => write!(f, "Unsubscribe({handle})"),
            RelayMessage::Publish { event, .. } => write!(f, "Publish({})", event.kind()),
            RelayMessage::SubscriberCount { .. } => f.write_str("SubscriberCount"),
            RelayMessage::Shutdown => f.write_str("Shutdown"),
        }
    }
}
