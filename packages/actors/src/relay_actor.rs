//! Relay actor owning the subscriber set.

use ractor::{Actor, ActorProcessingErr, ActorRef};

use crate::messages::RelayMessage;
use crate::relay::SubscriberSet;

/// Actor that serializes subscribe, unsubscribe and publish.
///
/// Messages are handled one at a time, so a call that has returned is
/// visible to every call made after it.
pub struct RelayActor;

impl Actor for RelayActor {
    type Msg = RelayMessage;
    type State = SubscriberSet;
    type Arguments = ();

    async fn pre_start(
        &self,
        myself: ActorRef<Self::Msg>,
        _args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        tracing::info!("Starting event relay {}", myself.get_id());
        Ok(SubscriberSet::new())
    }

    async fn handle(
        &self,
        myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            RelayMessage::Subscribe { subscriber, reply } => {
                let handle = state.subscribe(subscriber);
                tracing::debug!("Subscribed {} ({} active)", handle, state.len());
                if reply.send(handle).is_err() {
                    // Caller went away before learning its handle
                    state.unsubscribe(handle);
                }
            }

            RelayMessage::Unsubscribe { handle, reply } => {
                let removed = state.unsubscribe(handle);
                if removed {
                    tracing::debug!("Unsubscribed {} ({} active)", handle, state.len());
                }
                if let Some(reply) = reply {
                    let _ = reply.send(removed);
                }
            }

            RelayMessage::Publish { event, reply } => {
                let report = state.publish(&event);
                tracing::debug!(
                    "Published {}: {} delivered, {} failed",
                    event.description(),
                    report.delivered,
                    report.failed
                );
                let _ = reply.send(report);
            }

            RelayMessage::SubscriberCount { reply } => {
                let _ = reply.send(state.len());
            }

            RelayMessage::Shutdown => {
                tracing::info!("Shutting down event relay ({} subscribers)", state.len());
                state.clear();
                myself.stop(None);
            }
        }

        Ok(())
    }
}
