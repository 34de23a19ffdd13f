//! Broadcast relay for job events.
//!
//! # Architecture
//!
//! - `SubscriberSet` - ordered subscriber registry with per-subscriber fault isolation
//! - `RelayActor` - owns the set and processes one request at a time
//! - `Relay` - cloneable handle injected into the HTTP endpoints
//!
//! # Usage
//!
//! ```ignore
//! use actors::{FnSubscriber, Relay};
//!
//! let (relay, _handle) = Relay::start().await?;
//! let sub = relay.subscribe(Arc::new(FnSubscriber::new(|event| Ok(())))).await?;
//! relay.publish(event).await?;
//! relay.unsubscribe(sub).await?;
//! ```

mod handle;
mod messages;
mod relay;
mod relay_actor;
mod subscriber;

pub use handle::{Relay, RelayError};
pub use messages::RelayMessage;
pub use relay::{PublishReport, SubscriberSet, SubscriptionHandle};
pub use relay_actor::RelayActor;
pub use subscriber::{DeliveryError, FnSubscriber, Subscriber};
