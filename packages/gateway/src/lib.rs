//! HTTP surface of the dispatch server.
//!
//! - `events` - webhook ingress and the live event stream, both bound to a [`actors::Relay`]
//! - `upstream` - clients for the jobs-listing and user-account APIs
//! - `config` - environment configuration

pub mod config;
pub mod events;
pub mod upstream;

pub use config::{ConfigError, GatewayConfig};
pub use events::{EVENTS_PATH, WEBHOOK_PATH, WebhookAck, event_routes};
pub use upstream::{AuthUpstream, JobsUpstream, UpstreamError, Upstreams, http_client};

use std::sync::OnceLock;

static UPSTREAMS: OnceLock<Upstreams> = OnceLock::new();

/// Install the upstream clients used by the server functions.
///
/// The first call wins; later calls are ignored.
pub fn install_upstreams(upstreams: Upstreams) {
    if UPSTREAMS.set(upstreams).is_err() {
        tracing::warn!("Upstream clients already installed");
    }
}

/// The installed upstream clients, or clients built from the environment
/// if nothing was installed.
pub fn upstreams() -> Result<&'static Upstreams, UpstreamError> {
    if let Some(upstreams) = UPSTREAMS.get() {
        return Ok(upstreams);
    }
    let config = GatewayConfig::from_env().map_err(|e| UpstreamError::Client(e.to_string()))?;
    let built = Upstreams::from_config(&config)?;
    Ok(UPSTREAMS.get_or_init(|| built))
}
