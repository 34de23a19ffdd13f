//! Server initialization.

use actors::{Relay, RelayError};
use gateway::{ConfigError, GatewayConfig, UpstreamError, Upstreams, install_upstreams};
use thiserror::Error;

/// Startup errors.
#[derive(Debug, Error)]
pub enum InitError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error(transparent)]
    Relay(#[from] RelayError),
}

/// Load configuration, install the upstream clients and start the relay.
///
/// Call once at server startup; the returned relay is handed to
/// [`gateway::event_routes`].
pub async fn init_dispatch() -> Result<Relay, InitError> {
    tracing::info!("Initializing dispatch server...");

    let config = GatewayConfig::from_env()?;
    tracing::info!(
        "Jobs API: {}, auth API: {}",
        config.jobs_api_url,
        config.auth_api_url
    );
    install_upstreams(Upstreams::from_config(&config)?);

    let (relay, _handle) = Relay::start().await?;

    tracing::info!("Dispatch server initialized");
    Ok(relay)
}
