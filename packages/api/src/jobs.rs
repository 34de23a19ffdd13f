//! Job snapshot server function.

use dioxus::prelude::*;
use dispatch_core::Job;

/// Fetch every job from the jobs-listing API.
///
/// Coordinates come back as the upstream sent them; the board normalizes them.
#[get("/api/jobs")]
pub async fn list_jobs() -> Result<Vec<Job>, ServerFnError> {
    #[cfg(feature = "server")]
    {
        let upstreams = gateway::upstreams().map_err(|e| {
            tracing::error!("Upstream clients unavailable: {}", e);
            ServerFnError::new("Failed to fetch jobs")
        })?;

        upstreams.jobs.fetch_jobs().await.map_err(|e| {
            tracing::error!("Error fetching jobs: {}", e);
            ServerFnError::new("Failed to fetch jobs")
        })
    }

    #[cfg(not(feature = "server"))]
    {
        Err(ServerFnError::new("Server-only function"))
    }
}
